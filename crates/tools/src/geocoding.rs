use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tourism_core::{Coordinates, GeocodedPlace};
use tracing::debug;
use url::Url;

use crate::error::ToolError;
use crate::{read_json, Geocoder};

const SERVICE: &str = "nominatim";

/// Nominatim `search` endpoint, first hit only.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, ToolError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ToolError::Network {
                service: SERVICE,
                source,
            })?;

        let hits: Vec<NominatimHit> = read_json(SERVICE, response).await?;
        let Some(hit) = hits.into_iter().next() else {
            return Err(ToolError::NotFound(format!("place not found: {place}")));
        };

        let located = into_geocoded_place(hit, place)?;
        debug!(
            place = %place,
            latitude = located.coordinates.latitude,
            longitude = located.coordinates.longitude,
            "geocoded place"
        );
        Ok(located)
    }
}

fn into_geocoded_place(hit: NominatimHit, query: &str) -> Result<GeocodedPlace, ToolError> {
    let latitude = parse_coordinate(&hit.lat, "lat")?;
    let longitude = parse_coordinate(&hit.lon, "lon")?;

    Ok(GeocodedPlace {
        coordinates: Coordinates {
            latitude,
            longitude,
        },
        display_name: hit
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| query.to_string()),
    })
}

fn parse_coordinate(raw: &str, field: &'static str) -> Result<f64, ToolError> {
    raw.trim().parse::<f64>().map_err(|_| ToolError::Decode {
        service: SERVICE,
        message: format!("{field} is not a number: {raw:?}"),
    })
}
