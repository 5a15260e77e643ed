use std::collections::{HashMap, HashSet};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tourism_core::Coordinates;
use tracing::{debug, warn};
use url::Url;

use crate::error::ToolError;
use crate::{read_json, PlacesProvider};

const SERVICE: &str = "overpass";
const NARROW_RADIUS_METERS: u32 = 10_000;
const BROAD_RADIUS_METERS: u32 = 20_000;
const ATTRACTION_KINDS: &str = "attraction|museum|gallery|zoo|theme_park|monument|memorial|artwork";
const NAME_TAGS: [&str; 3] = ["name", "tourism:name", "alt_name"];

/// Overpass API client. Looks for named tourism features around a point and
/// widens the search once when the first pass comes back short.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassElement {
    fn display_name(&self) -> Option<&str> {
        NAME_TAGS
            .iter()
            .filter_map(|tag| self.tags.get(*tag))
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
    }
}

impl OverpassClient {
    pub fn new(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    async fn run_query(&self, query: String) -> Result<Vec<OverpassElement>, ToolError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .body(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ToolError::Network {
                service: SERVICE,
                source,
            })?;

        let parsed: OverpassResponse = read_json(SERVICE, response).await?;
        Ok(parsed.elements)
    }
}

impl PlacesProvider for OverpassClient {
    async fn nearby_places(
        &self,
        coordinates: Coordinates,
        limit: usize,
    ) -> Result<Vec<String>, ToolError> {
        let mut collector = PlaceCollector::new(limit);

        let narrow = self.run_query(attractions_query(coordinates)).await?;
        collector.extend(&narrow);

        if !collector.is_full() {
            debug!(
                found = collector.len(),
                limit, "narrow places search under-filled, broadening"
            );
            match self.run_query(broad_query(coordinates)).await {
                Ok(broad) => collector.extend(&broad),
                Err(error) => warn!(error = %error, "broad places search failed"),
            }
        }

        let places = collector.into_names();
        if places.is_empty() {
            return Err(ToolError::NotFound("no tourist places found".to_string()));
        }
        Ok(places)
    }
}

/// Distinct names in first-seen order, capped at a limit.
#[derive(Debug)]
struct PlaceCollector {
    names: Vec<String>,
    seen: HashSet<String>,
    limit: usize,
}

impl PlaceCollector {
    fn new(limit: usize) -> Self {
        Self {
            names: Vec::with_capacity(limit),
            seen: HashSet::new(),
            limit,
        }
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn is_full(&self) -> bool {
        self.names.len() >= self.limit
    }

    fn extend(&mut self, elements: &[OverpassElement]) {
        for name in elements.iter().filter_map(OverpassElement::display_name) {
            if self.is_full() {
                break;
            }
            if self.seen.insert(name.to_string()) {
                self.names.push(name.to_string());
            }
        }
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}

fn attractions_query(coordinates: Coordinates) -> String {
    let around = around_filter(NARROW_RADIUS_METERS, coordinates);
    format!(
        r#"[out:json][timeout:25];
(
  node["tourism"~"^({ATTRACTION_KINDS})$"]{around};
  way["tourism"~"^({ATTRACTION_KINDS})$"]{around};
  relation["tourism"~"^({ATTRACTION_KINDS})$"]{around};
);
out body;
>;
out skel qt;"#
    )
}

fn broad_query(coordinates: Coordinates) -> String {
    let around = around_filter(BROAD_RADIUS_METERS, coordinates);
    format!(
        r#"[out:json][timeout:25];
(
  node["tourism"]{around};
  way["tourism"]{around};
  relation["tourism"]{around};
);
out body;
>;
out skel qt;"#
    )
}

fn around_filter(radius_meters: u32, coordinates: Coordinates) -> String {
    format!(
        "(around:{radius_meters},{},{})",
        coordinates.latitude, coordinates.longitude
    )
}
