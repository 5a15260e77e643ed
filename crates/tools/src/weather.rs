use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tourism_core::{Coordinates, WeatherReport};
use url::Url;

use crate::error::ToolError;
use crate::{read_json, WeatherProvider};

const SERVICE: &str = "open-meteo";
const CURRENT_FIELDS: &str = "temperature_2m,precipitation_probability";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    temperature_2m: Option<f64>,
    #[serde(default)]
    precipitation_probability: Option<f64>,
}

impl OpenMeteoClient {
    pub fn new(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }
}

impl WeatherProvider for OpenMeteoClient {
    async fn current_weather(&self, coordinates: Coordinates) -> Result<WeatherReport, ToolError> {
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ToolError::Network {
                service: SERVICE,
                source,
            })?;

        let forecast: ForecastResponse = read_json(SERVICE, response).await?;
        into_report(forecast)
    }
}

fn into_report(forecast: ForecastResponse) -> Result<WeatherReport, ToolError> {
    let current = forecast.current.ok_or(ToolError::MissingData {
        service: SERVICE,
        field: "current",
    })?;
    let temperature_c = current.temperature_2m.ok_or(ToolError::MissingData {
        service: SERVICE,
        field: "current.temperature_2m",
    })?;

    Ok(WeatherReport {
        temperature_c,
        precipitation_probability: current.precipitation_probability,
    })
}
