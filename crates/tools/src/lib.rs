mod config;
mod error;
mod geocoding;
mod places;
mod weather;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tourism_core::{Coordinates, GeocodedPlace, WeatherReport};

pub use config::{
    ToolsConfig, DEFAULT_GEOCODING_URL, DEFAULT_PLACES_LIMIT, DEFAULT_PLACES_URL,
    DEFAULT_USER_AGENT, DEFAULT_WEATHER_URL,
};
pub use error::ToolError;
pub use geocoding::NominatimGeocoder;
pub use places::OverpassClient;
pub use weather::OpenMeteoClient;

/// Resolves a free-text place name to coordinates.
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, ToolError>;
}

pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, coordinates: Coordinates) -> Result<WeatherReport, ToolError>;
}

/// Distinct attraction names near a point, at most `limit` of them.
pub trait PlacesProvider: Send + Sync {
    async fn nearby_places(
        &self,
        coordinates: Coordinates,
        limit: usize,
    ) -> Result<Vec<String>, ToolError>;
}

/// The three public-API clients sharing one connection pool.
#[derive(Debug, Clone)]
pub struct Toolbox {
    pub geocoder: NominatimGeocoder,
    pub weather: OpenMeteoClient,
    pub places: OverpassClient,
    pub places_limit: usize,
}

impl Toolbox {
    pub fn from_config(config: &ToolsConfig) -> Result<Self, ToolError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout);
        if config.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|error| ToolError::Config(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            geocoder: NominatimGeocoder::new(
                client.clone(),
                config.geocoding_url.clone(),
                config.request_timeout,
            ),
            weather: OpenMeteoClient::new(
                client.clone(),
                config.weather_url.clone(),
                config.request_timeout,
            ),
            places: OverpassClient::new(client, config.places_url.clone(), config.places_timeout),
            places_limit: config.places_limit,
        })
    }
}

async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, ToolError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ToolError::Status { service, status });
    }

    response.json::<T>().await.map_err(|error| ToolError::Decode {
        service,
        message: error.to_string(),
    })
}
