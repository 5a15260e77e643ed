use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use tourism_core::{
    extract_place, places_sentence, unknown_place_notice, weather_sentence, Coordinates,
    GeocodedPlace, TourismAnswer,
};
use tourism_observability::AppMetrics;
use tourism_tools::{
    Geocoder, NominatimGeocoder, OpenMeteoClient, OverpassClient, PlacesProvider, Toolbox,
    WeatherProvider, DEFAULT_PLACES_LIMIT,
};
use tracing::{info, instrument, warn};

/// Agent wired to the public Nominatim / Open-Meteo / Overpass clients.
pub type PublicApiAgent = TourismAgent<NominatimGeocoder, OpenMeteoClient, OverpassClient>;

/// Turns a free-text query into weather and attraction answers.
#[derive(Clone)]
pub struct TourismAgent<G, W, P>
where
    G: Geocoder,
    W: WeatherProvider,
    P: PlacesProvider,
{
    geocoder: Arc<G>,
    weather: Arc<W>,
    places: Arc<P>,
    places_limit: usize,
    metrics: Arc<AppMetrics>,
}

impl PublicApiAgent {
    pub fn from_toolbox(toolbox: Toolbox, metrics: Arc<AppMetrics>) -> Self {
        Self::new(toolbox.geocoder, toolbox.weather, toolbox.places, metrics)
            .with_places_limit(toolbox.places_limit)
    }
}

impl<G, W, P> TourismAgent<G, W, P>
where
    G: Geocoder,
    W: WeatherProvider,
    P: PlacesProvider,
{
    pub fn new(geocoder: G, weather: W, places: P, metrics: Arc<AppMetrics>) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            weather: Arc::new(weather),
            places: Arc::new(places),
            places_limit: DEFAULT_PLACES_LIMIT,
            metrics,
        }
    }

    pub fn with_places_limit(mut self, limit: usize) -> Self {
        self.places_limit = limit.max(1);
        self
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    #[instrument(skip(self, query))]
    pub async fn answer(&self, query: &str) -> Result<TourismAnswer> {
        let query = query.trim();
        if query.is_empty() {
            bail!("query is empty");
        }

        let started = Instant::now();
        self.metrics.inc_query();

        let candidate = extract_place(query);
        let extraction = candidate.as_ref().map(|candidate| candidate.stage);
        let place = match candidate {
            Some(candidate) => candidate.name,
            None => {
                self.metrics.inc_extraction_fallback();
                query.to_string()
            }
        };

        let answer = match self.locate(&place).await {
            Some(located) => {
                let (weather, places) = tokio::join!(
                    self.weather_at(&place, located.coordinates),
                    self.places_at(&place, located.coordinates)
                );
                TourismAnswer {
                    weather,
                    places,
                    place_name: located.display_name,
                    extracted_place: place,
                    extraction,
                    notice: None,
                }
            }
            None => TourismAnswer {
                weather: None,
                places: None,
                notice: Some(unknown_place_notice(&place)),
                place_name: place.clone(),
                extracted_place: place,
                extraction,
            },
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            place = %answer.extracted_place,
            stage = extraction.map(|stage| stage.as_code()).unwrap_or("raw_query"),
            has_weather = answer.weather.is_some(),
            has_places = answer.places.is_some(),
            "tourism query handled"
        );

        Ok(answer)
    }

    /// Current-conditions sentence for a place name, `None` when any lookup fails.
    pub async fn weather_for(&self, place: &str) -> Option<String> {
        let located = self.locate(place).await?;
        self.weather_at(place, located.coordinates).await
    }

    /// Bulleted attraction list for a place name, `None` when any lookup fails.
    pub async fn places_for(&self, place: &str) -> Option<String> {
        let located = self.locate(place).await?;
        self.places_at(place, located.coordinates).await
    }

    async fn locate(&self, place: &str) -> Option<GeocodedPlace> {
        match self.geocoder.geocode(place).await {
            Ok(located) => Some(located),
            Err(error) => {
                self.metrics.inc_geocode_failure();
                warn!(place = %place, error = %error, "geocoding failed");
                None
            }
        }
    }

    async fn weather_at(&self, place: &str, coordinates: Coordinates) -> Option<String> {
        match self.weather.current_weather(coordinates).await {
            Ok(report) => Some(weather_sentence(place, &report)),
            Err(error) => {
                self.metrics.inc_weather_failure();
                warn!(place = %place, error = %error, "weather lookup failed");
                None
            }
        }
    }

    async fn places_at(&self, place: &str, coordinates: Coordinates) -> Option<String> {
        match self
            .places
            .nearby_places(coordinates, self.places_limit)
            .await
        {
            Ok(names) => places_sentence(place, &names),
            Err(error) => {
                self.metrics.inc_places_failure();
                warn!(place = %place, error = %error, "places lookup failed");
                None
            }
        }
    }
}
