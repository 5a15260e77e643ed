use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    Destination,
    WeatherPhrase,
    AttractionsPhrase,
    InPreposition,
    AtPreposition,
    CapitalizedRun,
    ShortInput,
}

impl ExtractionStage {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Destination => "destination",
            Self::WeatherPhrase => "weather_phrase",
            Self::AttractionsPhrase => "attractions_phrase",
            Self::InPreposition => "in_preposition",
            Self::AtPreposition => "at_preposition",
            Self::CapitalizedRun => "capitalized_run",
            Self::ShortInput => "short_input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub stage: ExtractionStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub coordinates: Coordinates,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub precipitation_probability: Option<f64>,
}

impl WeatherReport {
    /// Whole degrees and percent, truncated toward zero.
    pub fn formatted(&self) -> String {
        let temperature = self.temperature_c.trunc() as i64;
        match self.precipitation_probability {
            Some(chance) => format!(
                "{temperature}°C with a chance of {}% to rain",
                chance.trunc() as i64
            ),
            None => format!("{temperature}°C"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourismQuery {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourismAnswer {
    pub weather: Option<String>,
    pub places: Option<String>,
    pub place_name: String,
    pub extracted_place: String,
    pub extraction: Option<ExtractionStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}
