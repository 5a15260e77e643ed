pub mod answer;
pub mod extractor;
pub mod models;

pub use answer::{places_sentence, unknown_place_notice, weather_sentence};
pub use extractor::{clean_candidate, extract_place, extract_place_name, extract_place_or_input};
pub use models::*;
