use crate::models::WeatherReport;

pub fn weather_sentence(place: &str, report: &WeatherReport) -> String {
    format!("In {place} it's currently {}.", report.formatted())
}

/// Bullet list of attractions, or `None` when there is nothing to list.
pub fn places_sentence(place: &str, places: &[String]) -> Option<String> {
    if places.is_empty() {
        return None;
    }

    let bullets = places
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!(
        "In {place} these are the places you can go:\n{bullets}"
    ))
}

pub fn unknown_place_notice(place: &str) -> String {
    format!("I don't know if {place} exists. Could not find coordinates for this place.")
}
