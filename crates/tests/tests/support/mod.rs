//! Local stand-in for the Nominatim, Open-Meteo and Overpass endpoints.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tourism_tools::ToolsConfig;

pub const PARIS_DISPLAY_NAME: &str = "Paris, Île-de-France, France";
pub const PARIS_PLACES: [&str; 5] = [
    "Louvre",
    "Musée d'Orsay",
    "Centre Pompidou",
    "Sainte-Chapelle",
    "Arc de Triomphe",
];

#[derive(Debug, Default)]
pub struct Recorded {
    pub geocode_queries: Mutex<Vec<String>>,
    pub user_agents: Mutex<Vec<String>>,
    pub overpass_queries: Mutex<Vec<String>>,
}

pub struct MockUpstream {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
}

impl MockUpstream {
    pub fn tools_config(&self) -> ToolsConfig {
        ToolsConfig::with_base_url(&self.base_url).expect("mock base url is valid")
    }

    pub fn overpass_queries(&self) -> Vec<String> {
        self.recorded.overpass_queries.lock().unwrap().clone()
    }
}

pub async fn spawn_mock_upstream() -> MockUpstream {
    let recorded = Arc::new(Recorded::default());
    let app = Router::new()
        .route("/search", get(search))
        .route("/v1/forecast", get(forecast))
        .route("/api/interpreter", post(interpreter))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("mock upstream should bind");
    let addr = listener.local_addr().expect("mock upstream has an address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock upstream should serve");
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

async fn search(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let place = params.get("q").cloned().unwrap_or_default();
    recorded.geocode_queries.lock().unwrap().push(place.clone());
    if let Some(agent) = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
    {
        recorded.user_agents.lock().unwrap().push(agent.to_string());
    }

    match place.as_str() {
        "Paris" => Json(json!([{
            "lat": "48.8566",
            "lon": "2.3522",
            "display_name": PARIS_DISPLAY_NAME
        }]))
        .into_response(),
        "Reykjavik" => Json(json!([{
            "lat": "64.1466",
            "lon": "-21.9426",
            "display_name": "Reykjavík, Iceland"
        }]))
        .into_response(),
        "Boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn forecast(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let latitude = params
        .get("latitude")
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or_default();

    if (latitude - 48.8566).abs() < 1e-6 {
        Json(json!({
            "latitude": latitude,
            "current": {
                "time": "2025-06-01T12:00",
                "temperature_2m": 18.6,
                "precipitation_probability": 20
            }
        }))
    } else {
        Json(json!({ "latitude": latitude }))
    }
}

async fn interpreter(State(recorded): State<Arc<Recorded>>, body: String) -> Json<Value> {
    recorded.overpass_queries.lock().unwrap().push(body.clone());

    let broad = body.contains("around:20000");
    let elements = if body.contains("48.8566") {
        if broad {
            vec![
                named("Musée d'Orsay"),
                named("Centre Pompidou"),
                json!({ "type": "node", "tags": { "tourism:name": "Sainte-Chapelle" } }),
                json!({ "type": "way", "tags": { "alt_name": "Arc de Triomphe" } }),
                named("Notre-Dame"),
            ]
        } else {
            vec![
                named("Louvre"),
                named("Louvre"),
                json!({ "type": "node", "id": 7 }),
                named("Musée d'Orsay"),
            ]
        }
    } else if body.contains("64.1466") && !broad {
        vec![
            named("Hallgrímskirkja"),
            named("Harpa"),
            named("Sun Voyager"),
            named("Perlan"),
            named("National Museum of Iceland"),
            named("Reykjavík Art Museum"),
        ]
    } else {
        Vec::new()
    };

    Json(json!({ "version": 0.6, "elements": elements }))
}

fn named(name: &str) -> Value {
    json!({ "type": "node", "tags": { "name": name, "tourism": "attraction" } })
}
