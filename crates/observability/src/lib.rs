use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    queries_total: AtomicU64,
    extraction_fallback_total: AtomicU64,
    geocode_failures_total: AtomicU64,
    weather_failures_total: AtomicU64,
    places_failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub extraction_fallback_total: u64,
    pub geocode_failures_total: u64,
    pub weather_failures_total: u64,
    pub places_failures_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_query(&self) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
    }

    /// The extractor found nothing and the raw query was used as the place.
    pub fn inc_extraction_fallback(&self) {
        self.extraction_fallback_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_geocode_failure(&self) {
        self.geocode_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_weather_failure(&self) {
        self.weather_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_places_failure(&self) {
        self.places_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            queries_total: queries,
            extraction_fallback_total: self.extraction_fallback_total.load(Ordering::Relaxed),
            geocode_failures_total: self.geocode_failures_total.load(Ordering::Relaxed),
            weather_failures_total: self.weather_failures_total.load(Ordering::Relaxed),
            places_failures_total: self.places_failures_total.load(Ordering::Relaxed),
            avg_latency_millis: if queries == 0 {
                0.0
            } else {
                latency as f64 / queries as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,tourism_api=info,tourism_agents=info,tourism_tools=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
