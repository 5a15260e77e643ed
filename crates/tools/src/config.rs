use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ToolError;

pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_PLACES_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_USER_AGENT: &str = "Tourism-AI-Agent/1.0";
pub const DEFAULT_PLACES_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct ToolsConfig {
    pub geocoding_url: Url,
    pub weather_url: Url,
    pub places_url: Url,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Overpass queries are slow; they get their own, longer budget.
    pub places_timeout: Duration,
    pub places_limit: usize,
    /// Bypass any system HTTP proxy.
    pub no_proxy: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            geocoding_url: Url::parse(DEFAULT_GEOCODING_URL).expect("valid default geocoding url"),
            weather_url: Url::parse(DEFAULT_WEATHER_URL).expect("valid default weather url"),
            places_url: Url::parse(DEFAULT_PLACES_URL).expect("valid default places url"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(6),
            request_timeout: Duration::from_secs(10),
            places_timeout: Duration::from_secs(30),
            places_limit: DEFAULT_PLACES_LIMIT,
            no_proxy: false,
        }
    }
}

impl ToolsConfig {
    /// Reads `TOURISM_*` overrides. Unset or unparsable numbers keep their
    /// defaults; a malformed URL is an error.
    pub fn from_env() -> Result<Self, ToolError> {
        let defaults = Self::default();

        Ok(Self {
            geocoding_url: url_from_env("TOURISM_GEOCODING_URL", defaults.geocoding_url)?,
            weather_url: url_from_env("TOURISM_WEATHER_URL", defaults.weather_url)?,
            places_url: url_from_env("TOURISM_PLACES_URL", defaults.places_url)?,
            user_agent: env::var("TOURISM_USER_AGENT")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.user_agent),
            connect_timeout: defaults.connect_timeout,
            request_timeout: env::var("TOURISM_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            places_timeout: defaults.places_timeout,
            places_limit: env::var("TOURISM_PLACES_LIMIT")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.places_limit),
            no_proxy: defaults.no_proxy,
        })
    }

    /// Points all three services at one host, using the public path layout,
    /// and talks to it directly. Used to run against a local stand-in server.
    pub fn with_base_url(base: &str) -> Result<Self, ToolError> {
        let base = parse_url(base)?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|error| ToolError::Config(format!("cannot join {path}: {error}")))
        };

        Ok(Self {
            geocoding_url: join("/search")?,
            weather_url: join("/v1/forecast")?,
            places_url: join("/api/interpreter")?,
            no_proxy: true,
            ..Self::default()
        })
    }
}

fn url_from_env(key: &str, default: Url) -> Result<Url, ToolError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => parse_url(value.trim()),
        _ => Ok(default),
    }
}

fn parse_url(value: &str) -> Result<Url, ToolError> {
    Url::parse(value).map_err(|error| ToolError::Config(format!("invalid url {value:?}: {error}")))
}
