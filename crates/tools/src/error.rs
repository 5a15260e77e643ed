use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("request to {service} failed: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} responded with status {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("could not decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{service} response is missing {field}")]
    MissingData {
        service: &'static str,
        field: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ToolError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
