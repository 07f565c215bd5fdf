//! Errors raised while talking to the converter API

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request error: {source} for URL: {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for URL: {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse JSON response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No rate found for currency pair: {pair}")]
    MissingRate { pair: String },

    #[error("Invalid rate '{value}' for currency pair: {pair}")]
    InvalidRate { pair: String, value: String },
}
