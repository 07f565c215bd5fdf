use crate::core::currency::{Catalog, Currency, CurrencyListProvider, CurrencyRateProvider};
use crate::core::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Client for the free currency converter API.
pub struct ConverterApiProvider {
    base_url: String,
}

impl ConverterApiProvider {
    pub fn new(base_url: &str) -> Self {
        ConverterApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let client = reqwest::Client::builder()
            .user_agent("ccx/1.0")
            .build()
            .map_err(request_error)?;
        let response = client.get(url).send().await.map_err(request_error)?;

        debug!(response = ?response, "Received converter response");

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    results: BTreeMap<String, Currency>,
}

/// Reads a rate given either as a JSON number or as a numeric string.
fn parse_rate(pair: &str, value: &Value) -> Result<f64, FetchError> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(FetchError::InvalidRate {
            pair: pair.to_string(),
            value: value.to_string(),
        }),
    }
}

#[async_trait]
impl CurrencyRateProvider for ConverterApiProvider {
    #[instrument(name = "ConverterRateFetch", skip(self), fields(from = %from, to = %to))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, FetchError> {
        let pair = format!("{from}_{to}");
        let url = format!("{}/convert?q={}&compact=ultra", self.base_url, pair);
        debug!("Requesting currency rate from {}", url);

        let text = self.get_text(&url).await?;
        let data: serde_json::Map<String, Value> =
            serde_json::from_str(&text).map_err(|source| FetchError::Parse {
                url: url.clone(),
                source,
            })?;

        let (_, value) = data
            .iter()
            .next()
            .ok_or_else(|| FetchError::MissingRate { pair: pair.clone() })?;
        parse_rate(&pair, value)
    }
}

#[async_trait]
impl CurrencyListProvider for ConverterApiProvider {
    #[instrument(name = "ConverterCurrencyList", skip(self))]
    async fn fetch_currencies(&self) -> Result<Catalog, FetchError> {
        let url = format!("{}/currencies", self.base_url);
        debug!("Requesting currency list from {}", url);

        let text = self.get_text(&url).await?;
        let data: CurrenciesResponse =
            serde_json::from_str(&text).map_err(|source| FetchError::Parse {
                url: url.clone(),
                source,
            })?;

        Ok(Catalog::new(data.results))
    }
}
