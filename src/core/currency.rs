//! Currency types and the provider abstractions behind them

use crate::core::error::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single supported currency.
///
/// Field names follow the converter API so the same type reads the
/// `results` entries of the currency list and the cached catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "id")]
    pub code: String,
    #[serde(rename = "currencyName")]
    pub display_name: String,
    #[serde(
        rename = "currencySymbol",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub symbol: Option<String>,
}

impl Currency {
    pub fn new(code: &str, display_name: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.to_string(),
            symbol: None,
        }
    }
}

/// Mapping of currency code to currency, ordered by code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<String, Currency>);

impl Catalog {
    pub fn new(currencies: BTreeMap<String, Currency>) -> Self {
        Self(currencies)
    }

    /// Display name for `code`, or the code itself when it is not in the catalog.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.0
            .get(code)
            .map_or(code, |currency| currency.display_name.as_str())
    }

    /// Currency codes in lexicographic order, as shown in the selectors.
    pub fn codes(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Currency> for Catalog {
    fn from_iter<I: IntoIterator<Item = Currency>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|currency| (currency.code.clone(), currency))
                .collect(),
        )
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, FetchError>;
}

#[async_trait]
pub trait CurrencyListProvider: Send + Sync {
    async fn fetch_currencies(&self) -> Result<Catalog, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_sorted() {
        let catalog: Catalog = [
            Currency::new("USD", "US Dollar"),
            Currency::new("EUR", "Euro"),
            Currency::new("GBP", "British Pound"),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.codes(), vec!["EUR", "GBP", "USD"]);
    }

    #[test]
    fn test_display_name_falls_back_to_code() {
        let catalog: Catalog = [Currency::new("EUR", "Euro")].into_iter().collect();

        assert_eq!(catalog.display_name("EUR"), "Euro");
        assert_eq!(catalog.display_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_currency_reads_api_field_names() {
        let json = r#"{"currencyName":"Euro","currencySymbol":"€","id":"EUR"}"#;
        let currency: Currency = serde_json::from_str(json).unwrap();

        assert_eq!(currency.code, "EUR");
        assert_eq!(currency.display_name, "Euro");
        assert_eq!(currency.symbol.as_deref(), Some("€"));
    }
}
