//! Flag icon lookup for currency codes

use std::collections::HashMap;

/// Resolves a flag image URL for a currency code.
///
/// Codes listed in `overrides` map to an explicit country code. Anything
/// else uses the first two characters of the currency code, which works
/// for most ISO 4217 codes but not for shared currencies such as EUR.
#[derive(Debug, Clone)]
pub struct FlagResolver {
    base_url: String,
    overrides: HashMap<String, String>,
}

impl FlagResolver {
    pub fn new(base_url: &str, overrides: HashMap<String, String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            overrides,
        }
    }

    pub fn country_code<'a>(&'a self, currency_code: &'a str) -> &'a str {
        if let Some(country) = self.overrides.get(currency_code) {
            return country;
        }
        match currency_code.char_indices().nth(2) {
            Some((end, _)) => &currency_code[..end],
            None => currency_code,
        }
    }

    pub fn flag_url(&self, currency_code: &str) -> String {
        format!(
            "{}/{}/flat/24.png",
            self.base_url,
            self.country_code(currency_code)
        )
    }
}
