use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CONVERTER_URL: &str = "https://free.currencyconverterapi.com/api/v5";
pub const DEFAULT_FLAGS_URL: &str = "https://www.countryflags.io";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConverterProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FlagProviderConfig {
    pub base_url: String,
    /// Currency code to country code, for currencies the prefix rule gets wrong.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub converter: Option<ConverterProviderConfig>,
    pub flags: Option<FlagProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            converter: Some(ConverterProviderConfig {
                base_url: DEFAULT_CONVERTER_URL.to_string(),
            }),
            flags: Some(FlagProviderConfig {
                base_url: DEFAULT_FLAGS_URL.to_string(),
                overrides: HashMap::new(),
            }),
        }
    }
}

/// Initial selection when the converter starts.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            amount: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Also refresh the displayed rate when the "to" amount drives a conversion.
    #[serde(default)]
    pub reverse_updates_rate: bool,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the config at the default path, or the built-in defaults when
    /// no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "ccx", "ccx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "ccx", "ccx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn converter_url(&self) -> &str {
        self.providers
            .converter
            .as_ref()
            .map_or(DEFAULT_CONVERTER_URL, |p| &p.base_url)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty file is a valid config with every section defaulted.
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  converter:
    base_url: "http://example.com/api"
  flags:
    base_url: "http://example.com/flags"
    overrides:
      EUR: "EU"
      XAF: "CM"
defaults:
  from: "GBP"
  to: "JPY"
  amount: 25.0
reverse_updates_rate: true
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.converter_url(), "http://example.com/api");
        let flags = config.providers.flags.unwrap();
        assert_eq!(flags.base_url, "http://example.com/flags");
        assert_eq!(flags.overrides.get("EUR").map(String::as_str), Some("EU"));
        assert_eq!(flags.overrides.len(), 2);
        assert_eq!(config.defaults.from, "GBP");
        assert_eq!(config.defaults.to, "JPY");
        assert_eq!(config.defaults.amount, 25.0);
        assert!(config.reverse_updates_rate);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let yaml_str = r#"
data_path: "/tmp/ccx"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();

        assert_eq!(config.converter_url(), DEFAULT_CONVERTER_URL);
        assert_eq!(
            config.providers.flags.as_ref().unwrap().base_url,
            DEFAULT_FLAGS_URL.to_string()
        );
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "EUR");
        assert!(!config.reverse_updates_rate);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/ccx")
        );
    }

    #[test]
    fn test_partial_defaults_section() {
        let yaml_str = r#"
defaults:
  from: GBP
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();

        assert_eq!(config.defaults.from, "GBP");
        assert_eq!(config.defaults.to, "EUR");
        assert_eq!(config.defaults.amount, 1.0);
    }

    #[test]
    fn test_partial_providers_section() {
        let yaml_str = r#"
providers:
  converter:
    base_url: "http://localhost:1234"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();

        assert_eq!(config.converter_url(), "http://localhost:1234");
        assert!(config.providers.flags.is_none());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/ccx/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
