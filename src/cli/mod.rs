pub mod clear_cache;
pub mod convert;
pub mod currencies;
pub mod interactive;
pub mod setup;
pub mod ui;
pub mod view;

use crate::core::cache::Store;
use crate::core::catalog::CATALOG_COLLECTION;
use crate::core::config::{AppConfig, DEFAULT_FLAGS_URL};
use crate::core::{
    Catalog, CatalogLoader, ConversionState, Converter, ConverterView, CurrencyRateProvider,
    FlagResolver,
};
use crate::providers::ConverterApiProvider;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Everything a command needs, assembled from the config.
pub struct AppContext {
    pub config: AppConfig,
    pub loader: CatalogLoader,
    pub rates: Arc<dyn CurrencyRateProvider>,
    pub flags: FlagResolver,
}

impl AppContext {
    pub fn new(config: AppConfig, store: &dyn Store) -> Result<Self> {
        let cache = store
            .get_collection(CATALOG_COLLECTION, true, true)
            .context("Failed to open the catalog collection")?;
        let api = Arc::new(ConverterApiProvider::new(config.converter_url()));
        let loader = CatalogLoader::new(api.clone(), cache);

        let flags = config.providers.flags.as_ref().map_or_else(
            || FlagResolver::new(DEFAULT_FLAGS_URL, Default::default()),
            |f| FlagResolver::new(&f.base_url, f.overrides.clone()),
        );

        Ok(Self {
            config,
            loader,
            rates: api,
            flags,
        })
    }

    /// Loads the catalog behind a spinner.
    pub async fn load_catalog(&self) -> Result<Catalog> {
        let spinner = ui::new_spinner("Loading currencies...");
        let result = self.loader.load_catalog().await;
        spinner.finish_and_clear();
        result.context("Failed to load the currency list")
    }

    pub fn converter(
        &self,
        catalog: Catalog,
        view: Arc<dyn ConverterView>,
        initial: ConversionState,
    ) -> Converter {
        Converter::new(
            Arc::clone(&self.rates),
            catalog,
            self.flags.clone(),
            view,
            initial,
        )
        .with_reverse_rate_display(self.config.reverse_updates_rate)
    }

    /// Initial state taken from the configured defaults.
    pub fn initial_state(&self) -> ConversionState {
        let defaults = &self.config.defaults;
        ConversionState::new(&defaults.from, &defaults.to, defaults.amount)
    }
}
