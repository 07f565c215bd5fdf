//! Core business logic abstractions

pub mod cache;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod flags;
pub mod log;
pub mod sync;

// Re-export main types for cleaner imports
pub use catalog::CatalogLoader;
pub use currency::{Catalog, Currency, CurrencyListProvider, CurrencyRateProvider};
pub use error::FetchError;
pub use flags::FlagResolver;
pub use sync::{ConversionState, Converter, ConverterView, Outcome, Side, UiEvents};
