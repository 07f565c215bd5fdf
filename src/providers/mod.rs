pub mod converter_api;

pub use converter_api::ConverterApiProvider;
