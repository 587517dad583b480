//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod error;
pub mod format;
pub mod log;
pub mod quote;
pub mod source;
pub mod store;

// Re-export main types for cleaner imports
pub use error::{ConversionError, RateError};
pub use quote::{BASE_CURRENCY, ConversionRequest, CurrencyQuote, RateSet, RateSnapshot};
pub use source::RateSource;
pub use store::LocalStore;
