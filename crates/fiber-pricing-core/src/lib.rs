pub mod catalog;
pub mod config;
pub mod error;
pub mod pricing;
pub mod types;

#[cfg(feature = "export")]
pub mod export;

pub use config::PricingConfig;
pub use error::PricingError;
pub use types::*;

/// Standard result type for all fiber-pricing operations
pub type PricingResult<T> = Result<T, PricingError>;
