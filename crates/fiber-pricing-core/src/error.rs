use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown plan: no {speed} Mbps tier in the catalog")]
    UnknownPlan { speed: u32 },

    #[error("Unsupported contract term: {term} months")]
    UnsupportedTerm { term: u32 },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        PricingError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<csv::Error> for PricingError {
    fn from(e: csv::Error) -> Self {
        PricingError::Export(e.to_string())
    }
}
