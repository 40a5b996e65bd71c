pub mod plans;
pub mod rates;
