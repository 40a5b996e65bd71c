pub mod commissions;
pub mod dre;
pub mod payback;
pub mod plans;
pub mod quote;
