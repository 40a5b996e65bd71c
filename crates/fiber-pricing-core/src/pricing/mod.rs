pub mod commissions;
pub mod discounts;
pub mod dre;
pub mod input;
pub mod payback;
pub mod proposal;

#[cfg(feature = "memo")]
pub mod memo;
