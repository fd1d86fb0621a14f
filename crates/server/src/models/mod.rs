//! Domain models and request payloads.

pub mod discount;

pub use discount::{DiscountConfiguration, DiscountGroup};
