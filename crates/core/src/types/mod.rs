//! Core types for Seagrape.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod percentage;
pub mod product;
pub mod shop;

pub use id::GroupId;
pub use percentage::{Percentage, PercentageError};
pub use product::{FeaturedImage, ProductRef};
pub use shop::{ShopDomain, ShopDomainError};
