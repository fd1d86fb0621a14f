//! Seagrape Core - Shared types library.
//!
//! This crate provides common types used across all Seagrape components:
//! - `server` - Discount configuration HTTP service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for shop domains, group ids, and
//!   percentages, plus the `ProductRef` value object

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
