//! Integration tests for Seagrape.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p seagrape-cli -- migrate server
//!
//! # Start the server
//! cargo run -p seagrape-server
//!
//! # Run the ignored HTTP tests
//! cargo test -p seagrape-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a live server over HTTP; each test works against a fresh
//! random shop id so runs never interfere with each other.

#![cfg_attr(not(test), forbid(unsafe_code))]

/// Base URL for the server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SEAGRAPE_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// URL of the group-discount API for one shop.
#[must_use]
pub fn shop_url(shop_id: &str) -> String {
    format!("{}/api/group-discount/{shop_id}", base_url())
}

/// A shop id no other test run has touched.
#[must_use]
pub fn fresh_shop_id() -> String {
    format!("test-{}.myshopify.com", uuid::Uuid::new_v4())
}
