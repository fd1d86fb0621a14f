//! HTTP route handlers for the discount configuration API.
//!
//! # Route Structure (mounted under `/api/group-discount`)
//!
//! ```text
//! GET    /{shop_id}                                      - Fetch configuration
//! POST   /{shop_id}                                      - Replace configuration
//! DELETE /{shop_id}/group/{group_id}                     - Delete a group
//! POST   /{shop_id}/excluded-products                    - Replace excluded set
//! DELETE /{shop_id}/excluded-product/{product_id}        - Remove one excluded product
//! POST   /{shop_id}/group/{group_id}/products            - Union products into a group
//! DELETE /{shop_id}/group/{group_id}/product/{product_id} - Remove one group product
//! POST   /sync?token={access_token}                      - Publish to Shopify metafield
//! ```

pub mod discounts;
pub mod sync;

use axum::{
    Router,
    routing::{delete, get, post},
};

use seagrape_core::{ShopDomain, ShopDomainError};

use crate::error::AppError;
use crate::state::AppState;

/// Create all routes for the discount configuration API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(sync::sync))
        .route(
            "/{shop_id}",
            get(discounts::fetch).post(discounts::replace),
        )
        .route(
            "/{shop_id}/group/{group_id}",
            delete(discounts::delete_group),
        )
        .route(
            "/{shop_id}/excluded-products",
            post(discounts::replace_excluded),
        )
        .route(
            "/{shop_id}/excluded-product/{product_id}",
            delete(discounts::remove_excluded),
        )
        .route(
            "/{shop_id}/group/{group_id}/products",
            post(discounts::add_group_products),
        )
        .route(
            "/{shop_id}/group/{group_id}/product/{product_id}",
            delete(discounts::remove_group_product),
        )
}

/// Parse a shop id from a path or payload, mapping failures to the client
/// error the envelope promises.
pub(crate) fn parse_shop(raw: &str) -> Result<ShopDomain, AppError> {
    ShopDomain::parse(raw).map_err(|e| match e {
        ShopDomainError::Empty => AppError::BadRequest("Shop ID is required".to_owned()),
        ShopDomainError::TooLong { .. } => AppError::BadRequest(e.to_string()),
    })
}
