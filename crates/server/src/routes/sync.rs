//! Shopify metafield sync handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use super::parse_shop;
use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::models::discount::SyncRequest;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for the sync endpoint.
#[derive(Debug, Deserialize)]
pub struct SyncParams {
    #[serde(default)]
    pub token: Option<String>,
}

/// Publish `{groups, excludedProducts}` from the request payload to the
/// shop's `custom.discountconfigdata` metafield.
///
/// This is a side channel: the local store is neither read nor written, so
/// the published blob reflects whatever the caller submitted.
///
/// # Errors
///
/// Returns 400 if the token or `shopId` is missing or Shopify rejects the
/// write, and an upstream error on transport failure. Never retries.
#[instrument(skip(state, params, body))]
pub async fn sync(
    State(state): State<AppState>,
    Query(params): Query<SyncParams>,
    JsonBody(body): JsonBody<SyncRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let token = params
        .token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("Access token is required".to_owned()))?
        .to_owned();

    let shop = parse_shop(body.shop_id.as_deref().unwrap_or_default())?;

    let blob = serde_json::json!({
        "groups": body.groups,
        "excludedProducts": body.excluded_products,
    });

    let metafield = state
        .shopify()
        .set_discount_metafield(&shop, &token, &blob)
        .await?;

    Ok(Json(ApiResponse::ok(
        metafield,
        "Configuration synced to Shopify successfully",
    )))
}
