//! Discount configuration handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use seagrape_core::GroupId;

use super::parse_shop;
use crate::db::DiscountRepository;
use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::models::DiscountConfiguration;
use crate::models::discount::{
    AddProductsRequest, ExcludedProductsRequest, ReplaceConfigurationRequest, normalize_product_refs,
    validate_groups, validate_products,
};
use crate::response::ApiResponse;
use crate::state::AppState;

type ConfigResponse = Json<ApiResponse<DiscountConfiguration>>;

fn parse_group_id(raw: &str) -> Result<GroupId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid group id".to_owned()))
}

/// Fetch a shop's configuration.
///
/// Shops that have never stored anything get the empty shape back without a
/// record being created.
///
/// # Errors
///
/// Returns an error if the shop id is empty or the store fails.
#[instrument(skip(state))]
pub async fn fetch(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;
    let repo = DiscountRepository::new(state.pool());

    match repo.get(&shop).await? {
        Some(config) => Ok(Json(ApiResponse::ok(
            config,
            "Configuration retrieved successfully",
        ))),
        None => Ok(Json(ApiResponse::ok(
            DiscountConfiguration::empty(shop),
            "No configuration found for this shop",
        ))),
    }
}

/// Create or update the entire configuration (groups + excluded products).
///
/// A full replace, not a merge: the stored group set becomes exactly the
/// submitted one. Groups carrying an id keep it (edit); groups without get
/// a fresh one (add). The excluded set is replaced only when the payload
/// includes it.
///
/// # Errors
///
/// Returns a validation error if any group is malformed or names collide;
/// nothing is saved on failure.
#[instrument(skip(state, body))]
pub async fn replace(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    JsonBody(body): JsonBody<ReplaceConfigurationRequest>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;

    let groups = validate_groups(body.groups).map_err(AppError::Validation)?;
    let excluded = body
        .excluded_products
        .map(normalize_product_refs)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let repo = DiscountRepository::new(state.pool());
    let config = repo
        .upsert_replace(&shop, &groups, excluded.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(
        config,
        "Configuration saved successfully",
    )))
}

/// Delete a specific group, cascading its product list.
///
/// # Errors
///
/// Returns 404 when the shop has no configuration at all; deleting an
/// unknown group id from an existing configuration succeeds unchanged.
#[instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    Path((shop_id, group_id)): Path<(String, String)>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;
    let group_id = parse_group_id(&group_id)?;

    let repo = DiscountRepository::new(state.pool());
    let config = repo
        .remove_group(&shop, group_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Configuration not found for this shop".to_owned()))?;

    Ok(Json(ApiResponse::ok(config, "Group deleted successfully")))
}

/// Replace the shop-level excluded set wholesale.
///
/// # Errors
///
/// Returns an error if the payload is malformed or the store fails.
#[instrument(skip(state, body))]
pub async fn replace_excluded(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    JsonBody(body): JsonBody<ExcludedProductsRequest>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;

    let products =
        normalize_product_refs(body.excluded_products).map_err(AppError::BadRequest)?;

    let repo = DiscountRepository::new(state.pool());
    let config = repo.replace_excluded_products(&shop, &products).await?;

    Ok(Json(ApiResponse::ok(
        config,
        "Excluded products updated successfully",
    )))
}

/// Remove one product from the excluded set.
///
/// # Errors
///
/// Returns 404 when the shop has no configuration; removing an unknown
/// product succeeds unchanged.
#[instrument(skip(state))]
pub async fn remove_excluded(
    State(state): State<AppState>,
    Path((shop_id, product_id)): Path<(String, String)>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;

    let repo = DiscountRepository::new(state.pool());
    let config = repo
        .remove_excluded_product(&shop, &product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Configuration not found for this shop".to_owned()))?;

    Ok(Json(ApiResponse::ok(
        config,
        "Excluded product removed successfully",
    )))
}

/// Union products into a group's product list.
///
/// Submitting a product that is already present leaves the list unchanged -
/// the stored list never carries duplicates.
///
/// # Errors
///
/// Returns 404 if the shop or group does not exist, or a validation error
/// if any product lacks an id or title.
#[instrument(skip(state, body))]
pub async fn add_group_products(
    State(state): State<AppState>,
    Path((shop_id, group_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<AddProductsRequest>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;
    let group_id = parse_group_id(&group_id)?;

    let products = validate_products(body.products).map_err(AppError::BadRequest)?;

    let repo = DiscountRepository::new(state.pool());
    let config = repo
        .add_products_to_group(&shop, group_id, &products)
        .await?
        .ok_or_else(|| AppError::NotFound("Group not found for this shop".to_owned()))?;

    Ok(Json(ApiResponse::ok(
        config,
        "Products added to group successfully",
    )))
}

/// Remove one product from one group's product list.
///
/// # Errors
///
/// Returns 404 if the shop or group does not exist; removing an unknown
/// product succeeds unchanged.
#[instrument(skip(state))]
pub async fn remove_group_product(
    State(state): State<AppState>,
    Path((shop_id, group_id, product_id)): Path<(String, String, String)>,
) -> Result<ConfigResponse> {
    let shop = parse_shop(&shop_id)?;
    let group_id = parse_group_id(&group_id)?;

    let repo = DiscountRepository::new(state.pool());
    let config = repo
        .remove_product_from_group(&shop, group_id, &product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Group not found for this shop".to_owned()))?;

    Ok(Json(ApiResponse::ok(
        config,
        "Product removed from group successfully",
    )))
}
