//! Discount configuration domain types, request payloads, and the
//! validation/normalization boundary.
//!
//! Request bodies arrive loosely shaped (the storefront admin UI has gone
//! through several payload revisions: bare product-id strings, structured
//! product objects, products nested per group). Everything is normalized
//! here into one canonical representation - [`ProductRef`] value objects -
//! before any repository call, so the storage layer never branches on
//! payload shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seagrape_core::{FeaturedImage, GroupId, Percentage, ProductRef, ShopDomain};

// =============================================================================
// Domain types
// =============================================================================

/// A shop's full discount configuration - the root aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountConfiguration {
    /// Owning shop.
    pub shop_id: ShopDomain,
    /// Discount groups, in insertion order.
    pub groups: Vec<DiscountGroup>,
    /// Shop-level excluded products, in insertion order.
    pub excluded_products: Vec<ProductRef>,
    /// When the configuration was first persisted. Absent on the synthesized
    /// empty shape returned for shops with no stored configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the configuration was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DiscountConfiguration {
    /// The empty shape served for shops that have never stored anything.
    /// Never persisted - reads must not materialize a record.
    #[must_use]
    pub const fn empty(shop_id: ShopDomain) -> Self {
        Self {
            shop_id,
            groups: Vec::new(),
            excluded_products: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// A named discount tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountGroup {
    /// Stable identifier, generated when the group is first saved.
    pub id: GroupId,
    /// Group name; unique per shop under case-insensitive trimmed
    /// comparison.
    #[serde(rename = "group")]
    pub name: String,
    /// Discount percentage in [0, 100].
    pub percentage: Percentage,
    /// Products this group's discount applies to, unique by product id.
    #[serde(default)]
    pub discounted_products: Vec<ProductRef>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Body of `POST /{shop_id}` - full configuration replace.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceConfigurationRequest {
    pub groups: Vec<GroupPayload>,
    /// When present, replaces the excluded set wholesale; when absent, the
    /// stored excluded set is left untouched.
    #[serde(default)]
    pub excluded_products: Option<Vec<ProductRefPayload>>,
}

/// One group as submitted by a client.
///
/// A payload carrying an `id` edits the stored group with that identity; a
/// payload without one creates a new group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "group")]
    pub name: Option<String>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub discounted_products: Option<Vec<ProductRefPayload>>,
}

/// A product reference in either accepted wire shape: a bare id string or a
/// structured object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductRefPayload {
    Reference(String),
    Structured(ProductPayload),
}

/// A structured product object as submitted by a client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
}

/// Body of `POST /{shop_id}/excluded-products`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedProductsRequest {
    pub excluded_products: Vec<ProductRefPayload>,
}

/// Body of `POST /{shop_id}/group/{group_id}/products`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductsRequest {
    pub products: Vec<ProductPayload>,
}

/// Body of `POST /sync`.
///
/// The groups and excluded products are forwarded to Shopify as an opaque
/// blob; only `shopId` is validated here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub groups: Vec<serde_json::Value>,
    #[serde(default)]
    pub excluded_products: Vec<serde_json::Value>,
}

// =============================================================================
// Validation & normalization
// =============================================================================

/// Validate a full-replace group payload and normalize it into domain
/// groups.
///
/// Checks run in order, failing fast on the first violation:
/// 1. every group has a non-empty trimmed name;
/// 2. every group has a percentage within [0, 100];
/// 3. group ids, where supplied, parse (supplied ids are preserved so a
///    replace can edit an existing group; missing ids get fresh ones);
/// 4. trimmed group names are pairwise distinct case-insensitively.
///
/// # Errors
///
/// Returns the validation messages for the envelope's `errors` list. No
/// group is ever partially accepted.
pub fn validate_groups(payload: Vec<GroupPayload>) -> Result<Vec<DiscountGroup>, Vec<String>> {
    let mut groups = Vec::with_capacity(payload.len());

    for (index, group) in payload.into_iter().enumerate() {
        let name = group
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| vec![format!("Group name is required for group at index {index}")])?
            .to_owned();

        let raw_percentage = group.percentage.ok_or_else(|| {
            vec![format!(
                "Discount percentage is required for group \"{name}\""
            )]
        })?;

        let percentage = Percentage::new(raw_percentage).map_err(|_| {
            vec![format!(
                "Discount percentage must be between 0 and 100 for group \"{name}\""
            )]
        })?;

        let id = match group.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(raw) => raw
                .parse::<GroupId>()
                .map_err(|_| vec![format!("Invalid group id for group \"{name}\"")])?,
            None => GroupId::generate(),
        };

        let discounted_products = match group.discounted_products {
            Some(products) => normalize_product_refs(products).map_err(|message| vec![message])?,
            None => Vec::new(),
        };

        groups.push(DiscountGroup {
            id,
            name,
            percentage,
            discounted_products,
        });
    }

    let mut seen = std::collections::HashSet::new();
    for group in &groups {
        if !seen.insert(group.name.trim().to_lowercase()) {
            return Err(vec!["Duplicate group names are not allowed".to_owned()]);
        }
    }

    Ok(groups)
}

/// Normalize a product list that accepts both wire shapes into canonical
/// [`ProductRef`]s, de-duplicating by product id (first occurrence wins).
///
/// A bare id string becomes a reference whose title falls back to the id;
/// a structured object must carry a non-empty product id, and its title
/// falls back to the id when absent.
///
/// # Errors
///
/// Returns a single validation message.
pub fn normalize_product_refs(
    payload: Vec<ProductRefPayload>,
) -> Result<Vec<ProductRef>, String> {
    let mut products = Vec::with_capacity(payload.len());
    let mut seen = std::collections::HashSet::new();

    for entry in payload {
        let product = match entry {
            ProductRefPayload::Reference(id) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err("Product ID is required".to_owned());
                }
                ProductRef::from_id(id)
            }
            ProductRefPayload::Structured(product) => {
                let product_id = product
                    .product_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| "Product ID is required".to_owned())?
                    .to_owned();

                let title = product
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|title| !title.is_empty())
                    .map_or_else(|| product_id.clone(), str::to_owned);

                ProductRef {
                    product_id,
                    title,
                    description: product.description,
                    featured_image: product.featured_image,
                }
            }
        };

        if seen.insert(product.product_id.clone()) {
            products.push(product);
        }
    }

    Ok(products)
}

/// Validate products submitted to a group's product list.
///
/// Stricter than [`normalize_product_refs`]: every product must carry both
/// a product id and a title. De-duplicates by product id within the
/// request; union against the stored list happens in the repository.
///
/// # Errors
///
/// Returns a single validation message naming the offending index.
pub fn validate_products(payload: Vec<ProductPayload>) -> Result<Vec<ProductRef>, String> {
    let mut products = Vec::with_capacity(payload.len());
    let mut seen = std::collections::HashSet::new();

    for (index, product) in payload.into_iter().enumerate() {
        let product_id = product
            .product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let title = product
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty());

        let (Some(product_id), Some(title)) = (product_id, title) else {
            return Err(format!(
                "Product at index {index} must have a productId and a title"
            ));
        };

        let normalized = ProductRef {
            product_id: product_id.to_owned(),
            title: title.to_owned(),
            description: product.description,
            featured_image: product.featured_image,
        };

        if seen.insert(normalized.product_id.clone()) {
            products.push(normalized);
        }
    }

    Ok(products)
}
