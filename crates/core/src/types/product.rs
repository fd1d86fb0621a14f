//! Product reference value object.

use serde::{Deserialize, Serialize};

/// A reference to a Shopify product, as held by a discount group's product
/// list or a shop's excluded-product list.
///
/// The `product_id` is an opaque platform identifier (a handle or GID); the
/// service never interprets it beyond equality. Two references to the same
/// `product_id` are the same product regardless of the display fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    /// Opaque platform product identifier.
    pub product_id: String,
    /// Display name of the product.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional featured image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
}

/// A product's featured image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImage {
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Accessibility alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl ProductRef {
    /// Create a reference carrying only the product id, with the title
    /// falling back to the id itself.
    ///
    /// Used when a payload supplies bare id strings instead of structured
    /// product objects.
    #[must_use]
    pub fn from_id(product_id: impl Into<String>) -> Self {
        let product_id = product_id.into();
        Self {
            title: product_id.clone(),
            product_id,
            description: None,
            featured_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_falls_back_title() {
        let p = ProductRef::from_id("gid://shopify/Product/1");
        assert_eq!(p.product_id, "gid://shopify/Product/1");
        assert_eq!(p.title, "gid://shopify/Product/1");
        assert!(p.description.is_none());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let p = ProductRef {
            product_id: "p1".to_owned(),
            title: "Straw Hat".to_owned(),
            description: None,
            featured_image: Some(FeaturedImage {
                url: Some("https://cdn.example.com/hat.jpg".to_owned()),
                alt_text: Some("a straw hat".to_owned()),
            }),
        };

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["featuredImage"]["altText"], "a straw hat");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let p: ProductRef =
            serde_json::from_str(r#"{"productId":"p1","title":"Straw Hat"}"#).unwrap();
        assert_eq!(p.product_id, "p1");
        assert!(p.featured_image.is_none());
    }
}
