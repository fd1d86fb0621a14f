//! Shopify Admin API metafield client.
//!
//! The resolved discount configuration is published to the storefront as a
//! single shop metafield (`custom.discountconfigdata`) so theme extensions
//! can read it without calling back into this service. One idempotent write
//! per sync request; the access token is supplied per call and never stored.

use std::sync::Arc;

use seagrape_core::ShopDomain;
use thiserror::Error;
use tracing::instrument;

/// Metafield namespace the configuration is published under.
pub const METAFIELD_NAMESPACE: &str = "custom";
/// Metafield key the configuration is published under.
pub const METAFIELD_KEY: &str = "discountconfigdata";

/// Errors that can occur when publishing to Shopify.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Shopify rejected the request (bad token, invalid metafield value).
    #[error("User error: {0}")]
    UserError(String),

    /// Unexpected response from the Admin API.
    #[error("Unexpected response (HTTP {status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        detail: String,
    },
}

/// Client for publishing shop metafields through the Shopify Admin API.
#[derive(Clone)]
pub struct MetafieldClient {
    inner: Arc<MetafieldClientInner>,
}

struct MetafieldClientInner {
    client: reqwest::Client,
    api_version: String,
}

impl MetafieldClient {
    /// Create a new metafield client for the given Admin API version.
    #[must_use]
    pub fn new(api_version: &str) -> Self {
        Self {
            inner: Arc::new(MetafieldClientInner {
                client: reqwest::Client::new(),
                api_version: api_version.to_owned(),
            }),
        }
    }

    fn endpoint(&self, shop: &ShopDomain) -> String {
        format!(
            "https://{}/admin/api/{}/metafields.json",
            shop, self.inner.api_version
        )
    }

    /// Publish the serialized discount configuration as the shop's
    /// `custom.discountconfigdata` metafield.
    ///
    /// Returns the metafield object Shopify echoes back.
    ///
    /// # Errors
    ///
    /// Returns `UserError` when Shopify rejects the token or the value,
    /// `Http` on transport failure, and `Api` on any other non-success
    /// response. Never retries.
    #[instrument(skip(self, access_token, value), fields(shop = %shop))]
    pub async fn set_discount_metafield(
        &self,
        shop: &ShopDomain,
        access_token: &str,
        value: &serde_json::Value,
    ) -> Result<serde_json::Value, ShopifyError> {
        let body = metafield_payload(value)?;

        let response = self
            .inner
            .client
            .post(self.endpoint(shop))
            .header("X-Shopify-Access-Token", access_token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(ShopifyError::UserError(extract_errors(&response_text)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Shopify Admin API returned non-success status"
            );
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                detail: truncate(&response_text, 200),
            });
        }

        let parsed: serde_json::Value = serde_json::from_str(&response_text)?;
        Ok(parsed.get("metafield").cloned().unwrap_or(parsed))
    }
}

/// Build the Admin API request body for the metafield write.
///
/// Shopify's `json`-typed metafields carry their value as a JSON-encoded
/// string, so the configuration blob is serialized once more here.
fn metafield_payload(value: &serde_json::Value) -> Result<serde_json::Value, ShopifyError> {
    Ok(serde_json::json!({
        "metafield": {
            "namespace": METAFIELD_NAMESPACE,
            "key": METAFIELD_KEY,
            "type": "json",
            "value": serde_json::to_string(value)?,
        }
    }))
}

/// Pull a readable message out of a Shopify error body.
///
/// The Admin API answers either `{"errors": "..."}` or
/// `{"errors": {"field": ["problem", ...]}}`.
fn extract_errors(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return truncate(body, 200);
    };

    match parsed.get("errors") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(serde_json::Value::Object(fields)) => fields
            .iter()
            .map(|(field, problems)| match problems {
                serde_json::Value::Array(list) => {
                    let joined = list
                        .iter()
                        .map(|p| p.as_str().map_or_else(|| p.to_string(), str::to_owned))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{field}: {joined}")
                }
                other => format!("{field}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => truncate(body, 200),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let client = MetafieldClient::new("2026-01");
        let shop = ShopDomain::parse("store.myshopify.com").unwrap();
        assert_eq!(
            client.endpoint(&shop),
            "https://store.myshopify.com/admin/api/2026-01/metafields.json"
        );
    }

    #[test]
    fn test_metafield_payload_shape() {
        let value = serde_json::json!({"groups": [], "excludedProducts": ["p1"]});
        let body = metafield_payload(&value).unwrap();

        assert_eq!(body["metafield"]["namespace"], "custom");
        assert_eq!(body["metafield"]["key"], "discountconfigdata");
        assert_eq!(body["metafield"]["type"], "json");

        // json metafields carry a string-encoded value
        let encoded = body["metafield"]["value"].as_str().unwrap();
        let round_trip: serde_json::Value = serde_json::from_str(encoded).unwrap();
        assert_eq!(round_trip, value);
    }

    #[test]
    fn test_extract_errors_string_shape() {
        let body = r#"{"errors":"[API] Invalid API key or access token"}"#;
        assert_eq!(
            extract_errors(body),
            "[API] Invalid API key or access token"
        );
    }

    #[test]
    fn test_extract_errors_field_shape() {
        let body = r#"{"errors":{"value":["is invalid","is too long"]}}"#;
        assert_eq!(extract_errors(body), "value: is invalid, is too long");
    }

    #[test]
    fn test_extract_errors_unparseable_body() {
        assert_eq!(extract_errors("<html>boom</html>"), "<html>boom</html>");
    }

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::UserError("bad token".to_owned());
        assert_eq!(err.to_string(), "User error: bad token");

        let err = ShopifyError::Api {
            status: 500,
            detail: "oops".to_owned(),
        };
        assert_eq!(err.to_string(), "Unexpected response (HTTP 500): oops");
    }
}
