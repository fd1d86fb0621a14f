//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ShopDomainError {
    /// The input string is empty after trimming.
    #[error("shop id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A shop identifier.
///
/// Every discount configuration is partitioned by shop. Shopify identifies a
/// shop by its myshopify domain (e.g. `my-store.myshopify.com`), which is
/// treated here as an opaque, trimmed, non-empty string.
///
/// ## Examples
///
/// ```
/// use seagrape_core::ShopDomain;
///
/// let shop = ShopDomain::parse("  my-store.myshopify.com  ").unwrap();
/// assert_eq!(shop.as_str(), "my-store.myshopify.com");
///
/// assert!(ShopDomain::parse("").is_err());
/// assert!(ShopDomain::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a shop domain (RFC 1035 hostname limit).
    pub const MAX_LENGTH: usize = 253;

    /// Parse a `ShopDomain` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty after trimming or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the shop domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShopDomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let shop = ShopDomain::parse("  store.myshopify.com\n").unwrap();
        assert_eq!(shop.as_str(), "store.myshopify.com");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(ShopDomain::parse(""), Err(ShopDomainError::Empty)));
        assert!(matches!(
            ShopDomain::parse(" \t "),
            Err(ShopDomainError::Empty)
        ));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(ShopDomain::MAX_LENGTH + 1);
        assert!(matches!(
            ShopDomain::parse(&long),
            Err(ShopDomainError::TooLong { .. })
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let shop = ShopDomain::parse("store.myshopify.com").unwrap();
        let json = serde_json::to_string(&shop).unwrap();
        assert_eq!(json, "\"store.myshopify.com\"");
    }
}
