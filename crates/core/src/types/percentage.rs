//! Discount percentage type.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Percentage`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PercentageError {
    /// The value is outside the closed interval [0, 100].
    #[error("percentage must be between 0 and 100, got {0}")]
    OutOfRange(f64),
    /// The value is NaN or infinite.
    #[error("percentage must be a finite number")]
    NotFinite,
}

/// A discount percentage, constrained to the closed interval [0, 100].
///
/// Both boundaries are valid: a 0% group is a named tier with no discount,
/// and a 100% group makes eligible products free.
///
/// ## Examples
///
/// ```
/// use seagrape_core::Percentage;
///
/// assert!(Percentage::new(0.0).is_ok());
/// assert!(Percentage::new(100.0).is_ok());
/// assert!(Percentage::new(-1.0).is_err());
/// assert!(Percentage::new(101.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Create a `Percentage` from a raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is NaN, infinite, or outside [0, 100].
    pub fn new(value: f64) -> Result<Self, PercentageError> {
        if !value.is_finite() {
            return Err(PercentageError::NotFinite);
        }

        if !(0.0..=100.0).contains(&value) {
            return Err(PercentageError::OutOfRange(value));
        }

        Ok(Self(value))
    }

    /// Get the raw percentage value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Validates on the way in so values read back from storage or JSON cannot
// bypass the range check.
impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
