//! Rating value type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a rating value falls outside the 1-5 range.
#[derive(thiserror::Error, Debug, Clone)]
#[error("rating must be between {} and {}, got {value}", RatingValue::MIN, RatingValue::MAX)]
pub struct RatingValueError {
    /// The rejected value.
    pub value: i64,
}

/// A star rating in the inclusive range 1-5.
///
/// Constructed through [`RatingValue::new`], which rejects out-of-range
/// values before they can reach the database. Database values are assumed
/// valid (a CHECK constraint guards the column).
///
/// ## Examples
///
/// ```
/// use shoprate_core::RatingValue;
///
/// assert!(RatingValue::new(1).is_ok());
/// assert!(RatingValue::new(5).is_ok());
/// assert!(RatingValue::new(0).is_err());
/// assert!(RatingValue::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(transparent))]
#[serde(transparent)]
pub struct RatingValue(i64);

impl RatingValue {
    /// Lowest accepted rating.
    pub const MIN: i64 = 1;
    /// Highest accepted rating.
    pub const MAX: i64 = 5;

    /// Create a rating value, rejecting anything outside [1, 5].
    ///
    /// # Errors
    ///
    /// Returns [`RatingValueError`] if `value` is out of range.
    pub const fn new(value: i64) -> Result<Self, RatingValueError> {
        if value >= Self::MIN && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(RatingValueError { value })
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for i64 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range() {
        for v in 1..=5 {
            assert_eq!(RatingValue::new(v).unwrap().as_i64(), v);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(RatingValue::new(0).is_err());
        assert!(RatingValue::new(6).is_err());
        assert!(RatingValue::new(-1).is_err());
        assert!(RatingValue::new(i64::MAX).is_err());
    }

    #[test]
    fn test_error_carries_value() {
        let err = RatingValue::new(9).unwrap_err();
        assert_eq!(err.value, 9);
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_serde_transparent() {
        let value = RatingValue::new(4).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), "4");
        let parsed: RatingValue = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, value);
    }
}
