//! Validation errors for dimension sequences.
//!
//! Validation is the only fallible stage of the crate: once a
//! [`DimensionSequence`](crate::dims::DimensionSequence) exists, planning,
//! reconstruction and step enumeration are total.

/// Why a raw dimension sequence was rejected.
///
/// `index` is the 0-based position of the offending element in the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("dimension {index} ('{token}') is not an integer")]
    NonNumeric { index: usize, token: String },

    #[error("dimension {index} must be positive, got {value}")]
    NonPositive { index: usize, value: i64 },

    #[error("dimension {index} ('{token}') is outside 1..={max}", max = crate::dims::MAX_DIMENSION)]
    OutOfRange { index: usize, token: String },

    #[error("need at least 2 dimensions (1 matrix), got {count}")]
    TooFew { count: usize },
}

impl ValidationError {
    /// Position of the offending element, if the error points at one.
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::NonNumeric { index, .. }
            | ValidationError::NonPositive { index, .. }
            | ValidationError::OutOfRange { index, .. } => Some(*index),
            ValidationError::TooFew { .. } => None,
        }
    }
}
