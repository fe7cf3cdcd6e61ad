//! Dimension sequences and the matrices they describe.
//!
//! A chain of `n` matrices is described by `n + 1` positive integers
//! `p[0..=n]`, where matrix `i` (0-based) is `p[i] x p[i+1]`.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

/// Largest accepted dimension. Keeping dimensions within `u32` bounds every
/// pair cost below 2^96, so `u128` cost sums cannot overflow.
pub const MAX_DIMENSION: u64 = u32::MAX as u64;

/// Validated, immutable dimension sequence (length ≥ 2, all values in
/// `1..=MAX_DIMENSION`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DimensionSequence {
    dims: Vec<u64>,
}

/// One matrix of the chain, derived from two adjacent dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Matrix {
    /// 0-based position in the chain.
    pub index: usize,
    pub rows: u64,
    pub cols: u64,
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}({}×{})", self.index + 1, self.rows, self.cols)
    }
}

/// Validate raw textual tokens into a [`DimensionSequence`].
///
/// Each token is trimmed and must parse as an integer in
/// `1..=MAX_DIMENSION`. Token errors are reported before the length check,
/// so `["-1"]` fails as non-positive rather than too short.
pub fn validate<I, T>(raw: I) -> Result<DimensionSequence, ValidationError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut values = Vec::new();
    for (index, token) in raw.into_iter().enumerate() {
        let token = token.as_ref().trim();
        let value = token.parse::<i64>().map_err(|err| {
            let token = token.to_string();
            reject(match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ValidationError::OutOfRange { index, token }
                }
                _ => ValidationError::NonNumeric { index, token },
            })
        })?;
        values.push(value);
    }
    DimensionSequence::from_values(values)
}

/// `matrices[i] = { rows: dims[i], cols: dims[i+1] }`.
pub fn derive_matrices(dims: &DimensionSequence) -> Vec<Matrix> {
    dims.dims
        .windows(2)
        .enumerate()
        .map(|(index, pair)| Matrix {
            index,
            rows: pair[0],
            cols: pair[1],
        })
        .collect()
}

fn reject(err: ValidationError) -> ValidationError {
    #[cfg(feature = "tracing")]
    tracing::debug!(error = %err, "rejected dimension sequence");
    err
}

impl DimensionSequence {
    /// Validate already-numeric input.
    pub fn from_values<I>(values: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut dims = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            if value <= 0 {
                return Err(reject(ValidationError::NonPositive { index, value }));
            }
            if value as u64 > MAX_DIMENSION {
                return Err(reject(ValidationError::OutOfRange {
                    index,
                    token: value.to_string(),
                }));
            }
            dims.push(value as u64);
        }
        if dims.len() < 2 {
            return Err(reject(ValidationError::TooFew { count: dims.len() }));
        }
        Ok(Self { dims })
    }

    /// Parse a comma-separated list such as `"10, 20, 30, 40"`.
    ///
    /// Empty tokens (e.g. from a trailing comma) are rejected as non-numeric.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate(input.split(','))
    }

    /// Number of matrices in the chain (`len() - 1`).
    #[inline]
    pub fn num_matrices(&self) -> usize {
        self.dims.len() - 1
    }

    /// Number of dimensions; always at least 2.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.dims
    }

    pub fn matrices(&self) -> Vec<Matrix> {
        derive_matrices(self)
    }
}

impl std::ops::Index<usize> for DimensionSequence {
    type Output = u64;

    fn index(&self, idx: usize) -> &u64 {
        &self.dims[idx]
    }
}

impl FromStr for DimensionSequence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DimensionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, d) in self.dims.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_with_whitespace() {
        let dims = DimensionSequence::parse(" 10, 20 ,30,40 ").unwrap();
        assert_eq!(dims.as_slice(), &[10, 20, 30, 40]);
        assert_eq!(dims.num_matrices(), 3);
        assert_eq!(dims.to_string(), "10, 20, 30, 40");
    }

    #[test]
    fn rejects_non_positive_element() {
        let err = DimensionSequence::from_values([10, -5, 30]).unwrap_err();
        assert_eq!(err, ValidationError::NonPositive { index: 1, value: -5 });

        let err = DimensionSequence::parse("10, 0").unwrap_err();
        assert_eq!(err, ValidationError::NonPositive { index: 1, value: 0 });
    }

    #[test]
    fn rejects_insufficient_length() {
        assert_eq!(
            DimensionSequence::from_values([10]).unwrap_err(),
            ValidationError::TooFew { count: 1 }
        );
        assert_eq!(
            DimensionSequence::from_values(Vec::<i64>::new()).unwrap_err(),
            ValidationError::TooFew { count: 0 }
        );
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let err = DimensionSequence::parse("10, x, 30").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumeric {
                index: 1,
                token: "x".into()
            }
        );
        // Trailing comma yields an empty token.
        assert!(matches!(
            DimensionSequence::parse("10, 20,").unwrap_err(),
            ValidationError::NonNumeric { index: 2, .. }
        ));
    }

    #[test]
    fn rejects_dimensions_beyond_u32() {
        let big = 1i64 << 32;
        assert_eq!(
            DimensionSequence::from_values([1, big, big, 2]).unwrap_err(),
            ValidationError::OutOfRange {
                index: 1,
                token: "4294967296".into()
            }
        );
        let max = MAX_DIMENSION as i64;
        assert!(DimensionSequence::from_values([1, max, max, 2]).is_ok());
    }

    #[test]
    fn integers_wider_than_i64_are_out_of_range() {
        assert_eq!(
            DimensionSequence::parse("10, 99999999999999999999").unwrap_err(),
            ValidationError::OutOfRange {
                index: 1,
                token: "99999999999999999999".into()
            }
        );
        assert!(matches!(
            DimensionSequence::parse("-99999999999999999999, 5").unwrap_err(),
            ValidationError::OutOfRange { index: 0, .. }
        ));
        assert!(matches!(
            DimensionSequence::parse("10, 1e3").unwrap_err(),
            ValidationError::NonNumeric { index: 1, .. }
        ));
    }

    #[test]
    fn token_errors_win_over_length() {
        assert!(matches!(
            validate(["-1"]).unwrap_err(),
            ValidationError::NonPositive { index: 0, .. }
        ));
    }

    #[test]
    fn matrices_pair_adjacent_dims() {
        let dims: DimensionSequence = "10,30,5,60".parse().unwrap();
        let m = derive_matrices(&dims);
        assert_eq!(m.len(), 3);
        assert_eq!(
            m[1],
            Matrix {
                index: 1,
                rows: 30,
                cols: 5
            }
        );
        assert_eq!(m[2].to_string(), "A3(5×60)");
        for w in m.windows(2) {
            assert_eq!(w[0].cols, w[1].rows);
        }
    }
}
