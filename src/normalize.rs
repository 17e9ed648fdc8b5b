//! Canonical numeric tokens for the wire protocol.
//!
//! Every numeric argument (coordinates, radii, box dimensions, counts) is
//! rendered through [`GeoNumber`] so that all entry points share one
//! normalization path instead of one method per scalar type.

use crate::error::{Error, Result};

/// A numeric value that can be rendered as a canonical wire token.
///
/// The token is a plain decimal string: `.` as the decimal separator
/// regardless of host locale, no grouping, no forced trailing zeros, and no
/// exponent notation. The same value always renders to the same token, and
/// the token parses back to the same value.
///
/// Implemented for all primitive integer and floating-point types.
pub trait GeoNumber: Copy {
    /// Render as a canonical decimal token.
    ///
    /// Fails with [`Error::InvalidArgument`] for NaN or infinite values.
    fn to_token(self) -> Result<String>;
}

macro_rules! impl_geo_number_int {
    ($($t:ty),*) => {$(
        impl GeoNumber for $t {
            fn to_token(self) -> Result<String> {
                Ok(self.to_string())
            }
        }
    )*};
}

impl_geo_number_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

macro_rules! impl_geo_number_float {
    ($($t:ty),*) => {$(
        impl GeoNumber for $t {
            fn to_token(self) -> Result<String> {
                if !self.is_finite() {
                    return Err(Error::InvalidArgument(format!(
                        "numeric argument must be finite, got {}",
                        self
                    )));
                }
                // Display for floats is locale-free, uses `.`, and prints
                // the shortest round-tripping form without an exponent.
                Ok(self.to_string())
            }
        }
    )*};
}

impl_geo_number_float!(f32, f64);
