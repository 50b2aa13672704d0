//! Scalar value payloads for bound constants and fold results.
//!
//! A folded constant is a 64-bit payload plus a [`Type`] that says how to
//! read it. The payload is stored as raw bits and reinterpreted through
//! the accessors (floats round-trip through `to_bits`/`from_bits`), so
//! equality and copying are plain bit operations.

use quartz_ir::TypeCode;

// =============================================================================
// Scalar Value
// =============================================================================

/// A 64-bit scalar payload interpreted according to a type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarValue(u64);

impl ScalarValue {
    /// The all-zero payload (0, 0u, or +0.0 depending on the view).
    pub const ZERO: ScalarValue = ScalarValue(0);

    /// Payload holding a signed integer.
    #[inline]
    pub const fn from_i64(v: i64) -> Self {
        ScalarValue(v as u64)
    }

    /// Payload holding an unsigned integer.
    #[inline]
    pub const fn from_u64(v: u64) -> Self {
        ScalarValue(v)
    }

    /// Payload holding a float.
    #[inline]
    pub const fn from_f64(v: f64) -> Self {
        ScalarValue(v.to_bits())
    }

    /// Read as a signed integer.
    #[inline]
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }

    /// Read as an unsigned integer.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Read as a float.
    #[inline]
    pub const fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// An integer literal converted into the domain named by `code`.
    #[inline]
    pub fn literal(code: TypeCode, v: i64) -> Self {
        match code {
            TypeCode::Int => Self::from_i64(v),
            TypeCode::UInt => Self::from_u64(v as u64),
            TypeCode::Float => Self::from_f64(v as f64),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_views() {
        assert_eq!(ScalarValue::from_i64(-5).as_i64(), -5);
        assert_eq!(ScalarValue::from_u64(u64::MAX).as_u64(), u64::MAX);
        assert_eq!(ScalarValue::from_f64(1.5).as_f64(), 1.5);
    }

    #[test]
    fn test_negative_int_is_not_a_small_uint() {
        let v = ScalarValue::from_i64(-1);
        assert_eq!(v.as_u64(), u64::MAX);
    }

    #[test]
    fn test_literal_conversion() {
        assert_eq!(ScalarValue::literal(TypeCode::Int, -3).as_i64(), -3);
        assert_eq!(ScalarValue::literal(TypeCode::Float, 2).as_f64(), 2.0);
        assert_eq!(ScalarValue::literal(TypeCode::UInt, 7).as_u64(), 7);
    }
}
