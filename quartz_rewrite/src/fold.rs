//! Constant-fold kernels.
//!
//! One kernel per operator and domain (signed, unsigned, float). The
//! kernels are exact under the target bit width:
//!
//! - Signed add/sub/mul compute in 64 bits, then truncate-and-sign-extend
//!   to the result width. If the width is at least 32 bits and the exact
//!   mathematical result does not fit, the `OVERFLOW` poison flag is set
//!   on the result type.
//! - Unsigned add/sub/mul wrap (masked to the width); wrap is defined, so
//!   no flag is set.
//! - Integer division and modulus by zero set `INDETERMINATE` and yield
//!   payload 0. Division rounds toward negative infinity and the modulus
//!   is non-negative for a positive divisor.
//! - Comparisons yield a `u1` truth payload; the caller unions lanes.
//!
//! Boolean `And`/`Or` are only defined in the unsigned domain; the rule
//! sugar never produces them elsewhere, so the signed/float entries are
//! rule-author errors.

use quartz_ir::{BinOp, CmpOp, Type, TypeCode};

use crate::value::ScalarValue;

// =============================================================================
// Width Helpers
// =============================================================================

/// Truncate to `bits` and sign-extend back to 64.
#[inline]
pub(crate) const fn sign_extend(v: i64, bits: u8) -> i64 {
    let dead = 64 - bits as u32;
    (v << dead) >> dead
}

/// Mask to the low `bits`.
#[inline]
pub(crate) const fn mask_to(v: u64, bits: u8) -> u64 {
    v & (u64::MAX >> (64 - bits as u32))
}

/// Whether `a + b` leaves the range of a `bits`-wide signed type.
pub(crate) fn add_would_overflow(bits: u8, a: i64, b: i64) -> bool {
    match a.checked_add(b) {
        None => true,
        Some(r) => bits < 64 && sign_extend(r, bits) != r,
    }
}

/// Whether `a - b` leaves the range of a `bits`-wide signed type.
pub(crate) fn sub_would_overflow(bits: u8, a: i64, b: i64) -> bool {
    match a.checked_sub(b) {
        None => true,
        Some(r) => bits < 64 && sign_extend(r, bits) != r,
    }
}

/// Whether `a * b` leaves the range of a `bits`-wide signed type.
pub(crate) fn mul_would_overflow(bits: u8, a: i64, b: i64) -> bool {
    match a.checked_mul(b) {
        None => true,
        Some(r) => bits < 64 && sign_extend(r, bits) != r,
    }
}

/// Floor division: rounds toward negative infinity.
#[inline]
pub(crate) fn div_floor(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Euclidean-style modulus: `a - b * div_floor(a, b)`, so the result has
/// the divisor's sign (non-negative for positive `b`).
#[inline]
pub(crate) fn mod_floor(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// Non-negative gcd with `gcd(x, 0) = |x|` and `gcd(0, 0) = 0`.
pub(crate) fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a as i64
}

// =============================================================================
// Binary Kernels
// =============================================================================

fn fold_bin_i64(op: BinOp, ty: &mut Type, a: i64, b: i64) -> i64 {
    match op {
        BinOp::Add => {
            if ty.bits >= 32 && add_would_overflow(ty.bits, a, b) {
                ty.lanes |= Type::OVERFLOW;
            }
            sign_extend(a.wrapping_add(b), ty.bits)
        }
        BinOp::Sub => {
            if ty.bits >= 32 && sub_would_overflow(ty.bits, a, b) {
                ty.lanes |= Type::OVERFLOW;
            }
            sign_extend(a.wrapping_sub(b), ty.bits)
        }
        BinOp::Mul => {
            if ty.bits >= 32 && mul_would_overflow(ty.bits, a, b) {
                ty.lanes |= Type::OVERFLOW;
            }
            sign_extend(a.wrapping_mul(b), ty.bits)
        }
        BinOp::Div => {
            if b == 0 {
                ty.lanes |= Type::INDETERMINATE;
                0
            } else {
                div_floor(a, b)
            }
        }
        BinOp::Mod => {
            if b == 0 {
                ty.lanes |= Type::INDETERMINATE;
                0
            } else {
                mod_floor(a, b)
            }
        }
        BinOp::Min => a.min(b),
        BinOp::Max => a.max(b),
        BinOp::And | BinOp::Or => {
            debug_assert!(false, "boolean fold in the signed domain");
            0
        }
    }
}

fn fold_bin_u64(op: BinOp, ty: &mut Type, a: u64, b: u64) -> u64 {
    match op {
        BinOp::Add => mask_to(a.wrapping_add(b), ty.bits),
        BinOp::Sub => mask_to(a.wrapping_sub(b), ty.bits),
        BinOp::Mul => mask_to(a.wrapping_mul(b), ty.bits),
        BinOp::Div => {
            if b == 0 {
                ty.lanes |= Type::INDETERMINATE;
                0
            } else {
                a / b
            }
        }
        BinOp::Mod => {
            if b == 0 {
                ty.lanes |= Type::INDETERMINATE;
                0
            } else {
                a % b
            }
        }
        BinOp::Min => a.min(b),
        BinOp::Max => a.max(b),
        BinOp::And => a & b,
        BinOp::Or => a | b,
    }
}

fn fold_bin_f64(op: BinOp, _ty: &mut Type, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Mod => a - b * (a / b).floor(),
        BinOp::Min => a.min(b),
        BinOp::Max => a.max(b),
        BinOp::And | BinOp::Or => {
            debug_assert!(false, "boolean fold in the float domain");
            0.0
        }
    }
}

/// Fold a binary operation in the domain named by `ty.code`, recording
/// poison on `ty`.
pub(crate) fn fold_bin(op: BinOp, ty: &mut Type, a: ScalarValue, b: ScalarValue) -> ScalarValue {
    match ty.code {
        TypeCode::Int => ScalarValue::from_i64(fold_bin_i64(op, ty, a.as_i64(), b.as_i64())),
        TypeCode::UInt => ScalarValue::from_u64(fold_bin_u64(op, ty, a.as_u64(), b.as_u64())),
        TypeCode::Float => ScalarValue::from_f64(fold_bin_f64(op, ty, a.as_f64(), b.as_f64())),
    }
}

// =============================================================================
// Comparison Kernels
// =============================================================================

fn fold_cmp_ord<T: PartialOrd>(op: CmpOp, a: T, b: T) -> u64 {
    let r = match op {
        CmpOp::Lt => a < b,
        CmpOp::Le => a <= b,
        CmpOp::Gt => a > b,
        CmpOp::Ge => a >= b,
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
    };
    r as u64
}

/// Fold a comparison over operands in the domain named by `code`,
/// yielding a `u1` truth payload.
pub(crate) fn fold_cmp(op: CmpOp, code: TypeCode, a: ScalarValue, b: ScalarValue) -> u64 {
    match code {
        TypeCode::Int => fold_cmp_ord(op, a.as_i64(), b.as_i64()),
        TypeCode::UInt => fold_cmp_ord(op, a.as_u64(), b.as_u64()),
        TypeCode::Float => fold_cmp_ord(op, a.as_f64(), b.as_f64()),
    }
}

// =============================================================================
// Negation
// =============================================================================

/// Fold unary negation, recording `OVERFLOW` on `ty` when negating the
/// most negative value of a 32-bit-or-wider signed type.
pub(crate) fn fold_negate(ty: &mut Type, v: ScalarValue) -> ScalarValue {
    match ty.code {
        TypeCode::Int => {
            let x = v.as_i64();
            if ty.bits >= 32 && x != 0 && (x << (65 - ty.bits as u32)) == 0 {
                ty.lanes |= Type::OVERFLOW;
                v
            } else {
                ScalarValue::from_i64(sign_extend(x.wrapping_neg(), ty.bits))
            }
        }
        TypeCode::UInt => ScalarValue::from_u64(mask_to(0u64.wrapping_sub(v.as_u64()), ty.bits)),
        TypeCode::Float => ScalarValue::from_f64(-v.as_f64()),
    }
}

// =============================================================================
// Tests
// =============================================================================
