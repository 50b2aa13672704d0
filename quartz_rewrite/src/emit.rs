//! Rebuilding IR from folded constants and matched operands.
//!
//! Three responsibilities:
//! - Turn a `(value, type)` pair back into an expression, reconstituting
//!   the `Broadcast` implied by a vector lane count.
//! - Replace poisoned fold results with reserved sentinel intrinsics.
//!   Each sentinel carries a fresh tag from a process-wide counter so two
//!   unrelated undefined values never compare structurally equal (the
//!   host simplifier must not merge them).
//! - Insert a `Broadcast` on the scalar side when an emitted binary
//!   operation mixes scalar and vector operands.

use std::sync::atomic::{AtomicU32, Ordering};

use quartz_ir::{make_const, Expr, Type, TypeCode};
use smallvec::smallvec;

use crate::value::ScalarValue;

/// Sentinel intrinsic emitted for a fold that overflowed signed range.
pub const SIGNED_INTEGER_OVERFLOW: &str = "signed_integer_overflow";

/// Sentinel intrinsic emitted for a division or modulus by zero.
pub const INDETERMINATE_EXPRESSION: &str = "indeterminate_expression";

/// Tag source for sentinel intrinsics. Uniqueness is all that matters;
/// the engine is single-threaded per invocation but outer simplifier
/// calls may run concurrently.
static POISON_TAG: AtomicU32 = AtomicU32::new(0);

/// Build the sentinel call for a poisoned type. Indeterminate wins when
/// both flags are set.
fn poison_to_expr(ty: Type) -> Expr {
    let tag = POISON_TAG.fetch_add(1, Ordering::Relaxed);
    let name = if ty.poison_flags() & Type::INDETERMINATE != 0 {
        INDETERMINATE_EXPRESSION
    } else {
        SIGNED_INTEGER_OVERFLOW
    };
    Expr::call(
        ty.clear_poison(),
        name,
        smallvec![make_const(Type::int(32), tag as i64)],
    )
}

/// Turn a folded constant back into an expression.
///
/// Vector types emit a `Broadcast` of the scalar immediate; poisoned
/// types emit a sentinel intrinsic instead.
pub fn const_to_expr(val: ScalarValue, ty: Type) -> Expr {
    if ty.is_poisoned() {
        return poison_to_expr(ty);
    }
    let elem = ty.element_of();
    let e = match ty.code {
        TypeCode::Int => Expr::int_imm(elem, val.as_i64()),
        TypeCode::UInt => Expr::uint_imm(elem, val.as_u64()),
        TypeCode::Float => Expr::float_imm(elem, val.as_f64()),
    };
    let lanes = ty.lane_count();
    if lanes > 1 {
        Expr::broadcast(e, lanes)
    } else {
        e
    }
}

/// Broadcast the scalar side of a mixed scalar/vector operand pair to the
/// vector side's lane count. Rewrite rules mix the two freely.
pub(crate) fn match_lanes(a: Expr, b: Expr) -> (Expr, Expr) {
    if a.ty().is_vector() && !b.ty().is_vector() {
        let lanes = a.ty().lane_count();
        let b = Expr::broadcast(b, lanes);
        (a, b)
    } else if b.ty().is_vector() && !a.ty().is_vector() {
        let lanes = b.ty().lane_count();
        let a = Expr::broadcast(a, lanes);
        (a, b)
    } else {
        (a, b)
    }
}

// =============================================================================
// Tests
// =============================================================================
