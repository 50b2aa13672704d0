//! Pattern constructors and operator sugar.
//!
//! Rules read like the expressions they match: arithmetic uses the
//! standard operator traits (`wild(0) + 0`, `-wildc(1)`, `!wild(2)`),
//! comparisons and the rest use named builders (`lt`, `min`, `select`,
//! `fold`, ...). Integer literals and concrete expressions convert into
//! patterns implicitly where a builder takes `impl Into<Pattern>`.

use quartz_ir::{BinOp, CmpOp, Expr, Type};

use crate::pattern::Pattern;

#[inline]
fn boxed(p: impl Into<Pattern>) -> Box<Pattern> {
    Box::new(p.into())
}

// =============================================================================
// Wildcards
// =============================================================================

/// Subtree wildcard `i` (binds any expression).
#[inline]
pub fn wild(i: u8) -> Pattern {
    Pattern::Wild(i)
}

/// Constant wildcard `i` (binds any immediate, scalar or broadcast).
#[inline]
pub fn wildc(i: u8) -> Pattern {
    Pattern::WildConst(i)
}

/// Constant wildcard `i` restricted to signed immediates.
#[inline]
pub fn wildc_int(i: u8) -> Pattern {
    Pattern::WildConstInt(i)
}

/// Constant wildcard `i` restricted to unsigned immediates.
#[inline]
pub fn wildc_uint(i: u8) -> Pattern {
    Pattern::WildConstUInt(i)
}

/// Constant wildcard `i` restricted to float immediates.
#[inline]
pub fn wildc_float(i: u8) -> Pattern {
    Pattern::WildConstFloat(i)
}

// =============================================================================
// Structural Builders
// =============================================================================

fn binary(op: BinOp, a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    Pattern::Binary {
        op,
        a: boxed(a),
        b: boxed(b),
    }
}

fn cmp(op: CmpOp, a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    Pattern::Cmp {
        op,
        a: boxed(a),
        b: boxed(b),
    }
}

/// `min(a, b)`.
pub fn min(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    binary(BinOp::Min, a, b)
}

/// `max(a, b)`.
pub fn max(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    binary(BinOp::Max, a, b)
}

/// Boolean conjunction `a && b`.
pub fn and(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    binary(BinOp::And, a, b)
}

/// Boolean disjunction `a || b`.
pub fn or(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    binary(BinOp::Or, a, b)
}

/// `a < b`.
pub fn lt(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    cmp(CmpOp::Lt, a, b)
}

/// `a <= b`.
pub fn le(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    cmp(CmpOp::Le, a, b)
}

/// `a > b`.
pub fn gt(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    cmp(CmpOp::Gt, a, b)
}

/// `a >= b`.
pub fn ge(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    cmp(CmpOp::Ge, a, b)
}

/// `a == b`.
pub fn eq(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    cmp(CmpOp::Eq, a, b)
}

/// `a != b`.
pub fn ne(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    cmp(CmpOp::Ne, a, b)
}

/// `select(cond, if_true, if_false)`.
pub fn select(
    cond: impl Into<Pattern>,
    if_true: impl Into<Pattern>,
    if_false: impl Into<Pattern>,
) -> Pattern {
    Pattern::Select {
        cond: boxed(cond),
        if_true: boxed(if_true),
        if_false: boxed(if_false),
    }
}

/// A broadcast of `value`; pass `None` to match any lane count.
pub fn broadcast(value: impl Into<Pattern>, lanes: impl Into<Option<u16>>) -> Pattern {
    Pattern::Broadcast {
        value: boxed(value),
        lanes: lanes.into(),
    }
}

/// A ramp; pass `None` to match any lane count.
pub fn ramp(
    base: impl Into<Pattern>,
    stride: impl Into<Pattern>,
    lanes: impl Into<Option<u16>>,
) -> Pattern {
    Pattern::Ramp {
        base: boxed(base),
        stride: boxed(stride),
        lanes: lanes.into(),
    }
}

/// A cast of `value` to `ty`.
pub fn cast(ty: Type, value: impl Into<Pattern>) -> Pattern {
    Pattern::Cast {
        ty,
        value: boxed(value),
    }
}

/// An intrinsic call matched by name and positional arguments.
pub fn intrin(name: &'static str, args: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Intrin {
        name,
        args: args.into_iter().collect(),
    }
}

// =============================================================================
// Predicate Helpers
// =============================================================================

/// Rebuilds as the constant-folded value of `value` (rhs position).
pub fn fold(value: impl Into<Pattern>) -> Pattern {
    Pattern::Fold {
        value: boxed(value),
    }
}

/// True iff `value` rebuilds to a constant (predicate position).
pub fn is_const(value: impl Into<Pattern>) -> Pattern {
    Pattern::IsConst {
        value: boxed(value),
    }
}

/// True iff the rewriter's prover simplifies `value` to one (predicate
/// position).
pub fn can_prove(value: impl Into<Pattern>) -> Pattern {
    Pattern::CanProve {
        value: boxed(value),
    }
}

/// `gcd(a, b)` over signed integer constants (predicate position).
pub fn gcd(a: impl Into<Pattern>, b: impl Into<Pattern>) -> Pattern {
    Pattern::Gcd {
        a: boxed(a),
        b: boxed(b),
    }
}

/// Fold `value`, store it into the constant wildcard `target`, and
/// evaluate to true (predicate position).
pub fn bind(target: Pattern, value: impl Into<Pattern>) -> Pattern {
    let index = match target {
        Pattern::WildConst(i)
        | Pattern::WildConstInt(i)
        | Pattern::WildConstUInt(i)
        | Pattern::WildConstFloat(i) => i,
        _ => unreachable!("bind target must be a constant wildcard"),
    };
    Pattern::Bind {
        index,
        value: boxed(value),
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Pattern {
    fn from(v: i64) -> Pattern {
        Pattern::Const(v)
    }
}

impl From<i32> for Pattern {
    fn from(v: i32) -> Pattern {
        Pattern::Const(v as i64)
    }
}

impl From<Expr> for Pattern {
    fn from(e: Expr) -> Pattern {
        Pattern::Fragment(e)
    }
}

impl From<&Expr> for Pattern {
    fn from(e: &Expr) -> Pattern {
        Pattern::Fragment(e.clone())
    }
}

// =============================================================================
// Operator Overloads
// =============================================================================

impl<R: Into<Pattern>> std::ops::Add<R> for Pattern {
    type Output = Pattern;
    fn add(self, rhs: R) -> Pattern {
        binary(BinOp::Add, self, rhs)
    }
}

impl<R: Into<Pattern>> std::ops::Sub<R> for Pattern {
    type Output = Pattern;
    fn sub(self, rhs: R) -> Pattern {
        binary(BinOp::Sub, self, rhs)
    }
}

impl<R: Into<Pattern>> std::ops::Mul<R> for Pattern {
    type Output = Pattern;
    fn mul(self, rhs: R) -> Pattern {
        binary(BinOp::Mul, self, rhs)
    }
}

impl<R: Into<Pattern>> std::ops::Div<R> for Pattern {
    type Output = Pattern;
    fn div(self, rhs: R) -> Pattern {
        binary(BinOp::Div, self, rhs)
    }
}

impl<R: Into<Pattern>> std::ops::Rem<R> for Pattern {
    type Output = Pattern;
    fn rem(self, rhs: R) -> Pattern {
        binary(BinOp::Mod, self, rhs)
    }
}

impl std::ops::Neg for Pattern {
    type Output = Pattern;
    fn neg(self) -> Pattern {
        Pattern::Negate {
            value: Box::new(self),
        }
    }
}

impl std::ops::Not for Pattern {
    type Output = Pattern;
    fn not(self) -> Pattern {
        Pattern::Not {
            value: Box::new(self),
        }
    }
}

impl std::ops::Add<Pattern> for i64 {
    type Output = Pattern;
    fn add(self, rhs: Pattern) -> Pattern {
        binary(BinOp::Add, self, rhs)
    }
}

impl std::ops::Sub<Pattern> for i64 {
    type Output = Pattern;
    fn sub(self, rhs: Pattern) -> Pattern {
        binary(BinOp::Sub, self, rhs)
    }
}

impl std::ops::Mul<Pattern> for i64 {
    type Output = Pattern;
    fn mul(self, rhs: Pattern) -> Pattern {
        binary(BinOp::Mul, self, rhs)
    }
}

impl std::ops::Div<Pattern> for i64 {
    type Output = Pattern;
    fn div(self, rhs: Pattern) -> Pattern {
        binary(BinOp::Div, self, rhs)
    }
}

impl std::ops::Rem<Pattern> for i64 {
    type Output = Pattern;
    fn rem(self, rhs: Pattern) -> Pattern {
        binary(BinOp::Mod, self, rhs)
    }
}

// =============================================================================
// Tests
// =============================================================================
