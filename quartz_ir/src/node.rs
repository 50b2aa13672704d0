//! Expression tree nodes.
//!
//! The IR is an immutable, reference-counted expression tree. Consumers
//! (the rewrite engine in particular) hold `&Expr` borrows into a tree
//! owned by the caller; nothing in this crate mutates a node after
//! construction.
//!
//! - **Shared subtrees**: `Expr` is a cheap `Arc` handle, so a rewritten
//!   expression reuses the unmatched parts of its input wholesale.
//! - **Identity fast path**: structural equality early-exits when two
//!   handles point at the same node.
//! - **Grouped operators**: binary arithmetic and comparisons are single
//!   variants carrying an operator tag, so dispatch is a tag compare.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::types::Type;

// =============================================================================
// Operator Tags
// =============================================================================

/// Binary operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinOp {
    /// Addition: a + b
    Add = 0,
    /// Subtraction: a - b
    Sub = 1,
    /// Multiplication: a * b
    Mul = 2,
    /// Floor division: a / b
    Div = 3,
    /// Euclidean modulus: a % b
    Mod = 4,
    /// Minimum: min(a, b)
    Min = 5,
    /// Maximum: max(a, b)
    Max = 6,
    /// Boolean conjunction: a && b
    And = 7,
    /// Boolean disjunction: a || b
    Or = 8,
}

/// Comparison operator kind. Comparisons produce a `u1` truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CmpOp {
    /// Less than: a < b
    Lt = 0,
    /// Less than or equal: a <= b
    Le = 1,
    /// Greater than: a > b
    Gt = 2,
    /// Greater than or equal: a >= b
    Ge = 3,
    /// Equal: a == b
    Eq = 4,
    /// Not equal: a != b
    Ne = 5,
}

// =============================================================================
// Nodes
// =============================================================================

/// Argument list for intrinsic calls. Arity is almost always tiny.
pub type CallArgs = SmallVec<[Expr; 3]>;

/// Operation performed by an expression node.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Signed integer immediate.
    IntImm(i64),
    /// Unsigned integer immediate.
    UIntImm(u64),
    /// Floating-point immediate.
    FloatImm(f64),
    /// A free variable (also serves as an opaque leaf for node kinds the
    /// engine does not interpret).
    Var(Box<str>),
    /// A scalar value repeated across `lanes` vector lanes.
    Broadcast { value: Expr, lanes: u16 },
    /// The vector `[base, base+stride, base+2*stride, ...]`.
    Ramp { base: Expr, stride: Expr, lanes: u16 },
    /// Binary arithmetic or logical operation.
    Binary { op: BinOp, a: Expr, b: Expr },
    /// Comparison producing a `u1` truth value.
    Cmp { op: CmpOp, a: Expr, b: Expr },
    /// Boolean negation.
    Not { value: Expr },
    /// Lane-wise conditional.
    Select {
        cond: Expr,
        if_true: Expr,
        if_false: Expr,
    },
    /// Conversion to this node's type.
    Cast { value: Expr },
    /// Intrinsic call.
    Call {
        name: &'static str,
        args: CallArgs,
    },
}

/// A single expression node: a type plus an operation.
#[derive(Debug)]
pub struct ExprNode {
    ty: Type,
    kind: ExprKind,
}

/// A handle to an immutable expression tree.
#[derive(Debug, Clone)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    /// Wrap a node. Poison flags never appear on a constructed node; the
    /// emitter replaces poisoned constants with sentinel calls first.
    #[inline]
    pub(crate) fn new(ty: Type, kind: ExprKind) -> Self {
        debug_assert!(!ty.is_poisoned(), "IR node constructed with poisoned type");
        Expr(Arc::new(ExprNode { ty, kind }))
    }

    /// This expression's type.
    #[inline]
    pub fn ty(&self) -> Type {
        self.0.ty
    }

    /// This expression's operation.
    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Whether two handles refer to the same node.
    #[inline]
    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

// =============================================================================
// Structural Equality
// =============================================================================

/// Type-aware structural equality with a pointer-identity fast path.
///
/// Two expressions are equal when they have the same type, the same node
/// kind, and pairwise-equal children. Float immediates compare with IEEE
/// `==` (so `NaN != NaN`), matching the constant-wildcard repeat rule.
pub fn equal(a: &Expr, b: &Expr) -> bool {
    if Expr::ptr_eq(a, b) {
        return true;
    }
    if a.ty() != b.ty() {
        return false;
    }
    match (a.kind(), b.kind()) {
        (ExprKind::IntImm(x), ExprKind::IntImm(y)) => x == y,
        (ExprKind::UIntImm(x), ExprKind::UIntImm(y)) => x == y,
        (ExprKind::FloatImm(x), ExprKind::FloatImm(y)) => x == y,
        (ExprKind::Var(x), ExprKind::Var(y)) => x == y,
        (
            ExprKind::Broadcast { value: va, lanes: la },
            ExprKind::Broadcast { value: vb, lanes: lb },
        ) => la == lb && equal(va, vb),
        (
            ExprKind::Ramp {
                base: ba,
                stride: sa,
                lanes: la,
            },
            ExprKind::Ramp {
                base: bb,
                stride: sb,
                lanes: lb,
            },
        ) => la == lb && equal(ba, bb) && equal(sa, sb),
        (
            ExprKind::Binary { op: oa, a: aa, b: ab },
            ExprKind::Binary { op: ob, a: ba, b: bb },
        ) => oa == ob && equal(aa, ba) && equal(ab, bb),
        (ExprKind::Cmp { op: oa, a: aa, b: ab }, ExprKind::Cmp { op: ob, a: ba, b: bb }) => {
            oa == ob && equal(aa, ba) && equal(ab, bb)
        }
        (ExprKind::Not { value: va }, ExprKind::Not { value: vb }) => equal(va, vb),
        (
            ExprKind::Select {
                cond: ca,
                if_true: ta,
                if_false: fa,
            },
            ExprKind::Select {
                cond: cb,
                if_true: tb,
                if_false: fb,
            },
        ) => equal(ca, cb) && equal(ta, tb) && equal(fa, fb),
        (ExprKind::Cast { value: va }, ExprKind::Cast { value: vb }) => equal(va, vb),
        (
            ExprKind::Call { name: na, args: aa },
            ExprKind::Call { name: nb, args: ab },
        ) => {
            na == nb
                && aa.len() == ab.len()
                && aa.iter().zip(ab.iter()).all(|(x, y)| equal(x, y))
        }
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
