//! The pattern algebra.
//!
//! A [`Pattern`] describes the shape of an expression with holes:
//! subtree wildcards (`_0`..`_4`), constant wildcards (`c0`..`c4`, with
//! int/uint/float-restricted variants), literals, and structural nodes
//! mirroring the IR. Predicate-position helpers (`fold`, `is_const`,
//! `can_prove`, `gcd`, `bind`) evaluate over bound constants.
//!
//! Every variant supports up to three capabilities (not all are
//! meaningful everywhere):
//! - [`Pattern::matches`]: attempt to bind against an expression. On
//!   failure the state is safe to discard, not safe to reuse.
//! - [`Pattern::make`]: rebuild an expression from bindings (rhs
//!   position).
//! - [`Pattern::fold_const`]: evaluate to a `(value, type)` constant
//!   (predicate position and `fold(...)`).
//!
//! # Bound-mask threading
//!
//! Matching threads a bit-set of already-bound wildcards left to right:
//! a binary pattern matches its left child under the incoming mask and
//! its right child under `mask | left.binds()`. A sub-matcher therefore
//! knows whether each of its wildcards is a first or repeat occurrence,
//! and the repeat branch reduces to an equality check. Constant wildcard
//! `i` occupies mask bit `i`; subtree wildcard `i` occupies bit `i + 16`.

use quartz_ir::{equal, make_const, BinOp, CmpOp, Expr, ExprKind, Type, TypeCode};

use crate::emit;
use crate::fold;
use crate::rewrite::Prover;
use crate::state::{const_bit, subtree_bit, MatcherState, MAX_WILD};
use crate::value::ScalarValue;

// =============================================================================
// Pattern
// =============================================================================

/// A declarative expression pattern.
///
/// Built with the constructors in [`crate::sugar`], which also provide
/// arithmetic operator overloads so rules read like the expressions they
/// match.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches any subtree; repeat occurrences must be structurally equal
    /// to the first.
    Wild(u8),
    /// Matches any immediate (under an optional broadcast), binding the
    /// scalar value and the matched expression's type.
    WildConst(u8),
    /// As `WildConst`, restricted to signed immediates.
    WildConstInt(u8),
    /// As `WildConst`, restricted to unsigned immediates.
    WildConstUInt(u8),
    /// As `WildConst`, restricted to float immediates.
    WildConstFloat(u8),
    /// Matches a specific literal of any immediate kind (under an
    /// optional broadcast), with integer-to-float conversion.
    Const(i64),
    /// A concrete expression fragment: matches by structural equality,
    /// rebuilds by clone.
    Fragment(Expr),
    /// A binary operation whose children match left to right.
    Binary {
        op: BinOp,
        a: Box<Pattern>,
        b: Box<Pattern>,
    },
    /// A comparison whose children match left to right.
    Cmp {
        op: CmpOp,
        a: Box<Pattern>,
        b: Box<Pattern>,
    },
    /// Boolean negation.
    Not { value: Box<Pattern> },
    /// A select; the mask threads condition, then true arm, then false.
    Select {
        cond: Box<Pattern>,
        if_true: Box<Pattern>,
        if_false: Box<Pattern>,
    },
    /// A broadcast; `lanes: None` matches any lane count (and cannot be
    /// rebuilt).
    Broadcast {
        value: Box<Pattern>,
        lanes: Option<u16>,
    },
    /// A ramp; `lanes: None` matches any lane count (and cannot be
    /// rebuilt).
    Ramp {
        base: Box<Pattern>,
        stride: Box<Pattern>,
        lanes: Option<u16>,
    },
    /// `-a`, which in the IR is the subtraction `0 - a`.
    Negate { value: Box<Pattern> },
    /// A cast to `ty`; the target type of the candidate is not inspected.
    Cast { ty: Type, value: Box<Pattern> },
    /// An intrinsic call matched by name and positional arguments.
    Intrin {
        name: &'static str,
        args: Vec<Pattern>,
    },
    /// Rhs-only: rebuilds as the constant-folded value of its operand.
    Fold { value: Box<Pattern> },
    /// Predicate-only: true iff the operand rebuilds to a constant.
    IsConst { value: Box<Pattern> },
    /// Predicate-only: true iff the injected prover simplifies the
    /// operand to the constant one.
    CanProve { value: Box<Pattern> },
    /// Predicate helper: gcd of two signed integer constants.
    Gcd { a: Box<Pattern>, b: Box<Pattern> },
    /// Predicate-position: folds the operand, stores it into constant
    /// wildcard `index`, and evaluates to true.
    Bind { index: u8, value: Box<Pattern> },
}

/// Evaluation context for `make` and `fold_const`: the match state plus
/// the optional prover consulted by `can_prove`.
pub struct EvalCx<'e, 'p, 'q> {
    pub(crate) state: &'p mut MatcherState<'e>,
    pub(crate) prover: Option<&'q mut dyn Prover>,
}

impl<'e, 'p, 'q> EvalCx<'e, 'p, 'q> {
    /// Context over an existing match state.
    pub fn new(state: &'p mut MatcherState<'e>, prover: Option<&'q mut dyn Prover>) -> Self {
        EvalCx { state, prover }
    }
}

/// Strip one level of broadcast, exposing the scalar underneath.
#[inline]
fn peel_broadcast(e: &Expr) -> &Expr {
    if let ExprKind::Broadcast { value, .. } = e.kind() {
        value
    } else {
        e
    }
}

impl Pattern {
    /// The mask bits this pattern binds when it matches.
    pub fn binds(&self) -> u32 {
        match self {
            Pattern::Wild(i) => subtree_bit(*i),
            Pattern::WildConst(i)
            | Pattern::WildConstInt(i)
            | Pattern::WildConstUInt(i)
            | Pattern::WildConstFloat(i) => const_bit(*i),
            Pattern::Const(_) | Pattern::Fragment(_) => 0,
            Pattern::Binary { a, b, .. } | Pattern::Cmp { a, b, .. } | Pattern::Gcd { a, b } => {
                a.binds() | b.binds()
            }
            Pattern::Not { value }
            | Pattern::Broadcast { value, .. }
            | Pattern::Negate { value }
            | Pattern::Cast { value, .. }
            | Pattern::Fold { value }
            | Pattern::IsConst { value }
            | Pattern::CanProve { value } => value.binds(),
            Pattern::Select {
                cond,
                if_true,
                if_false,
            } => cond.binds() | if_true.binds() | if_false.binds(),
            Pattern::Ramp { base, stride, .. } => base.binds() | stride.binds(),
            Pattern::Intrin { args, .. } => args.iter().fold(0, |m, p| m | p.binds()),
            Pattern::Bind { index, value } => value.binds() | const_bit(*index),
        }
    }

    /// Literal payload, if this is a `Const` pattern.
    #[inline]
    fn as_literal(&self) -> Option<i64> {
        if let Pattern::Const(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    // =========================================================================
    // Matching
    // =========================================================================

    /// Attempt to match `e`, binding wildcards into `state`.
    ///
    /// Structural mismatches return `false` with no side effect on the
    /// caller; a partially written state is safe to discard.
    #[inline]
    pub fn matches<'e>(&self, e: &'e Expr, state: &mut MatcherState<'e>) -> bool {
        self.match_with(e, 0, state)
    }

    pub(crate) fn match_with<'e>(
        &self,
        e: &'e Expr,
        bound: u32,
        state: &mut MatcherState<'e>,
    ) -> bool {
        match self {
            Pattern::Wild(i) => {
                debug_assert!((*i as usize) < MAX_WILD, "wildcard index out of range");
                if bound & subtree_bit(*i) != 0 {
                    equal(state.binding(*i), e)
                } else {
                    state.set_binding(*i, e);
                    true
                }
            }
            Pattern::WildConst(i) => match peel_broadcast(e).kind() {
                ExprKind::IntImm(_) => match_wild_const_int(*i, e, bound, state),
                ExprKind::UIntImm(_) => match_wild_const_uint(*i, e, bound, state),
                ExprKind::FloatImm(_) => match_wild_const_float(*i, e, bound, state),
                _ => false,
            },
            Pattern::WildConstInt(i) => match_wild_const_int(*i, e, bound, state),
            Pattern::WildConstUInt(i) => match_wild_const_uint(*i, e, bound, state),
            Pattern::WildConstFloat(i) => match_wild_const_float(*i, e, bound, state),
            Pattern::Const(n) => match peel_broadcast(e).kind() {
                ExprKind::IntImm(v) => *v == *n,
                ExprKind::UIntImm(v) => *v == *n as u64,
                ExprKind::FloatImm(v) => *v == *n as f64,
                _ => false,
            },
            Pattern::Fragment(fragment) => equal(fragment, e),
            Pattern::Binary { op, a, b } => {
                if let ExprKind::Binary {
                    op: eop,
                    a: ea,
                    b: eb,
                } = e.kind()
                {
                    *eop == *op
                        && a.match_with(ea, bound, state)
                        && b.match_with(eb, bound | a.binds(), state)
                } else {
                    false
                }
            }
            Pattern::Cmp { op, a, b } => {
                if let ExprKind::Cmp {
                    op: eop,
                    a: ea,
                    b: eb,
                } = e.kind()
                {
                    *eop == *op
                        && a.match_with(ea, bound, state)
                        && b.match_with(eb, bound | a.binds(), state)
                } else {
                    false
                }
            }
            Pattern::Not { value } => {
                if let ExprKind::Not { value: ev } = e.kind() {
                    value.match_with(ev, bound, state)
                } else {
                    false
                }
            }
            Pattern::Select {
                cond,
                if_true,
                if_false,
            } => {
                if let ExprKind::Select {
                    cond: ec,
                    if_true: et,
                    if_false: ef,
                } = e.kind()
                {
                    cond.match_with(ec, bound, state)
                        && if_true.match_with(et, bound | cond.binds(), state)
                        && if_false
                            .match_with(ef, bound | cond.binds() | if_true.binds(), state)
                } else {
                    false
                }
            }
            Pattern::Broadcast { value, lanes } => {
                if let ExprKind::Broadcast {
                    value: ev,
                    lanes: el,
                } = e.kind()
                {
                    lanes.map_or(true, |l| l == *el) && value.match_with(ev, bound, state)
                } else {
                    false
                }
            }
            Pattern::Ramp {
                base,
                stride,
                lanes,
            } => {
                if let ExprKind::Ramp {
                    base: eb,
                    stride: es,
                    lanes: el,
                } = e.kind()
                {
                    lanes.map_or(true, |l| l == *el)
                        && base.match_with(eb, bound, state)
                        && stride.match_with(es, bound | base.binds(), state)
                } else {
                    false
                }
            }
            Pattern::Negate { value } => {
                if let ExprKind::Binary {
                    op: BinOp::Sub,
                    a: ea,
                    b: eb,
                } = e.kind()
                {
                    value.match_with(eb, bound, state) && ea.is_zero()
                } else {
                    false
                }
            }
            Pattern::Cast { value, .. } => {
                if let ExprKind::Cast { value: ev } = e.kind() {
                    value.match_with(ev, bound, state)
                } else {
                    false
                }
            }
            Pattern::Intrin { name, args } => {
                if let ExprKind::Call {
                    name: ename,
                    args: eargs,
                } = e.kind()
                {
                    if ename != name || eargs.len() != args.len() {
                        return false;
                    }
                    let mut mask = bound;
                    for (p, ea) in args.iter().zip(eargs.iter()) {
                        if !p.match_with(ea, mask, state) {
                            return false;
                        }
                        mask |= p.binds();
                    }
                    true
                } else {
                    false
                }
            }
            Pattern::Fold { .. }
            | Pattern::IsConst { .. }
            | Pattern::CanProve { .. }
            | Pattern::Gcd { .. }
            | Pattern::Bind { .. } => {
                debug_assert!(false, "predicate-only pattern used on the lhs of a rule");
                false
            }
        }
    }

    // =========================================================================
    // Folding
    // =========================================================================

    /// Evaluate this pattern to a `(value, type)` constant over the bound
    /// state. Poison accumulates in the type's lane flags.
    pub fn fold_const(&self, cx: &mut EvalCx<'_, '_, '_>) -> (ScalarValue, Type) {
        match self {
            Pattern::WildConst(i)
            | Pattern::WildConstInt(i)
            | Pattern::WildConstUInt(i)
            | Pattern::WildConstFloat(i) => cx.state.bound_const(*i),
            Pattern::Binary { op, a, b } => fold_binary(*op, a, b, cx),
            Pattern::Cmp { op, a, b } => fold_cmp(*op, a, b, cx),
            Pattern::Not { value } => {
                let (v, ty) = value.fold_const(cx);
                let flipped = if v.as_u64() == 0 { 1 } else { 0 };
                (ScalarValue::from_u64(flipped), ty)
            }
            Pattern::Negate { value } => {
                let (v, mut ty) = value.fold_const(cx);
                let v = fold::fold_negate(&mut ty, v);
                (v, ty)
            }
            // `fold` is transparent in predicate position.
            Pattern::Fold { value } => value.fold_const(cx),
            Pattern::IsConst { value } => {
                let e = value.make(cx);
                (
                    ScalarValue::from_u64(e.is_const() as u64),
                    Type::bool_scalar(),
                )
            }
            Pattern::CanProve { value } => {
                let e = value.make(cx);
                let Some(prover) = cx.prover.as_deref_mut() else {
                    debug_assert!(false, "can_prove used on a rewriter without a prover");
                    return (ScalarValue::ZERO, Type::bool_scalar());
                };
                let simplified = prover.mutate(&e);
                let lanes = simplified.ty().lane_count();
                (
                    ScalarValue::from_u64(simplified.is_one() as u64),
                    Type::bool_scalar().with_lanes(lanes),
                )
            }
            Pattern::Gcd { a, b } => {
                let (va, ta) = a.fold_const(cx);
                let (vb, tb) = b.fold_const(cx);
                debug_assert!(
                    ta.code == TypeCode::Int
                        && ta.bits >= 32
                        && tb.code == TypeCode::Int
                        && tb.bits >= 32,
                    "gcd requires signed integers of at least 32 bits"
                );
                let mut ty = ta;
                ty.lanes |= tb.lanes;
                (ScalarValue::from_i64(fold::gcd(va.as_i64(), vb.as_i64())), ty)
            }
            Pattern::Bind { index, value } => {
                let (v, ty) = value.fold_const(cx);
                cx.state.set_bound_const(*index, v, ty);
                (ScalarValue::from_u64(1), Type::bool_scalar())
            }
            Pattern::Wild(_)
            | Pattern::Const(_)
            | Pattern::Fragment(_)
            | Pattern::Select { .. }
            | Pattern::Broadcast { .. }
            | Pattern::Ramp { .. }
            | Pattern::Cast { .. }
            | Pattern::Intrin { .. } => {
                debug_assert!(false, "pattern cannot be constant-folded");
                (ScalarValue::ZERO, Type::bool_scalar())
            }
        }
    }

    // =========================================================================
    // Rebuilding
    // =========================================================================

    /// Rebuild an expression from the bound state.
    pub fn make(&self, cx: &mut EvalCx<'_, '_, '_>) -> Expr {
        match self {
            Pattern::Wild(i) => cx.state.binding(*i).clone(),
            Pattern::WildConst(i)
            | Pattern::WildConstInt(i)
            | Pattern::WildConstUInt(i)
            | Pattern::WildConstFloat(i) => {
                let (v, ty) = cx.state.bound_const(*i);
                emit::const_to_expr(v, ty)
            }
            Pattern::Fragment(e) => e.clone(),
            Pattern::Binary { op, a, b } => match (a.as_literal(), b.as_literal()) {
                (None, None) => {
                    let ea = a.make(cx);
                    let eb = b.make(cx);
                    let (ea, eb) = emit::match_lanes(ea, eb);
                    Expr::binary(*op, ea, eb)
                }
                // A literal adopts the type of its sibling.
                (None, Some(n)) => {
                    let ea = a.make(cx);
                    let eb = make_const(ea.ty(), n);
                    Expr::binary(*op, ea, eb)
                }
                (Some(n), None) => {
                    let eb = b.make(cx);
                    let ea = make_const(eb.ty(), n);
                    Expr::binary(*op, ea, eb)
                }
                (Some(_), Some(_)) => {
                    unreachable!("binary pattern over two literals cannot be rebuilt")
                }
            },
            Pattern::Cmp { op, a, b } => match (a.as_literal(), b.as_literal()) {
                (None, None) => {
                    let ea = a.make(cx);
                    let eb = b.make(cx);
                    let (ea, eb) = emit::match_lanes(ea, eb);
                    Expr::cmp(*op, ea, eb)
                }
                (None, Some(n)) => {
                    let ea = a.make(cx);
                    let eb = make_const(ea.ty(), n);
                    Expr::cmp(*op, ea, eb)
                }
                (Some(n), None) => {
                    let eb = b.make(cx);
                    let ea = make_const(eb.ty(), n);
                    Expr::cmp(*op, ea, eb)
                }
                (Some(_), Some(_)) => {
                    unreachable!("comparison pattern over two literals cannot be rebuilt")
                }
            },
            Pattern::Not { value } => Expr::not(value.make(cx)),
            Pattern::Select {
                cond,
                if_true,
                if_false,
            } => Expr::select(cond.make(cx), if_true.make(cx), if_false.make(cx)),
            Pattern::Broadcast { value, lanes } => match lanes {
                Some(l) => Expr::broadcast(value.make(cx), *l),
                None => unreachable!("broadcast pattern with unconstrained lanes cannot be rebuilt"),
            },
            Pattern::Ramp {
                base,
                stride,
                lanes,
            } => match lanes {
                Some(l) => Expr::ramp(base.make(cx), stride.make(cx), *l),
                None => unreachable!("ramp pattern with unconstrained lanes cannot be rebuilt"),
            },
            Pattern::Negate { value } => {
                let ea = value.make(cx);
                let zero = quartz_ir::make_zero(ea.ty());
                Expr::binary(BinOp::Sub, zero, ea)
            }
            Pattern::Cast { ty, value } => Expr::cast(*ty, value.make(cx)),
            Pattern::Fold { value } => {
                let (v, ty) = value.fold_const(cx);
                emit::const_to_expr(v, ty)
            }
            Pattern::Const(_)
            | Pattern::Intrin { .. }
            | Pattern::IsConst { .. }
            | Pattern::CanProve { .. }
            | Pattern::Gcd { .. }
            | Pattern::Bind { .. } => {
                unreachable!("pattern cannot be rebuilt into an expression")
            }
        }
    }
}

// =============================================================================
// Constant-Wildcard Matching
// =============================================================================

// A constant wildcard binds to a scalar immediate or a broadcast of one.
// The bound type is the matched expression's type including its lane
// count; a repeat occurrence compares the candidate immediate's type and
// payload against the stored pair.

fn match_wild_const_int<'e>(
    i: u8,
    e: &'e Expr,
    bound: u32,
    state: &mut MatcherState<'e>,
) -> bool {
    debug_assert!((i as usize) < MAX_WILD, "wildcard index out of range");
    let op = peel_broadcast(e);
    let ExprKind::IntImm(value) = op.kind() else {
        return false;
    };
    if bound & const_bit(i) != 0 {
        let (val, ty) = state.bound_const(i);
        op.ty() == ty && *value == val.as_i64()
    } else {
        state.set_bound_const(i, ScalarValue::from_i64(*value), e.ty());
        true
    }
}

fn match_wild_const_uint<'e>(
    i: u8,
    e: &'e Expr,
    bound: u32,
    state: &mut MatcherState<'e>,
) -> bool {
    debug_assert!((i as usize) < MAX_WILD, "wildcard index out of range");
    let op = peel_broadcast(e);
    let ExprKind::UIntImm(value) = op.kind() else {
        return false;
    };
    if bound & const_bit(i) != 0 {
        let (val, ty) = state.bound_const(i);
        op.ty() == ty && *value == val.as_u64()
    } else {
        state.set_bound_const(i, ScalarValue::from_u64(*value), e.ty());
        true
    }
}

fn match_wild_const_float<'e>(
    i: u8,
    e: &'e Expr,
    bound: u32,
    state: &mut MatcherState<'e>,
) -> bool {
    debug_assert!((i as usize) < MAX_WILD, "wildcard index out of range");
    let op = peel_broadcast(e);
    let ExprKind::FloatImm(value) = op.kind() else {
        return false;
    };
    if bound & const_bit(i) != 0 {
        let (val, ty) = state.bound_const(i);
        op.ty() == ty && *value == val.as_f64()
    } else {
        state.set_bound_const(i, ScalarValue::from_f64(*value), e.ty());
        true
    }
}

// =============================================================================
// Binary / Comparison Folding
// =============================================================================

fn fold_binary(
    op: BinOp,
    a: &Pattern,
    b: &Pattern,
    cx: &mut EvalCx<'_, '_, '_>,
) -> (ScalarValue, Type) {
    match (a.as_literal(), b.as_literal()) {
        (None, None) => {
            let (va, ta) = a.fold_const(cx);
            // Short-circuit on the left operand: the right side is not
            // evaluated, so its poison never surfaces.
            if (op == BinOp::And && va.as_u64() == 0) || (op == BinOp::Or && va.as_u64() == 1) {
                return (va, ta);
            }
            let (vb, tb) = b.fold_const(cx);
            let mut ty = ta;
            ty.lanes |= tb.lanes;
            let v = fold::fold_bin(op, &mut ty, va, vb);
            (v, ty)
        }
        (None, Some(n)) => {
            let (va, mut ty) = a.fold_const(cx);
            let code = ty.code;
            let v = fold::fold_bin(op, &mut ty, va, ScalarValue::literal(code, n));
            (v, ty)
        }
        (Some(n), None) => {
            // The literal adopts the right operand's type, lanes included.
            let (vb, mut ty) = b.fold_const(cx);
            if (op == BinOp::And && n == 0) || (op == BinOp::Or && n == 1) {
                return (ScalarValue::from_u64(n as u64), ty);
            }
            let code = ty.code;
            let v = fold::fold_bin(op, &mut ty, ScalarValue::literal(code, n), vb);
            (v, ty)
        }
        (Some(x), Some(y)) => {
            debug_assert!(false, "fold over two literal operands has no type context");
            let mut ty = Type::int(64);
            let v = fold::fold_bin(op, &mut ty, ScalarValue::from_i64(x), ScalarValue::from_i64(y));
            (v, ty)
        }
    }
}

fn fold_cmp(
    op: CmpOp,
    a: &Pattern,
    b: &Pattern,
    cx: &mut EvalCx<'_, '_, '_>,
) -> (ScalarValue, Type) {
    let (code, lanes, va, vb) = match (a.as_literal(), b.as_literal()) {
        (None, None) => {
            let (va, ta) = a.fold_const(cx);
            let (vb, tb) = b.fold_const(cx);
            (ta.code, ta.lanes | tb.lanes, va, vb)
        }
        (None, Some(n)) => {
            let (va, ta) = a.fold_const(cx);
            (ta.code, ta.lanes, va, ScalarValue::literal(ta.code, n))
        }
        (Some(n), None) => {
            let (vb, tb) = b.fold_const(cx);
            (tb.code, tb.lanes, ScalarValue::literal(tb.code, n), vb)
        }
        (Some(x), Some(y)) => {
            debug_assert!(false, "comparison over two literal operands has no type context");
            (
                TypeCode::Int,
                1,
                ScalarValue::from_i64(x),
                ScalarValue::from_i64(y),
            )
        }
    };
    let v = fold::fold_cmp(op, code, va, vb);
    (
        ScalarValue::from_u64(v),
        Type {
            code: TypeCode::UInt,
            bits: 1,
            lanes,
        },
    )
}

// =============================================================================
// Display
// =============================================================================

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Wild(i) => write!(f, "_{}", i),
            Pattern::WildConst(i) => write!(f, "c{}", i),
            Pattern::WildConstInt(i) => write!(f, "ci{}", i),
            Pattern::WildConstUInt(i) => write!(f, "cu{}", i),
            Pattern::WildConstFloat(i) => write!(f, "cf{}", i),
            Pattern::Const(n) => write!(f, "{}", n),
            Pattern::Fragment(e) => write!(f, "{}", e),
            Pattern::Binary { op, a, b } => match op {
                BinOp::Add => write!(f, "({} + {})", a, b),
                BinOp::Sub => write!(f, "({} - {})", a, b),
                BinOp::Mul => write!(f, "({} * {})", a, b),
                BinOp::Div => write!(f, "({} / {})", a, b),
                BinOp::Mod => write!(f, "({} % {})", a, b),
                BinOp::Min => write!(f, "min({}, {})", a, b),
                BinOp::Max => write!(f, "max({}, {})", a, b),
                BinOp::And => write!(f, "({} && {})", a, b),
                BinOp::Or => write!(f, "({} || {})", a, b),
            },
            Pattern::Cmp { op, a, b } => {
                let sym = match op {
                    CmpOp::Lt => "<",
                    CmpOp::Le => "<=",
                    CmpOp::Gt => ">",
                    CmpOp::Ge => ">=",
                    CmpOp::Eq => "==",
                    CmpOp::Ne => "!=",
                };
                write!(f, "({} {} {})", a, sym, b)
            }
            Pattern::Not { value } => write!(f, "!({})", value),
            Pattern::Select {
                cond,
                if_true,
                if_false,
            } => write!(f, "select({}, {}, {})", cond, if_true, if_false),
            Pattern::Broadcast { value, lanes } => match lanes {
                Some(l) => write!(f, "broadcast({}, {})", value, l),
                None => write!(f, "broadcast({})", value),
            },
            Pattern::Ramp {
                base,
                stride,
                lanes,
            } => match lanes {
                Some(l) => write!(f, "ramp({}, {}, {})", base, stride, l),
                None => write!(f, "ramp({}, {})", base, stride),
            },
            Pattern::Negate { value } => write!(f, "-{}", value),
            Pattern::Cast { ty, value } => write!(f, "cast({}, {})", ty, value),
            Pattern::Intrin { name, args } => {
                write!(f, "{}(", name)?;
                for (i, p) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ")")
            }
            Pattern::Fold { value } => write!(f, "fold({})", value),
            Pattern::IsConst { value } => write!(f, "is_const({})", value),
            Pattern::CanProve { value } => write!(f, "can_prove({})", value),
            Pattern::Gcd { a, b } => write!(f, "gcd({}, {})", a, b),
            Pattern::Bind { index, value } => write!(f, "bind(c{} = {})", index, value),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
