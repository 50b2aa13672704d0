//! Name-keyed structural matching.
//!
//! A simpler, allocation-friendly matcher flavor where the pattern is
//! itself an expression and wildcards are `Var` nodes:
//!
//! - **Positional**: wildcards are variables named `"*"`; each match is
//!   appended to an output vector in encounter order. A wildcard's
//!   declared type must match the candidate's, where `bits == 0` or
//!   `lanes == 0` in the pattern means "match anything". So an
//!   `Int(8, 0)` wildcard matches 8-bit signed vectors of any width, and
//!   a `UInt(0, 0)` wildcard matches any unsigned value.
//! - **Named**: every variable name is a wildcard, bound consistently —
//!   the first occurrence captures, subsequent occurrences must be
//!   structurally equal to the capture.
//!
//! Non-variable pattern nodes require identical kind, identical type,
//! and recursively matching children.

use quartz_ir::{equal, Expr, ExprKind, Type};
use rustc_hash::FxHashMap;

// =============================================================================
// Entry Points
// =============================================================================

/// Positional flavor. On success, `result` holds the subtree matched by
/// each `"*"` wildcard in encounter order. Cleared on entry and on
/// failure.
///
/// ```
/// use quartz_ir::{Expr, Type};
/// use quartz_rewrite::expr_match;
///
/// let t = Type::int(32);
/// let w = Expr::var(Type { bits: 0, ..t }, "*");
/// let pattern = Expr::add(w.clone(), w.clone());
/// let expr = Expr::add(
///     Expr::int_imm(t, 3),
///     Expr::mul(Expr::int_imm(t, 2), Expr::var(t, "k")),
/// );
/// let mut result = Vec::new();
/// assert!(expr_match(&pattern, &expr, &mut result));
/// assert_eq!(result[0].to_string(), "3");
/// assert_eq!(result[1].to_string(), "(2 * k)");
/// ```
pub fn expr_match(pattern: &Expr, expr: &Expr, result: &mut Vec<Expr>) -> bool {
    result.clear();
    let ok = match_rec(pattern, expr, &mut Sink::Positional(result));
    if !ok {
        result.clear();
    }
    ok
}

/// Named flavor. On success, `result` maps each variable name in the
/// pattern to the subtree it matched. Cleared on entry and on failure.
pub fn expr_match_named(
    pattern: &Expr,
    expr: &Expr,
    result: &mut FxHashMap<String, Expr>,
) -> bool {
    result.clear();
    let ok = match_rec(pattern, expr, &mut Sink::Named(result));
    if !ok {
        result.clear();
    }
    ok
}

// =============================================================================
// Recursive Walk
// =============================================================================

enum Sink<'a> {
    Positional(&'a mut Vec<Expr>),
    Named(&'a mut FxHashMap<String, Expr>),
}

/// Type agreement for positional wildcards: codes equal, zero bits or
/// lanes in the pattern mean "any".
fn types_match(pattern: Type, candidate: Type) -> bool {
    pattern.code == candidate.code
        && (pattern.bits == 0 || pattern.bits == candidate.bits)
        && (pattern.lanes == 0 || pattern.lanes == candidate.lanes)
}

fn match_var(name: &str, ty: Type, e: &Expr, sink: &mut Sink<'_>) -> bool {
    match sink {
        Sink::Positional(out) => {
            if name != "*" {
                // An ordinary variable is a leaf: same name, same type.
                return matches!(e.kind(), ExprKind::Var(en) if en.as_ref() == name)
                    && ty == e.ty();
            }
            if !types_match(ty, e.ty()) {
                return false;
            }
            out.push(e.clone());
            true
        }
        Sink::Named(map) => {
            if let Some(prev) = map.get(name) {
                equal(prev, e)
            } else {
                map.insert(name.to_owned(), e.clone());
                true
            }
        }
    }
}

fn match_rec(p: &Expr, e: &Expr, sink: &mut Sink<'_>) -> bool {
    if let ExprKind::Var(name) = p.kind() {
        return match_var(name, p.ty(), e, sink);
    }
    if p.ty() != e.ty() {
        return false;
    }
    match (p.kind(), e.kind()) {
        (ExprKind::IntImm(a), ExprKind::IntImm(b)) => a == b,
        (ExprKind::UIntImm(a), ExprKind::UIntImm(b)) => a == b,
        (ExprKind::FloatImm(a), ExprKind::FloatImm(b)) => a == b,
        (
            ExprKind::Broadcast { value: pv, lanes: pl },
            ExprKind::Broadcast { value: ev, lanes: el },
        ) => pl == el && match_rec(pv, ev, sink),
        (
            ExprKind::Ramp {
                base: pb,
                stride: ps,
                lanes: pl,
            },
            ExprKind::Ramp {
                base: eb,
                stride: es,
                lanes: el,
            },
        ) => pl == el && match_rec(pb, eb, sink) && match_rec(ps, es, sink),
        (
            ExprKind::Binary { op: po, a: pa, b: pb },
            ExprKind::Binary { op: eo, a: ea, b: eb },
        ) => po == eo && match_rec(pa, ea, sink) && match_rec(pb, eb, sink),
        (ExprKind::Cmp { op: po, a: pa, b: pb }, ExprKind::Cmp { op: eo, a: ea, b: eb }) => {
            po == eo && match_rec(pa, ea, sink) && match_rec(pb, eb, sink)
        }
        (ExprKind::Not { value: pv }, ExprKind::Not { value: ev }) => match_rec(pv, ev, sink),
        (
            ExprKind::Select {
                cond: pc,
                if_true: pt,
                if_false: pf,
            },
            ExprKind::Select {
                cond: ec,
                if_true: et,
                if_false: ef,
            },
        ) => match_rec(pc, ec, sink) && match_rec(pt, et, sink) && match_rec(pf, ef, sink),
        (ExprKind::Cast { value: pv }, ExprKind::Cast { value: ev }) => match_rec(pv, ev, sink),
        (
            ExprKind::Call { name: pn, args: pa },
            ExprKind::Call { name: en, args: ea },
        ) => {
            pn == en
                && pa.len() == ea.len()
                && pa.iter().zip(ea.iter()).all(|(x, y)| match_rec(x, y, sink))
        }
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
