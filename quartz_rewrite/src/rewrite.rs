//! The rule dispatcher.
//!
//! A [`Rewriter`] is a short-lived object parameterized by the root
//! expression under consideration. Rules are tried in the order the
//! caller writes them; the first one whose pattern matches (and whose
//! predicate, if any, folds to an unpoisoned non-zero) stages its
//! replacement and returns `true`:
//!
//! ```
//! use quartz_ir::{make_zero, Expr, Type};
//! use quartz_rewrite::sugar::*;
//! use quartz_rewrite::Rewriter;
//!
//! let t = Type::int(32);
//! let e = Expr::add(Expr::var(t, "y"), make_zero(t));
//! let mut rw = Rewriter::new(&e);
//! if rw.rewrite(&(wild(0) + 0), &wild(0)) {
//!     assert_eq!(rw.result().unwrap().to_string(), "y");
//! }
//! ```
//!
//! The engine provides no rule table; ordering and grouping of rules is
//! entirely the caller's arrangement.

use quartz_ir::Expr;

use crate::pattern::{EvalCx, Pattern};
use crate::state::MatcherState;

// =============================================================================
// Prover Hook
// =============================================================================

/// An externally supplied pure simplifier consulted by `can_prove`
/// predicates. `mutate` must return an expression over the same IR.
pub trait Prover {
    /// Simplify `expr` as far as possible.
    fn mutate(&mut self, expr: &Expr) -> Expr;
}

// =============================================================================
// Rewriter
// =============================================================================

/// Applies `(before, after [, predicate])` rules to one root expression.
pub struct Rewriter<'e, 'p, 'q> {
    root: &'e Expr,
    state: MatcherState<'e>,
    prover: Option<&'p mut (dyn Prover + 'q)>,
    result: Option<Expr>,
}

impl<'e: 'p, 'p, 'q> Rewriter<'e, 'p, 'q> {
    /// A rewriter over `root` with no prover installed (rules using
    /// `can_prove` will not fire).
    pub fn new(root: &'e Expr) -> Self {
        Rewriter {
            root,
            state: MatcherState::new(),
            prover: None,
            result: None,
        }
    }

    /// A rewriter over `root` consulting `prover` for `can_prove`.
    pub fn with_prover(root: &'e Expr, prover: &'p mut (dyn Prover + 'q)) -> Self {
        Rewriter {
            root,
            state: MatcherState::new(),
            prover: Some(prover),
            result: None,
        }
    }

    /// The staged replacement of the last rule that fired.
    pub fn result(&self) -> Option<&Expr> {
        self.result.as_ref()
    }

    /// Take the staged replacement, leaving the rewriter empty.
    pub fn take_result(&mut self) -> Option<Expr> {
        self.result.take()
    }

    fn try_match(&mut self, before: &Pattern) -> bool {
        self.state = MatcherState::new();
        before.matches(self.root, &mut self.state)
    }

    fn predicate_holds(&mut self, pred: &Pattern) -> bool {
        let mut cx = EvalCx::new(&mut self.state, self.prover.as_deref_mut());
        let (v, ty) = pred.fold_const(&mut cx);
        // A poisoned truth value discards the rule.
        v.as_u64() != 0 && !ty.is_poisoned()
    }

    fn stage(&mut self, after: &Pattern) {
        let mut cx = EvalCx::new(&mut self.state, self.prover.as_deref_mut());
        self.result = Some(after.make(&mut cx));
    }

    /// Try `before -> after`. Returns whether the rule fired.
    pub fn rewrite(&mut self, before: &Pattern, after: &Pattern) -> bool {
        if self.try_match(before) {
            self.stage(after);
            true
        } else {
            false
        }
    }

    /// Try `before -> after` where the replacement is a concrete
    /// expression built by the caller.
    pub fn rewrite_to(&mut self, before: &Pattern, after: Expr) -> bool {
        if self.try_match(before) {
            self.result = Some(after);
            true
        } else {
            false
        }
    }

    /// Try `before -> after when pred`.
    pub fn rewrite_if(&mut self, before: &Pattern, after: &Pattern, pred: &Pattern) -> bool {
        if self.try_match(before) && self.predicate_holds(pred) {
            self.stage(after);
            true
        } else {
            false
        }
    }

    /// Try `before -> after when pred` with a concrete replacement.
    pub fn rewrite_to_if(&mut self, before: &Pattern, after: Expr, pred: &Pattern) -> bool {
        if self.try_match(before) && self.predicate_holds(pred) {
            self.result = Some(after);
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
