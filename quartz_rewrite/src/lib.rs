//! Term-rewriting engine for the Quartz expression IR.
//!
//! The engine matches a rooted expression against declarative patterns
//! with typed wildcards, optionally evaluates a constant-folded side
//! condition, and rebuilds a replacement expression:
//!
//! - **Pattern algebra**: wildcards, constant wildcards, literals, and
//!   structural patterns with a bound-mask threaded left to right so
//!   repeat wildcard occurrences reduce to equality checks.
//! - **Exact constant folding**: per-domain kernels with signed-overflow
//!   and division-by-zero poison tracked as type flags; a poisoned
//!   predicate discards its rule, and a poisoned replacement becomes a
//!   uniquely-tagged sentinel intrinsic.
//! - **Vector bookkeeping**: constant wildcards see through broadcasts
//!   and remember the lane count; emission reconstitutes broadcasts and
//!   normalizes mixed scalar/vector operands.
//! - **Two matcher flavors**: the first-class pattern algebra above, and
//!   a name-keyed structural matcher ([`expr_match`],
//!   [`expr_match_named`]) for wildcard-by-name use.
//!
//! Rule application is single-threaded and allocation-free on the failure
//! path; the only process-wide state is the atomic counter tagging
//! poison sentinels.

pub mod emit;
pub mod expr_match;
pub mod pattern;
pub mod rewrite;
pub mod state;
pub mod sugar;
pub mod value;

mod fold;

#[cfg(test)]
mod tests;

pub use emit::{const_to_expr, INDETERMINATE_EXPRESSION, SIGNED_INTEGER_OVERFLOW};
pub use expr_match::{expr_match, expr_match_named};
pub use pattern::{EvalCx, Pattern};
pub use rewrite::{Prover, Rewriter};
pub use state::{MatcherState, MAX_WILD};
pub use value::ScalarValue;
