//! Per-attempt match state.
//!
//! The pattern objects themselves are immutable; everything bound during
//! a match lands here. The state is a flat fixed-size struct (no heap)
//! created fresh for every rule attempt and discarded on failure, so a
//! failed match needs no cleanup. Which slots are valid is tracked by the
//! bound mask threaded through matching, not by the state itself.

use quartz_ir::{Expr, Type};

use crate::value::ScalarValue;

/// Maximum wildcard index per kind (subtree and constant namespaces each
/// get this many slots).
pub const MAX_WILD: usize = 5;

/// Mask bit meaning "constant wildcard `i` is bound".
#[inline]
pub(crate) const fn const_bit(i: u8) -> u32 {
    1 << i as u32
}

/// Mask bit meaning "subtree wildcard `i` is bound".
#[inline]
pub(crate) const fn subtree_bit(i: u8) -> u32 {
    1 << (i as u32 + 16)
}

// =============================================================================
// Matcher State
// =============================================================================

/// Bindings accumulated while matching one rule against one root.
///
/// Subtree wildcards bind borrowed references into the caller-owned
/// expression tree; constant wildcards bind a scalar payload plus the
/// type of the originally matched expression (lane count included).
#[derive(Debug)]
pub struct MatcherState<'e> {
    bindings: [Option<&'e Expr>; MAX_WILD],
    bound_const: [ScalarValue; MAX_WILD],
    bound_const_type: [Type; MAX_WILD],
}

impl<'e> MatcherState<'e> {
    /// Fresh state with nothing bound.
    #[inline]
    pub fn new() -> Self {
        MatcherState {
            bindings: [None; MAX_WILD],
            bound_const: [ScalarValue::ZERO; MAX_WILD],
            bound_const_type: [Type::uint(1); MAX_WILD],
        }
    }

    /// Bind subtree wildcard `i`.
    #[inline]
    pub fn set_binding(&mut self, i: u8, e: &'e Expr) {
        self.bindings[i as usize] = Some(e);
    }

    /// Read subtree wildcard `i`. The bound mask guarantees the slot is
    /// valid wherever the engine calls this.
    #[inline]
    pub fn binding(&self, i: u8) -> &'e Expr {
        self.bindings[i as usize].expect("subtree wildcard read before it was bound")
    }

    /// Bind constant wildcard `i`.
    #[inline]
    pub fn set_bound_const(&mut self, i: u8, val: ScalarValue, ty: Type) {
        self.bound_const[i as usize] = val;
        self.bound_const_type[i as usize] = ty;
    }

    /// Read constant wildcard `i`.
    #[inline]
    pub fn bound_const(&self, i: u8) -> (ScalarValue, Type) {
        (
            self.bound_const[i as usize],
            self.bound_const_type[i as usize],
        )
    }
}

impl Default for MatcherState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
