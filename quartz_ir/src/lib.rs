//! Typed arithmetic/logical expression IR.
//!
//! This crate is the IR half of the Quartz rewrite engine:
//! - Compact type descriptors with vector lanes and packed poison flags
//! - An immutable `Arc`-based expression tree with grouped operator tags
//! - Type-checked constructors and constant classification helpers
//! - Structural equality with a pointer-identity fast path
//!
//! The rewrite engine (`quartz_rewrite`) reads this IR through `&Expr`
//! borrows and builds replacement trees through the constructors here; it
//! never mutates an existing node.

pub mod build;
pub mod display;
pub mod node;
pub mod types;

pub use build::{make_const, make_one, make_zero};
pub use node::{equal, BinOp, CallArgs, CmpOp, Expr, ExprKind};
pub use types::{Type, TypeCode};
