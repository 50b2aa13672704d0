//! Expression constructors and constant classification.
//!
//! Construction is type-checked with debug assertions: binary operands
//! must agree in type, comparisons produce `u1` with the operand lane
//! count, broadcasts take scalars. Callers that mix scalar and vector
//! operands normalize first (the rewrite emitter inserts broadcasts).

use crate::node::{BinOp, CallArgs, CmpOp, Expr, ExprKind};
use crate::types::{Type, TypeCode};

// =============================================================================
// Constructors
// =============================================================================

impl Expr {
    /// Signed integer immediate of scalar type `ty`.
    pub fn int_imm(ty: Type, value: i64) -> Expr {
        debug_assert!(ty.code == TypeCode::Int && ty.is_scalar());
        Expr::new(ty, ExprKind::IntImm(value))
    }

    /// Unsigned integer immediate of scalar type `ty`.
    pub fn uint_imm(ty: Type, value: u64) -> Expr {
        debug_assert!(ty.code == TypeCode::UInt && ty.is_scalar());
        Expr::new(ty, ExprKind::UIntImm(value))
    }

    /// Floating-point immediate of scalar type `ty`.
    pub fn float_imm(ty: Type, value: f64) -> Expr {
        debug_assert!(ty.code == TypeCode::Float && ty.is_scalar());
        Expr::new(ty, ExprKind::FloatImm(value))
    }

    /// A free variable.
    pub fn var(ty: Type, name: impl Into<Box<str>>) -> Expr {
        Expr::new(ty, ExprKind::Var(name.into()))
    }

    /// A scalar value repeated across `lanes` lanes.
    pub fn broadcast(value: Expr, lanes: u16) -> Expr {
        debug_assert!(value.ty().is_scalar(), "broadcast of a vector");
        debug_assert!(lanes >= 1);
        let ty = value.ty().with_lanes(lanes);
        Expr::new(ty, ExprKind::Broadcast { value, lanes })
    }

    /// The vector `[base, base+stride, ...]` of `lanes` lanes.
    pub fn ramp(base: Expr, stride: Expr, lanes: u16) -> Expr {
        debug_assert!(base.ty().is_scalar() && stride.ty().is_scalar());
        debug_assert!(base.ty() == stride.ty());
        let ty = base.ty().with_lanes(lanes);
        Expr::new(ty, ExprKind::Ramp { base, stride, lanes })
    }

    /// A binary operation over same-typed operands.
    pub fn binary(op: BinOp, a: Expr, b: Expr) -> Expr {
        debug_assert!(a.ty() == b.ty(), "binary operand types differ");
        let ty = a.ty();
        Expr::new(ty, ExprKind::Binary { op, a, b })
    }

    /// Addition.
    pub fn add(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Add, a, b)
    }

    /// Subtraction.
    pub fn sub(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Sub, a, b)
    }

    /// Multiplication.
    pub fn mul(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Mul, a, b)
    }

    /// Floor division.
    pub fn div(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Div, a, b)
    }

    /// Euclidean modulus.
    pub fn modulo(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Mod, a, b)
    }

    /// Minimum.
    pub fn min(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Min, a, b)
    }

    /// Maximum.
    pub fn max(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Max, a, b)
    }

    /// Boolean conjunction.
    pub fn and(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::And, a, b)
    }

    /// Boolean disjunction.
    pub fn or(a: Expr, b: Expr) -> Expr {
        Expr::binary(BinOp::Or, a, b)
    }

    /// A comparison; the result is `u1` with the operands' lane count.
    pub fn cmp(op: CmpOp, a: Expr, b: Expr) -> Expr {
        debug_assert!(a.ty() == b.ty(), "comparison operand types differ");
        let ty = Type::bool_scalar().with_lanes(a.ty().lane_count());
        Expr::new(ty, ExprKind::Cmp { op, a, b })
    }

    /// Boolean negation.
    pub fn not(value: Expr) -> Expr {
        debug_assert!(value.ty().code == TypeCode::UInt && value.ty().bits == 1);
        let ty = value.ty();
        Expr::new(ty, ExprKind::Not { value })
    }

    /// Lane-wise conditional.
    pub fn select(cond: Expr, if_true: Expr, if_false: Expr) -> Expr {
        debug_assert!(cond.ty().code == TypeCode::UInt && cond.ty().bits == 1);
        debug_assert!(if_true.ty() == if_false.ty(), "select arm types differ");
        let ty = if_true.ty();
        Expr::new(
            ty,
            ExprKind::Select {
                cond,
                if_true,
                if_false,
            },
        )
    }

    /// Conversion of `value` to type `ty`.
    pub fn cast(ty: Type, value: Expr) -> Expr {
        Expr::new(ty, ExprKind::Cast { value })
    }

    /// An intrinsic call with the given result type.
    pub fn call(ty: Type, name: &'static str, args: CallArgs) -> Expr {
        Expr::new(ty, ExprKind::Call { name, args })
    }
}

// =============================================================================
// Constant Helpers
// =============================================================================

/// A constant of type `ty` with value `v`, converted to the type's code.
/// Vector types get a `Broadcast` of the scalar immediate.
pub fn make_const(ty: Type, v: i64) -> Expr {
    debug_assert!(!ty.is_poisoned());
    let elem = ty.element_of();
    let imm = match ty.code {
        TypeCode::Int => Expr::int_imm(elem, v),
        TypeCode::UInt => Expr::uint_imm(elem, v as u64),
        TypeCode::Float => Expr::float_imm(elem, v as f64),
    };
    let lanes = ty.lane_count();
    if lanes > 1 {
        Expr::broadcast(imm, lanes)
    } else {
        imm
    }
}

/// The zero of type `ty`.
pub fn make_zero(ty: Type) -> Expr {
    make_const(ty, 0)
}

/// The one of type `ty`.
pub fn make_one(ty: Type) -> Expr {
    make_const(ty, 1)
}

impl Expr {
    /// Whether this is an immediate, or a broadcast of one.
    pub fn is_const(&self) -> bool {
        match self.kind() {
            ExprKind::IntImm(_) | ExprKind::UIntImm(_) | ExprKind::FloatImm(_) => true,
            ExprKind::Broadcast { value, .. } => value.is_const(),
            _ => false,
        }
    }

    /// Whether this is the constant zero (or a broadcast of it).
    pub fn is_zero(&self) -> bool {
        match self.kind() {
            ExprKind::IntImm(v) => *v == 0,
            ExprKind::UIntImm(v) => *v == 0,
            ExprKind::FloatImm(v) => *v == 0.0,
            ExprKind::Broadcast { value, .. } => value.is_zero(),
            _ => false,
        }
    }

    /// Whether this is the constant one (or a broadcast of it).
    pub fn is_one(&self) -> bool {
        match self.kind() {
            ExprKind::IntImm(v) => *v == 1,
            ExprKind::UIntImm(v) => *v == 1,
            ExprKind::FloatImm(v) => *v == 1.0,
            ExprKind::Broadcast { value, .. } => value.is_one(),
            _ => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
