//! Surface-syntax printing for expressions.
//!
//! Printed forms read like the source language of a rule: `(a + b)`,
//! `min(a, b)`, `select(c, t, f)`, `broadcast(x, 4)`. Casts print as the
//! target type applied like a function: `i64((a + b))`.

use std::fmt;

use crate::node::{BinOp, CmpOp, Expr, ExprKind};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::IntImm(v) => write!(f, "{}", v),
            ExprKind::UIntImm(v) => write!(f, "{}", v),
            ExprKind::FloatImm(v) => write!(f, "{:?}", v),
            ExprKind::Var(name) => write!(f, "{}", name),
            ExprKind::Broadcast { value, lanes } => {
                write!(f, "broadcast({}, {})", value, lanes)
            }
            ExprKind::Ramp {
                base,
                stride,
                lanes,
            } => write!(f, "ramp({}, {}, {})", base, stride, lanes),
            ExprKind::Binary { op, a, b } => match op {
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
            ExprKind::Cmp { op, a, b } => {
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
            ExprKind::Not { value } => write!(f, "!({})", value),
            ExprKind::Select {
                cond,
                if_true,
                if_false,
            } => write!(f, "select({}, {}, {})", cond, if_true, if_false),
            ExprKind::Cast { value } => write!(f, "{}({})", self.ty(), value),
            ExprKind::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
