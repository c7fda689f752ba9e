//! Named field access on nodes

use super::dtype::DType;
use super::stmt::{ForKind, Stmt, StmtKind};
use super::{Expr, ExprKind};
use crate::error::{IrError, Result};

/// Value of a node field
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Expr(Expr),
    Exprs(Vec<Expr>),
    Stmt(Stmt),
    DType(DType),
    Int(i64),
    Float(f64),
    Str(String),
    ForKind(ForKind),
}

impl AttrValue {
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            AttrValue::Expr(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

fn unknown(node: &str, attr: &str) -> IrError {
    IrError::UnknownAttribute {
        node: node.to_string(),
        attr: attr.to_string(),
    }
}

impl Expr {
    /// Field names available through [`Expr::attr`]
    pub fn fields(&self) -> &'static [&'static str] {
        match self.kind() {
            ExprKind::IntImm(_) | ExprKind::FloatImm(_) | ExprKind::StringImm(_) => {
                &["dtype", "value"]
            }
            ExprKind::Var(_) => &["dtype", "name"],
            ExprKind::Unary { .. } => &["dtype", "op", "a"],
            ExprKind::Binary { .. } | ExprKind::Bitwise { .. } => &["dtype", "op", "a", "b"],
            ExprKind::Cast(_) => &["dtype", "value"],
            ExprKind::Broadcast(_) => &["dtype", "value", "lanes"],
            ExprKind::Call { .. } => &["dtype", "name", "args"],
        }
    }

    /// Looks up a field by name, failing with `UnknownAttribute` if the
    /// variant has no such field.
    pub fn attr(&self, name: &str) -> Result<AttrValue> {
        if name == "dtype" {
            return Ok(AttrValue::DType(self.dtype()));
        }
        let value = match (self.kind(), name) {
            (ExprKind::IntImm(v), "value") => AttrValue::Int(*v),
            (ExprKind::FloatImm(v), "value") => AttrValue::Float(*v),
            (ExprKind::StringImm(v), "value") => AttrValue::Str(v.clone()),
            (ExprKind::Var(n), "name") => AttrValue::Str(n.clone()),
            (ExprKind::Unary { op, .. }, "op") => AttrValue::Str(format!("{:?}", op)),
            (ExprKind::Binary { op, .. }, "op") => AttrValue::Str(op.name().to_string()),
            (ExprKind::Bitwise { op, .. }, "op") => AttrValue::Str(op.name().to_string()),
            (ExprKind::Unary { operand, .. }, "a") => AttrValue::Expr(operand.clone()),
            (ExprKind::Binary { lhs, .. } | ExprKind::Bitwise { lhs, .. }, "a") => {
                AttrValue::Expr(lhs.clone())
            }
            (ExprKind::Binary { rhs, .. } | ExprKind::Bitwise { rhs, .. }, "b") => {
                AttrValue::Expr(rhs.clone())
            }
            (ExprKind::Cast(v) | ExprKind::Broadcast(v), "value") => AttrValue::Expr(v.clone()),
            (ExprKind::Broadcast(_), "lanes") => AttrValue::Int(self.lanes() as i64),
            (ExprKind::Call { name, .. }, "name") => AttrValue::Str(name.clone()),
            (ExprKind::Call { args, .. }, "args") => AttrValue::Exprs(args.clone()),
            _ => return Err(unknown(self.type_key(), name)),
        };
        Ok(value)
    }
}

impl Stmt {
    /// Field names available through [`Stmt::attr`]
    pub fn fields(&self) -> &'static [&'static str] {
        match self.kind() {
            StmtKind::Evaluate(_) => &["value"],
            StmtKind::LetStmt { .. } => &["var", "value", "body"],
            StmtKind::AttrStmt { .. } => &["node", "attr_key", "value", "body"],
            StmtKind::Store { .. } => &["buffer_var", "value", "index"],
            StmtKind::For { .. } => &[
                "loop_var",
                "min",
                "extent",
                "for_type",
                "device_api",
                "body",
            ],
        }
    }

    pub fn attr(&self, name: &str) -> Result<AttrValue> {
        let value = match (self.kind(), name) {
            (StmtKind::Evaluate(v), "value") => AttrValue::Expr(v.clone()),
            (StmtKind::LetStmt { var, .. }, "var") => AttrValue::Expr(var.clone()),
            (StmtKind::LetStmt { value, .. }, "value") => AttrValue::Expr(value.clone()),
            (StmtKind::AttrStmt { node, .. }, "node") => AttrValue::Expr(node.clone()),
            (StmtKind::AttrStmt { attr_key, .. }, "attr_key") => AttrValue::Str(attr_key.clone()),
            (StmtKind::AttrStmt { value, .. }, "value") => AttrValue::Expr(value.clone()),
            (StmtKind::Store { buffer_var, .. }, "buffer_var") => {
                AttrValue::Expr(buffer_var.clone())
            }
            (StmtKind::Store { value, .. }, "value") => AttrValue::Expr(value.clone()),
            (StmtKind::Store { index, .. }, "index") => AttrValue::Expr(index.clone()),
            (StmtKind::For { loop_var, .. }, "loop_var") => AttrValue::Expr(loop_var.clone()),
            (StmtKind::For { min, .. }, "min") => AttrValue::Expr(min.clone()),
            (StmtKind::For { extent, .. }, "extent") => AttrValue::Expr(extent.clone()),
            (StmtKind::For { kind, .. }, "for_type") => AttrValue::ForKind(*kind),
            (StmtKind::For { device_api, .. }, "device_api") => {
                AttrValue::Int(*device_api as i64)
            }
            (
                StmtKind::LetStmt { body, .. }
                | StmtKind::AttrStmt { body, .. }
                | StmtKind::For { body, .. },
                "body",
            ) => AttrValue::Stmt(body.clone()),
            _ => return Err(unknown(self.type_key(), name)),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::helper::{constant, var};
    use crate::error::ErrorKind;

    #[test]
    fn test_literal_value() {
        let a = constant(1);
        assert_eq!(a.attr("value").unwrap().as_int(), Some(1));
        assert_eq!(a.attr("dtype").unwrap(), AttrValue::DType(DType::int(32, 1)));

        let err = a.attr("no_field").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
        assert_eq!(err.to_string(), "AttributeError: IntImm has no attribute 'no_field'");
    }

    #[test]
    fn test_every_listed_field_resolves() {
        let x = var("x");
        let nodes = [
            constant(1),
            x.clone(),
            (&x + 1).unwrap(),
            (&x << 1).unwrap(),
            (!&x).unwrap(),
            x.astype("float32").unwrap(),
            x.astype("int32x4").unwrap(),
        ];
        for node in nodes {
            for field in node.fields() {
                assert!(node.attr(field).is_ok(), "{} missing {}", node.type_key(), field);
            }
        }
    }

    #[test]
    fn test_attr_stmt_node() {
        let x = var("x");
        let y = var("y");
        let stmt = Stmt::attr_stmt(&y, "stride", 10, Stmt::evaluate((&x + 1).unwrap()));
        let node = stmt.attr("node").unwrap();
        assert!(node.as_expr().unwrap().same_as(&y));
        assert_eq!(stmt.attr("attr_key").unwrap().as_str(), Some("stride"));
        for field in stmt.fields() {
            assert!(stmt.attr(field).is_ok());
        }
        assert_eq!(
            stmt.attr("loop_var").unwrap_err().kind(),
            ErrorKind::UnknownAttribute
        );
    }
}
