//! Statement nodes
//!
//! Statements reference expressions; expressions never reference statements.

use std::sync::Arc;

use super::Expr;
use crate::error::{IrError, Result};

/// Loop execution kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForKind {
    Serial,
    Parallel,
    Vectorized,
    Unrolled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Evaluates an expression for its side effects
    Evaluate(Expr),
    /// Binds `var` to `value` within `body`
    LetStmt { var: Expr, value: Expr, body: Stmt },
    /// Attaches `attr_key = value` on `node` for the scope of `body`
    AttrStmt {
        node: Expr,
        attr_key: String,
        value: Expr,
        body: Stmt,
    },
    /// `buffer_var[index] = value`
    Store {
        buffer_var: Expr,
        value: Expr,
        index: Expr,
    },
    /// `for loop_var in [min, min + extent)`
    For {
        loop_var: Expr,
        min: Expr,
        extent: Expr,
        kind: ForKind,
        device_api: i32,
        body: Stmt,
    },
}

/// Shared handle to an immutable statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt(Arc<StmtKind>);

fn expect_var(node: &str, field: &str, expr: &Expr) -> Result<()> {
    if expr.is_var() {
        Ok(())
    } else {
        Err(IrError::ExpectedVariable {
            node: node.to_string(),
            field: field.to_string(),
        })
    }
}

impl Stmt {
    fn new(kind: StmtKind) -> Self {
        Stmt(Arc::new(kind))
    }

    pub fn kind(&self) -> &StmtKind {
        &self.0
    }

    pub fn same_as(&self, other: &Stmt) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn type_key(&self) -> &'static str {
        match self.kind() {
            StmtKind::Evaluate(_) => "Evaluate",
            StmtKind::LetStmt { .. } => "LetStmt",
            StmtKind::AttrStmt { .. } => "AttrStmt",
            StmtKind::Store { .. } => "Store",
            StmtKind::For { .. } => "For",
        }
    }

    pub fn evaluate(value: impl Into<Expr>) -> Stmt {
        Stmt::new(StmtKind::Evaluate(value.into()))
    }

    pub fn let_stmt(var: &Expr, value: impl Into<Expr>, body: Stmt) -> Result<Stmt> {
        expect_var("LetStmt", "var", var)?;
        Ok(Stmt::new(StmtKind::LetStmt {
            var: var.clone(),
            value: value.into(),
            body,
        }))
    }

    pub fn attr_stmt(
        node: impl Into<Expr>,
        attr_key: impl Into<String>,
        value: impl Into<Expr>,
        body: Stmt,
    ) -> Stmt {
        Stmt::new(StmtKind::AttrStmt {
            node: node.into(),
            attr_key: attr_key.into(),
            value: value.into(),
            body,
        })
    }

    pub fn store(
        buffer_var: &Expr,
        value: impl Into<Expr>,
        index: impl Into<Expr>,
    ) -> Result<Stmt> {
        expect_var("Store", "buffer_var", buffer_var)?;
        Ok(Stmt::new(StmtKind::Store {
            buffer_var: buffer_var.clone(),
            value: value.into(),
            index: index.into(),
        }))
    }

    pub fn for_loop(
        loop_var: &Expr,
        min: impl Into<Expr>,
        extent: impl Into<Expr>,
        kind: ForKind,
        device_api: i32,
        body: Stmt,
    ) -> Result<Stmt> {
        expect_var("For", "loop_var", loop_var)?;
        Ok(Stmt::new(StmtKind::For {
            loop_var: loop_var.clone(),
            min: min.into(),
            extent: extent.into(),
            kind,
            device_api,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::helper::{constant, var, var_of};
    use crate::error::ErrorKind;

    #[test]
    fn test_evaluate() {
        let x = (constant(1) + constant(1)).unwrap();
        let stmt = Stmt::evaluate(&x);
        match stmt.kind() {
            StmtKind::Evaluate(value) => assert!(value.same_as(&x)),
            other => panic!("Expected Evaluate, got {:?}", other),
        }
    }

    #[test]
    fn test_store_keeps_buffer_var() {
        let n = var("n");
        let a = var_of("array", "handle").unwrap();
        let stmt = Stmt::store(&a, (&n + 1).unwrap(), 1).unwrap();
        match stmt.kind() {
            StmtKind::Store { buffer_var, .. } => assert!(buffer_var.same_as(&a)),
            other => panic!("Expected Store, got {:?}", other),
        }
    }

    #[test]
    fn test_let_requires_var() {
        let x = var("x");
        let body = Stmt::evaluate((&x + 1).unwrap());
        assert!(Stmt::let_stmt(&x, 10, body.clone()).is_ok());

        let err = Stmt::let_stmt(&constant(1), 10, body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedVariable);
    }

    #[test]
    fn test_for_requires_var() {
        let body = Stmt::evaluate(0);
        let i = var("i");
        assert!(Stmt::for_loop(&i, 0, 1, ForKind::Serial, 0, body.clone()).is_ok());

        let err = Stmt::for_loop(&constant(0), 0, 1, ForKind::Serial, 0, body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedVariable);
    }
}
