//! Canonical text rendering of expressions and statements
//!
//! The output is deterministic and only reflects nodes that exist in the tree;
//! implicit conversions show up because construction materialized them as
//! `Cast`/`Broadcast` nodes.

use std::fmt;

use log::trace;

use super::stmt::{ForKind, Stmt, StmtKind};
use super::{BinaryOpKind, Expr, ExprKind, UnaryOpKind};
use crate::ast::DType;

/// Renderer options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Indentation unit for nested statements
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

/// Renders IR nodes to their canonical string form
#[derive(Debug, Default)]
pub struct IrRenderer {
    indent_level: usize,
    options: RenderOptions,
}

/// How a binary operator is written
enum BinaryFormat {
    /// `(a<sep>b)`
    Infix(&'static str),
    /// `name(a, b)`
    Call(&'static str),
}

fn binary_format(op: BinaryOpKind) -> BinaryFormat {
    use BinaryFormat::*;
    match op {
        BinaryOpKind::Add => Infix(" + "),
        BinaryOpKind::Sub => Infix(" - "),
        BinaryOpKind::Mul => Infix("*"),
        BinaryOpKind::Div => Infix("/"),
        BinaryOpKind::Mod => Infix(" % "),
        BinaryOpKind::Eq => Infix(" == "),
        BinaryOpKind::Ne => Infix(" != "),
        BinaryOpKind::Lt => Infix(" < "),
        BinaryOpKind::Le => Infix(" <= "),
        BinaryOpKind::Gt => Infix(" > "),
        BinaryOpKind::Ge => Infix(" >= "),
        BinaryOpKind::And => Infix(" && "),
        BinaryOpKind::Or => Infix(" || "),
        BinaryOpKind::FloorDiv => Call("floordiv"),
        BinaryOpKind::FloorMod => Call("floormod"),
        BinaryOpKind::Max => Call("max"),
        BinaryOpKind::Min => Call("min"),
    }
}

impl IrRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_option(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn render_expr(&self, expr: &Expr) -> String {
        match expr.kind() {
            ExprKind::IntImm(v) => self.render_int(*v, expr.dtype()),
            ExprKind::FloatImm(v) => self.render_float(*v, expr.dtype()),
            ExprKind::StringImm(v) => format!("{:?}", v),
            ExprKind::Var(name) => name.clone(),
            ExprKind::Unary { op, operand } => match op {
                UnaryOpKind::Not => format!("!{}", self.render_expr(operand)),
                UnaryOpKind::BitwiseNot => format!("bitwise_not({})", self.render_expr(operand)),
            },
            ExprKind::Binary { op, lhs, rhs } => match binary_format(*op) {
                BinaryFormat::Infix(sep) => format!(
                    "({}{}{})",
                    self.render_expr(lhs),
                    sep,
                    self.render_expr(rhs)
                ),
                BinaryFormat::Call(name) => {
                    format!("{}({}, {})", name, self.render_expr(lhs), self.render_expr(rhs))
                }
            },
            ExprKind::Bitwise { op, lhs, rhs } => format!(
                "{}({}, {})",
                op.name(),
                self.render_expr(lhs),
                self.render_expr(rhs)
            ),
            ExprKind::Cast(value) => format!("{}({})", expr.dtype(), self.render_expr(value)),
            ExprKind::Broadcast(value) => {
                format!("x{}({})", expr.lanes(), self.render_expr(value))
            }
            ExprKind::Call { name, args } => {
                let arg_strs: Vec<_> = args.iter().map(|a| self.render_expr(a)).collect();
                format!("{}({})", name, arg_strs.join(", "))
            }
        }
    }

    fn render_int(&self, v: i64, dtype: DType) -> String {
        if dtype == DType::int(32, 1) {
            format!("{}", v)
        } else {
            format!("({}){}", dtype, v)
        }
    }

    fn render_float(&self, v: f64, dtype: DType) -> String {
        if dtype == DType::float(32, 1) {
            format!("{}f", v)
        } else if dtype == DType::float(64, 1) {
            format!("{}", v)
        } else {
            format!("({}){}", dtype, v)
        }
    }

    /// Renders a statement tree, one statement per line
    pub fn render_stmt(&mut self, stmt: &Stmt) -> String {
        let mut buffer = String::new();
        self.render_stmt_into(stmt, &mut buffer);
        buffer
    }

    fn render_stmt_into(&mut self, stmt: &Stmt, buffer: &mut String) {
        trace!("rendering {} at indent level {}", stmt.type_key(), self.indent_level);
        let indent = self.indent();
        match stmt.kind() {
            StmtKind::Evaluate(value) => {
                buffer.push_str(&format!("{}{}\n", indent, self.render_expr(value)));
            }
            StmtKind::LetStmt { var, value, body } => {
                buffer.push_str(&format!(
                    "{}let {} = {}\n",
                    indent,
                    self.render_expr(var),
                    self.render_expr(value)
                ));
                self.render_stmt_into(body, buffer);
            }
            StmtKind::AttrStmt {
                node,
                attr_key,
                value,
                body,
            } => {
                buffer.push_str(&format!(
                    "{}// attr [{}] {} = {}\n",
                    indent,
                    self.render_expr(node),
                    attr_key,
                    self.render_expr(value)
                ));
                self.render_stmt_into(body, buffer);
            }
            StmtKind::Store {
                buffer_var,
                value,
                index,
            } => {
                buffer.push_str(&format!(
                    "{}{}[{}] = {}\n",
                    indent,
                    self.render_expr(buffer_var),
                    self.render_expr(index),
                    self.render_expr(value)
                ));
            }
            StmtKind::For {
                loop_var,
                min,
                extent,
                kind,
                body,
                ..
            } => {
                let prefix = match kind {
                    ForKind::Serial => "",
                    ForKind::Parallel => "parallel ",
                    ForKind::Vectorized => "vectorized ",
                    ForKind::Unrolled => "unrolled ",
                };
                buffer.push_str(&format!(
                    "{}{}for ({}, {}, {}) {{\n",
                    indent,
                    prefix,
                    self.render_expr(loop_var),
                    self.render_expr(min),
                    self.render_expr(extent)
                ));
                self.indent_level += 1;
                self.render_stmt_into(body, buffer);
                self.indent_level -= 1;
                buffer.push_str(&format!("{}}}\n", indent));
            }
        }
    }

    fn indent(&self) -> String {
        self.options.indent.repeat(self.indent_level)
    }
}

/// Helper: render an expression with default options
pub fn render_expr(expr: &Expr) -> String {
    IrRenderer::new().render_expr(expr)
}

/// Helper: render a statement with default options
pub fn render_stmt(stmt: &Stmt) -> String {
    IrRenderer::new().render_stmt(stmt)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_expr(self))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_stmt(self))
    }
}
