//! One-line IR text for the operations inside CFG nodes
//!
//! Expressions render as nested `Kind(detail) { operand | operand }` terms.
//! Leaves and parenthesised groups count one level of nesting, binary chains,
//! unary operands and call/index parts count one more, and anything nested
//! deeper than the configured limit collapses to `...`.

use crate::parser::ast::*;
use crate::printer::print_expr;

pub(crate) struct IrFormatter {
    max_depth: usize,
}

impl IrFormatter {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub(crate) fn assignment(&self, target: &Expr, value: &Expr) -> String {
        format!(
            "Assign(=)\n  lhs: {}\n  rhs: {}",
            self.expr(target, 0),
            self.expr(value, 0)
        )
    }

    pub(crate) fn expr_stmt(&self, expr: &Expr) -> String {
        format!("ExprStmt\n  expr: {}", self.expr(expr, 0))
    }

    /// One `VarDecl(T)` line per declared name
    pub(crate) fn var_decl(&self, decl: &VarDecl) -> Vec<String> {
        let type_text = decl
            .var_type
            .as_ref()
            .map(|ty| ty.to_string())
            .unwrap_or_else(|| "auto".to_string());
        decl.names
            .iter()
            .map(|name| format!("VarDecl({})\n  var: {}", type_text, name))
            .collect()
    }

    pub(crate) fn condition(&self, head: &str, expr: &Expr) -> String {
        format!("{}\n  expr: {}", head, self.expr(expr, 0))
    }

    pub(crate) fn expr(&self, expr: &Expr, depth: usize) -> String {
        if depth > self.max_depth {
            return "...".to_string();
        }

        match expr {
            Expr::Identifier(name, _) => self.leaf(depth, || format!("Nop(Identifier) [var:{}]", name)),
            Expr::Literal(value, _) => {
                self.leaf(depth, || format!("Nop(Literal) [const:{}]", value.raw()))
            }
            Expr::Paren { inner, .. } => self.expr(inner, depth + 1),
            Expr::Unary { op, operand, .. } => {
                format!("UnaryOp({}) {{ {} }}", op.symbol(), self.expr(operand, depth + 1))
            }
            Expr::Binary { op, .. } => self.binary_chain(expr, op.level(), depth),
            Expr::Call { callee, args, .. } => {
                let name = first_identifier(callee)
                    .map(str::to_string)
                    .unwrap_or_else(|| summarize(&print_expr(callee)));
                let args: Vec<String> = args.iter().map(|a| self.expr(a, depth + 2)).collect();
                if args.is_empty() {
                    format!("Call({}) {{ }}", name)
                } else {
                    format!("Call({}) {{ {} }}", name, args.join(" | "))
                }
            }
            Expr::Index { base, args, .. } => {
                let base = self.expr(base, depth + 2);
                let mut indices: Vec<String> =
                    args.iter().map(|a| self.expr(a, depth + 2)).collect();
                let index = match indices.len() {
                    0 => "...".to_string(),
                    1 => indices.remove(0),
                    _ => format!("Tuple {{ {} }}", indices.join(" | ")),
                };
                format!("BinaryOp(IndexExpr) {{ {} | {} }}", base, index)
            }
        }
    }

    fn leaf(&self, depth: usize, text: impl FnOnce() -> String) -> String {
        if depth + 1 > self.max_depth {
            "...".to_string()
        } else {
            text()
        }
    }

    /// Left-folded chain of operators sharing one precedence level
    fn binary_chain(&self, expr: &Expr, level: u8, depth: usize) -> String {
        let mut operands = Vec::new();
        let mut ops = Vec::new();
        let mut current = expr;
        while let Expr::Binary {
            op, left, right, ..
        } = current
        {
            if op.level() != level {
                break;
            }
            operands.push(right.as_ref());
            ops.push(*op);
            current = left.as_ref();
        }
        operands.push(current);
        operands.reverse();
        ops.reverse();

        let mut acc = self.expr(operands[0], depth + 1);
        for (op, operand) in ops.iter().zip(&operands[1..]) {
            acc = format!(
                "BinaryOp({}) {{ {} | {} }}",
                chain_kind(*op),
                acc,
                self.expr(operand, depth + 1)
            );
        }
        acc
    }
}

fn chain_kind(op: BinOp) -> &'static str {
    match op {
        BinOp::Or | BinOp::And => "LogicExpr",
        BinOp::BitOr | BinOp::BitXor | BinOp::BitAnd | BinOp::Shl | BinOp::Shr => "BitwiseExpr",
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => "CompareExpr",
        BinOp::Add | BinOp::Sub => "AddExpr",
        BinOp::Mul | BinOp::Div | BinOp::Mod => "MulExpr",
    }
}

/// Leftmost identifier in `expr`, searching depth first
pub(crate) fn first_identifier(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Identifier(name, _) => Some(name),
        Expr::Literal(..) => None,
        Expr::Paren { inner, .. } => first_identifier(inner),
        Expr::Unary { operand, .. } => first_identifier(operand),
        Expr::Binary { left, right, .. } => {
            first_identifier(left).or_else(|| first_identifier(right))
        }
        Expr::Call { callee, args, .. } => first_identifier(callee)
            .or_else(|| args.iter().find_map(first_identifier)),
        Expr::Index { base, args, .. } => {
            first_identifier(base).or_else(|| args.iter().find_map(first_identifier))
        }
    }
}

/// Short stand-in for source text that is too long to show inline
fn summarize(text: &str) -> String {
    let len = text.chars().count();
    if text.is_empty() {
        "expr".to_string()
    } else if len <= 18 || (text.contains('(') && len <= 28) {
        text.to_string()
    } else if text.contains(|c: char| "+-*/%&|^=!<>".contains(c)) {
        "complex_expr".to_string()
    } else {
        "expr".to_string()
    }
}
