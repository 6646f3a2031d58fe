//! Labelled tree view of an AST
//!
//! [`build`] flattens the typed AST into a uniform tree of [`OutlineNode`]s,
//! one per AST node, which the text dump, the Graphviz writer in [`crate::dot`]
//! and the terminal viewer all walk.

use crate::parser::ast::*;
use crate::printer::print_expr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub label: String,
    pub location: Option<SourceLocation>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn new(label: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            label: label.into(),
            location,
            children: Vec::new(),
        }
    }

    fn at(label: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(label, Some(location))
    }

    fn with(mut self, child: OutlineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::node_count).sum::<usize>()
    }

    /// Pre-order list of `(depth, node)` pairs
    pub fn flatten(&self) -> Vec<(usize, &OutlineNode)> {
        let mut rows = Vec::with_capacity(self.node_count());
        self.flatten_into(0, &mut rows);
        rows
    }

    fn flatten_into<'a>(&'a self, depth: usize, rows: &mut Vec<(usize, &'a OutlineNode)>) {
        rows.push((depth, self));
        for child in &self.children {
            child.flatten_into(depth + 1, rows);
        }
    }
}

/// Build the outline of a whole file
pub fn build(file: &SourceFile) -> OutlineNode {
    let mut root = OutlineNode::new("source", None);
    for func in file.functions() {
        root.children.push(func_def(func));
    }
    root
}

/// Indented text dump, two spaces per level, with `line:column` suffixes
pub fn render_text(root: &OutlineNode) -> String {
    let mut out = String::new();
    for (depth, node) in root.flatten() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.label);
        if let Some(location) = node.location {
            out.push_str(&format!(" @ {}", location));
        }
        out.push('\n');
    }
    out
}

fn func_def(func: &FuncDef) -> OutlineNode {
    let label = if func.is_declaration() {
        format!("method {} (declaration)", func.name)
    } else {
        format!("method {}", func.name)
    };
    let mut node = OutlineNode::at(label, func.location);

    for arg in &func.params {
        let label = match &arg.arg_type {
            Some(ty) => format!("param {}: {}", arg.name, ty),
            None => format!("param {}", arg.name),
        };
        node.children.push(OutlineNode::at(label, arg.location));
    }

    if let Some(ty) = &func.return_type {
        node.children
            .push(OutlineNode::at(format!("returns {}", ty), ty.location()));
    }

    if let Some(body) = &func.body {
        for decls in &body.var_blocks {
            let location = decls.first().map(|d| d.location);
            let mut section = OutlineNode::new("var", location);
            section.children.extend(decls.iter().map(var_decl));
            node.children.push(section);
        }
        node.children.push(block(&body.block));
    }

    node
}

fn var_decl(decl: &VarDecl) -> OutlineNode {
    let label = match &decl.var_type {
        Some(ty) => format!("decl {}: {}", decl.names.join(", "), ty),
        None => format!("decl {}", decl.names.join(", ")),
    };
    OutlineNode::at(label, decl.location)
}

fn block(block: &Block) -> OutlineNode {
    let mut node = OutlineNode::at("block", block.location);
    node.children.extend(block.statements.iter().map(statement));
    node
}

fn statement(stmt: &Statement) -> OutlineNode {
    let location = stmt.location();
    match stmt {
        Statement::Block(b) => block(b),
        Statement::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            let mut node = OutlineNode::at("if", location)
                .with(expr(condition))
                .with(OutlineNode::at("then", then_branch.location()).with(statement(then_branch)));
            if let Some(else_branch) = else_branch {
                node.children.push(
                    OutlineNode::at("else", else_branch.location()).with(statement(else_branch)),
                );
            }
            node
        }
        Statement::While {
            condition, body, ..
        } => OutlineNode::at("while", location)
            .with(expr(condition))
            .with(OutlineNode::at("do", body.location()).with(statement(body))),
        Statement::DoLoop {
            body,
            kind,
            condition,
            ..
        } => OutlineNode::at(format!("repeat {}", kind.as_str()), location)
            .with(statement(body))
            .with(expr(condition)),
        Statement::Break { .. } => OutlineNode::at("break", location),
        Statement::Assignment { target, value, .. } => OutlineNode::at("assign :=", location)
            .with(expr(target))
            .with(expr(value)),
        Statement::ExprStmt { expr: e, .. } => OutlineNode::at("expr", location).with(expr(e)),
        Statement::VarDecl(decl) => var_decl(decl),
    }
}

fn expr(e: &Expr) -> OutlineNode {
    let location = e.location();
    match e {
        Expr::Literal(value, _) => OutlineNode::at(format!("literal {}", value.raw()), location),
        Expr::Identifier(name, _) => OutlineNode::at(format!("ident {}", name), location),
        Expr::Unary { op, operand, .. } => {
            OutlineNode::at(format!("unary {}", op.symbol()), location).with(expr(operand))
        }
        Expr::Binary {
            op, left, right, ..
        } => OutlineNode::at(format!("binary {}", op.symbol()), location)
            .with(expr(left))
            .with(expr(right)),
        Expr::Call { callee, args, .. } => {
            let label = match callee.as_identifier() {
                Some(name) => format!("call {}", name),
                None => format!("call {}", print_expr(callee)),
            };
            let mut node = OutlineNode::at(label, location);
            node.children.extend(args.iter().map(expr));
            node
        }
        Expr::Index { base, args, .. } => {
            let mut node = OutlineNode::at("index", location).with(expr(base));
            node.children.extend(args.iter().map(expr));
            node
        }
        Expr::Paren { inner, .. } => OutlineNode::at("paren", location).with(expr(inner)),
    }
}
