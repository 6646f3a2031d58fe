//! Canonical pretty-printer
//!
//! Renders a [`SourceFile`] back to source text with four-space indentation and
//! one statement per line. Word operators are normalised to their symbolic
//! spelling (`and` → `&&`, `or` → `||`, `not` → `!`), so printing a parsed
//! file and parsing the output again yields the same tree.
//!
//! Declarations inside a block print bare (`a, b: int;`). Only a single untyped
//! name keeps a leading `var`, since a bare `x;` reads back as an expression
//! statement.

use crate::parser::ast::*;

const INDENT: &str = "    ";

/// Render a whole file
pub fn print_source_file(file: &SourceFile) -> String {
    let mut printer = Printer::default();
    for (i, func) in file.functions().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.func_def(func);
    }
    printer.out
}

/// Render a single statement at indentation level zero
pub fn print_statement(stmt: &Statement) -> String {
    let mut printer = Printer::default();
    printer.statement(stmt);
    printer.out
}

/// Render an expression on one line
pub fn print_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn func_def(&mut self, func: &FuncDef) {
        let params: Vec<String> = func
            .params
            .iter()
            .map(|arg| match &arg.arg_type {
                Some(ty) => format!("{}: {}", arg.name, ty),
                None => arg.name.clone(),
            })
            .collect();

        let mut header = format!("method {}({})", func.name, params.join(", "));
        if let Some(ty) = &func.return_type {
            header.push_str(&format!(": {}", ty));
        }

        let Some(body) = &func.body else {
            header.push(';');
            self.line(&header);
            return;
        };

        self.line(&header);
        for decls in &body.var_blocks {
            self.line("var");
            self.depth += 1;
            for decl in decls {
                self.line(&var_decl(decl));
            }
            self.depth -= 1;
        }
        self.block(&body.block);
    }

    fn block(&mut self, block: &Block) {
        self.line("begin");
        self.depth += 1;
        for stmt in &block.statements {
            self.statement(stmt);
        }
        self.depth -= 1;
        self.line("end;");
    }

    /// Print `stmt` one level deeper than the current line
    fn nested(&mut self, stmt: &Statement) {
        self.depth += 1;
        self.statement(stmt);
        self.depth -= 1;
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(block) => self.block(block),
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.line(&format!("if {} then", print_expr(condition)));
                self.nested(then_branch);
                if let Some(else_branch) = else_branch {
                    self.line("else");
                    self.nested(else_branch);
                }
            }
            Statement::While {
                condition, body, ..
            } => {
                self.line(&format!("while {} do", print_expr(condition)));
                self.nested(body);
            }
            Statement::DoLoop {
                body,
                kind,
                condition,
                ..
            } => {
                self.line("repeat");
                self.nested(body);
                self.line(&format!("{} {};", kind.as_str(), print_expr(condition)));
            }
            Statement::Break { .. } => self.line("break;"),
            Statement::Assignment { target, value, .. } => {
                self.line(&format!("{} := {};", print_expr(target), print_expr(value)));
            }
            Statement::ExprStmt { expr, .. } => {
                self.line(&format!("{};", print_expr(expr)));
            }
            Statement::VarDecl(decl) if decl.names.len() == 1 && decl.var_type.is_none() => {
                self.line(&format!("var {}", var_decl(decl)))
            }
            Statement::VarDecl(decl) => self.line(&var_decl(decl)),
        }
    }
}

fn var_decl(decl: &VarDecl) -> String {
    match &decl.var_type {
        Some(ty) => format!("{}: {};", decl.names.join(", "), ty),
        None => format!("{};", decl.names.join(", ")),
    }
}

/// Binding strength of an expression's outermost form; higher binds tighter
fn strength(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => op.level(),
        Expr::Unary { .. } => 11,
        _ => 12,
    }
}

/// Write `expr`, adding parentheses only when the tree could not be read back
/// otherwise. Trees produced by the parser never need them.
fn write_operand(out: &mut String, expr: &Expr, min_strength: u8) {
    if strength(expr) < min_strength {
        out.push('(');
        write_expr(out, expr);
        out.push(')');
    } else {
        write_expr(out, expr);
    }
}

fn write_list(out: &mut String, args: &[Expr]) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, arg);
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(value, _) => out.push_str(value.raw()),
        Expr::Identifier(name, _) => out.push_str(name),
        Expr::Paren { inner, .. } => {
            out.push('(');
            write_expr(out, inner);
            out.push(')');
        }
        Expr::Unary { op, operand, .. } => {
            out.push_str(op.symbol());
            write_operand(out, operand, 11);
        }
        Expr::Binary {
            op, left, right, ..
        } => {
            let level = op.level();
            write_operand(out, left, level);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_operand(out, right, level + 1);
        }
        Expr::Call { callee, args, .. } => {
            write_operand(out, callee, 12);
            out.push('(');
            write_list(out, args);
            out.push(')');
        }
        Expr::Index { base, args, .. } => {
            write_operand(out, base, 12);
            out.push('[');
            write_list(out, args);
            out.push(']');
        }
    }
}
