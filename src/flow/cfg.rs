//! Per-function control-flow graphs
//!
//! # Layout
//!
//! Node 0 is always the function exit. Straight-line statements (assignments,
//! expression statements, declarations) are packed into blocks of at most
//! [`FlowOptions::max_block_lines`] operations; any compound statement ends the
//! pending block. Branch and loop shapes:
//!
//! ```text
//! if:      cond ─true→ then ─→ join        while:   cond ─true→ body ─→ cond
//!               └false→ else ─→ join                     └false→ after_while
//!
//! repeat ... while c:  body → cond ─true→ body, cond ─false→ after_while
//! repeat ... until c:  body → cond ─false→ body, cond ─true→ after_while
//! ```
//!
//! `break` jumps to the innermost loop's `after_while` node and has no
//! fall-through successor; statements following it are unreachable.

use super::ir::IrFormatter;
use super::FlowOptions;
use crate::dot::escape;
use crate::parser::ast::*;
use std::fmt;

/// Logical role of a CFG node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Entry,
    Exit,
    Block,
    IfCond,
    IfThen,
    IfElse,
    IfJoin,
    WhileCond,
    WhileBody,
    AfterWhile,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Entry => "entry",
            Role::Exit => "exit",
            Role::Block => "block",
            Role::IfCond => "if.cond",
            Role::IfThen => "if.then",
            Role::IfElse => "if.else",
            Role::IfJoin => "if.join",
            Role::WhileCond => "while.cond",
            Role::WhileBody => "while.body",
            Role::AfterWhile => "after_while",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Branch outcome carried by conditional edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeLabel {
    True,
    False,
}

impl EdgeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeLabel::True => "true",
            EdgeLabel::False => "false",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgNode {
    pub id: usize,
    pub role: Role,
    pub label: String, // "B<id> (<role>)"
    pub ops: Vec<String>,
    pub succ: Vec<(usize, Option<EdgeLabel>)>,
}

impl CfgNode {
    /// Label plus every operation, one per line
    pub fn text(&self) -> String {
        let mut text = self.label.clone();
        for op in &self.ops {
            text.push('\n');
            text.push_str(op);
        }
        text
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cfg {
    pub nodes: Vec<CfgNode>,
}

impl Cfg {
    /// Build the graph for one function or forward declaration
    pub fn build(func: &FuncDef, options: &FlowOptions) -> Cfg {
        let mut builder = Builder {
            cfg: Cfg::default(),
            ir: IrFormatter::new(options.max_ir_depth),
            max_block_lines: options.max_block_lines.max(1),
            loops: Vec::new(),
        };

        let exit = builder.add_node(Role::Exit);
        builder.add_line(exit, "Nop(exit)");

        match &func.body {
            None => {
                let entry = builder.empty_node(Role::Entry);
                builder.add_edge(entry, exit, None);
            }
            Some(body) => {
                let mut seq = Sequence::new(Some(Role::Entry));
                for decl in body.var_blocks.iter().flatten() {
                    for line in builder.ir.var_decl(decl) {
                        builder.push_line(&mut seq, line);
                    }
                }
                let (entry, last) = builder.sequence(seq, &body.block.statements);
                builder.add_edge(last.unwrap_or(entry), exit, None);
            }
        }

        tracing::debug!(function = %func.name, nodes = builder.cfg.nodes.len(), "built cfg");
        builder.cfg
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.succ.len()).sum()
    }

    /// Standalone `digraph CFG_<name>` rendering
    pub fn to_dot(&self, name: &str) -> String {
        let mut out = format!("digraph CFG_{} {{\n", name);
        for node in &self.nodes {
            out.push_str(&format!("  n{} [label=\"{}\"];\n", node.id, escape(&node.text())));
        }
        for node in &self.nodes {
            for (to, label) in &node.succ {
                match label {
                    Some(label) => out.push_str(&format!(
                        "  n{} -> n{} [label=\"{}\"];\n",
                        node.id,
                        to,
                        label.as_str()
                    )),
                    None => out.push_str(&format!("  n{} -> n{};\n", node.id, to)),
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

/// Straight-line operations waiting to become a block, plus the
/// entry/exit bookkeeping of the statement list being walked
struct Sequence {
    first_role: Option<Role>,
    pending: Vec<String>,
    first: Option<usize>,
    last: Option<usize>,
}

impl Sequence {
    fn new(first_role: Option<Role>) -> Self {
        Self {
            first_role,
            pending: Vec::new(),
            first: None,
            last: None,
        }
    }
}

/// Break sources collected while walking a loop body
struct LoopFrame {
    breaks: Vec<usize>,
}

struct Builder {
    cfg: Cfg,
    ir: IrFormatter,
    max_block_lines: usize,
    loops: Vec<LoopFrame>,
}

impl Builder {
    fn add_node(&mut self, role: Role) -> usize {
        let id = self.cfg.nodes.len();
        self.cfg.nodes.push(CfgNode {
            id,
            role,
            label: format!("B{} ({})", id, role),
            ops: Vec::new(),
            succ: Vec::new(),
        });
        id
    }

    fn add_line(&mut self, node: usize, line: impl Into<String>) {
        if let Some(node) = self.cfg.nodes.get_mut(node) {
            node.ops.push(line.into());
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, label: Option<EdgeLabel>) {
        if to >= self.cfg.nodes.len() {
            return;
        }
        if let Some(node) = self.cfg.nodes.get_mut(from) {
            node.succ.push((to, label));
        }
    }

    fn empty_node(&mut self, role: Role) -> usize {
        let node = self.add_node(role);
        self.add_line(node, "empty");
        node
    }

    /// Node holding one or more operation lines
    fn ops_node(&mut self, role: Option<Role>, lines: Vec<String>) -> usize {
        let node = self.add_node(role.unwrap_or(Role::Block));
        for line in lines {
            self.add_line(node, line);
        }
        node
    }

    fn push_line(&mut self, seq: &mut Sequence, line: String) {
        seq.pending.push(line);
        if seq.pending.len() >= self.max_block_lines {
            self.flush(seq);
        }
    }

    fn flush(&mut self, seq: &mut Sequence) {
        if seq.pending.is_empty() {
            return;
        }
        let role = if seq.first.is_none() {
            seq.first_role
        } else {
            None
        };
        let lines = std::mem::take(&mut seq.pending);
        let node = self.ops_node(role, lines);
        self.link(seq, node, Some(node));
    }

    /// Append a sub-graph `(entry, exit)` to the sequence
    fn link(&mut self, seq: &mut Sequence, entry: usize, exit: Option<usize>) {
        if seq.first.is_none() {
            seq.first = Some(entry);
        }
        if let Some(last) = seq.last {
            self.add_edge(last, entry, None);
        }
        seq.last = exit;
    }

    /// Walk a statement list; returns the entry node and the fall-through exit
    fn sequence(&mut self, mut seq: Sequence, statements: &[Statement]) -> (usize, Option<usize>) {
        for stmt in statements {
            match stmt {
                Statement::Assignment { target, value, .. } => {
                    let line = self.ir.assignment(target, value);
                    self.push_line(&mut seq, line);
                }
                Statement::ExprStmt { expr, .. } => {
                    let line = self.ir.expr_stmt(expr);
                    self.push_line(&mut seq, line);
                }
                Statement::VarDecl(decl) => {
                    for line in self.ir.var_decl(decl) {
                        self.push_line(&mut seq, line);
                    }
                }
                _ => {
                    self.flush(&mut seq);
                    let (entry, exit) = self.statement(stmt, None);
                    self.link(&mut seq, entry, exit);
                }
            }
        }
        self.flush(&mut seq);

        match seq.first {
            Some(first) => (first, seq.last),
            None => {
                let node = self.empty_node(seq.first_role.unwrap_or(Role::Block));
                (node, Some(node))
            }
        }
    }

    fn statement(&mut self, stmt: &Statement, role: Option<Role>) -> (usize, Option<usize>) {
        match stmt {
            Statement::Block(block) => self.sequence(Sequence::new(role), &block.statements),
            Statement::Assignment { target, value, .. } => {
                let line = self.ir.assignment(target, value);
                let node = self.ops_node(role, vec![line]);
                (node, Some(node))
            }
            Statement::ExprStmt { expr, .. } => {
                let line = self.ir.expr_stmt(expr);
                let node = self.ops_node(role, vec![line]);
                (node, Some(node))
            }
            Statement::VarDecl(decl) => {
                let lines = self.ir.var_decl(decl);
                let node = self.ops_node(role, lines);
                (node, Some(node))
            }
            Statement::Break { .. } => {
                let node = self.ops_node(role, vec!["Nop(break)".to_string()]);
                if let Some(frame) = self.loops.last_mut() {
                    frame.breaks.push(node);
                }
                (node, None)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.add_node(Role::IfCond);
                let line = self.ir.condition("IfCond", condition);
                self.add_line(cond, line);

                let (then_entry, then_exit) = self.statement(then_branch, Some(Role::IfThen));
                let (else_entry, else_exit) = match else_branch {
                    Some(else_branch) => self.statement(else_branch, Some(Role::IfElse)),
                    None => {
                        let node = self.empty_node(Role::IfElse);
                        (node, Some(node))
                    }
                };

                let join = self.add_node(Role::IfJoin);
                self.add_line(join, "join");

                self.add_edge(cond, then_entry, Some(EdgeLabel::True));
                self.add_edge(cond, else_entry, Some(EdgeLabel::False));
                if let Some(exit) = then_exit {
                    self.add_edge(exit, join, None);
                }
                if let Some(exit) = else_exit {
                    self.add_edge(exit, join, None);
                }
                (cond, Some(join))
            }
            Statement::While {
                condition, body, ..
            } => {
                let cond = self.add_node(Role::WhileCond);
                let line = self.ir.condition("WhileCond", condition);
                self.add_line(cond, line);
                let exit = self.add_node(Role::AfterWhile);
                self.add_line(exit, "Nop(exit)");

                self.loops.push(LoopFrame { breaks: Vec::new() });
                let (body_entry, body_exit) = self.statement(body, Some(Role::WhileBody));
                self.close_loop(exit);

                self.add_edge(cond, body_entry, Some(EdgeLabel::True));
                if let Some(body_exit) = body_exit {
                    self.add_edge(body_exit, cond, None);
                }
                self.add_edge(cond, exit, Some(EdgeLabel::False));
                (cond, Some(exit))
            }
            Statement::DoLoop {
                body,
                kind,
                condition,
                ..
            } => {
                self.loops.push(LoopFrame { breaks: Vec::new() });
                let (body_entry, body_exit) = self.statement(body, Some(Role::WhileBody));

                let cond = self.add_node(Role::WhileCond);
                let head = format!("RepeatCond({})", kind.as_str());
                let line = self.ir.condition(&head, condition);
                self.add_line(cond, line);
                let exit = self.add_node(Role::AfterWhile);
                self.add_line(exit, "Nop(exit)");
                self.close_loop(exit);

                if let Some(body_exit) = body_exit {
                    self.add_edge(body_exit, cond, None);
                }
                let (again, done) = match kind {
                    LoopKind::While => (EdgeLabel::True, EdgeLabel::False),
                    LoopKind::Until => (EdgeLabel::False, EdgeLabel::True),
                };
                self.add_edge(cond, body_entry, Some(again));
                self.add_edge(cond, exit, Some(done));
                (body_entry, Some(exit))
            }
        }
    }

    /// Pop the innermost loop, pointing its breaks at `exit`
    fn close_loop(&mut self, exit: usize) {
        if let Some(frame) = self.loops.pop() {
            for node in frame.breaks {
                self.add_edge(node, exit, None);
            }
        }
    }
}
