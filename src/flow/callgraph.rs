//! Call graph between the methods of one file

use crate::parser::ast::*;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEdge {
    pub caller: String,
    pub callee: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallGraph {
    /// Unique method names, in declaration order
    pub nodes: Vec<String>,
    /// Edges in first-seen order
    pub edges: Vec<CallEdge>,
}

impl CallGraph {
    /// Count calls whose callee is a plain identifier naming a method of `file`
    pub fn build(file: &SourceFile) -> CallGraph {
        let mut graph = CallGraph::default();
        for func in file.functions() {
            if !graph.nodes.contains(&func.name) {
                graph.nodes.push(func.name.clone());
            }
        }

        let mut index: FxHashMap<(String, String), usize> = FxHashMap::default();
        for func in file.functions() {
            let Some(body) = &func.body else {
                continue;
            };
            let mut callees = Vec::new();
            for stmt in &body.block.statements {
                collect_statement(stmt, &mut callees);
            }

            for callee in callees {
                if !graph.nodes.iter().any(|n| n == callee) {
                    continue;
                }
                let key = (func.name.clone(), callee.to_string());
                match index.get(&key) {
                    Some(&i) => graph.edges[i].count += 1,
                    None => {
                        index.insert(key, graph.edges.len());
                        graph.edges.push(CallEdge {
                            caller: func.name.clone(),
                            callee: callee.to_string(),
                            count: 1,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built call graph"
        );
        graph
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph CallGraph {\n");
        for name in &self.nodes {
            out.push_str(&format!("  \"{}\";\n", name));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                edge.caller, edge.callee, edge.count
            ));
        }
        out.push_str("}\n");
        out
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("caller,callee,count\n");
        for edge in &self.edges {
            out.push_str(&format!("{},{},{}\n", edge.caller, edge.callee, edge.count));
        }
        out
    }
}

fn collect_statement<'a>(stmt: &'a Statement, out: &mut Vec<&'a str>) {
    match stmt {
        Statement::Block(block) => {
            for s in &block.statements {
                collect_statement(s, out);
            }
        }
        Statement::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            collect_expr(condition, out);
            collect_statement(then_branch, out);
            if let Some(else_branch) = else_branch {
                collect_statement(else_branch, out);
            }
        }
        Statement::While {
            condition, body, ..
        } => {
            collect_expr(condition, out);
            collect_statement(body, out);
        }
        Statement::DoLoop {
            body, condition, ..
        } => {
            collect_statement(body, out);
            collect_expr(condition, out);
        }
        Statement::Assignment { target, value, .. } => {
            collect_expr(target, out);
            collect_expr(value, out);
        }
        Statement::ExprStmt { expr, .. } => collect_expr(expr, out),
        Statement::Break { .. } | Statement::VarDecl(_) => {}
    }
}

fn collect_expr<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match expr {
        Expr::Literal(..) | Expr::Identifier(..) => {}
        Expr::Unary { operand, .. } => collect_expr(operand, out),
        Expr::Binary { left, right, .. } => {
            collect_expr(left, out);
            collect_expr(right, out);
        }
        Expr::Paren { inner, .. } => collect_expr(inner, out),
        Expr::Call { callee, args, .. } => {
            match callee.as_identifier() {
                Some(name) => out.push(name),
                None => collect_expr(callee, out),
            }
            for arg in args {
                collect_expr(arg, out);
            }
        }
        Expr::Index { base, args, .. } => {
            collect_expr(base, out);
            for arg in args {
                collect_expr(arg, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    const SOURCE: &str = "
        method helper(x);
        method main()
        begin
            a := helper(1) + helper(2);
            if check(a) then
                log(helper(a));
        end;
        method log(v)
        begin
            print(v);
            main();
        end;
    ";

    #[test]
    fn test_build_counts_known_calls() {
        let graph = CallGraph::build(&parse_source(SOURCE).unwrap());

        assert_eq!(graph.nodes, vec!["helper", "main", "log"]);
        assert_eq!(
            graph.edges,
            vec![
                CallEdge {
                    caller: "main".to_string(),
                    callee: "helper".to_string(),
                    count: 3,
                },
                CallEdge {
                    caller: "main".to_string(),
                    callee: "log".to_string(),
                    count: 1,
                },
                CallEdge {
                    caller: "log".to_string(),
                    callee: "main".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_to_dot_and_csv() {
        let graph = CallGraph::build(&parse_source(SOURCE).unwrap());

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph CallGraph {\n  \"helper\";\n"));
        assert!(dot.contains("  \"main\" -> \"helper\" [label=\"3\"];\n"));

        assert_eq!(
            graph.to_csv(),
            "caller,callee,count\nmain,helper,3\nmain,log,1\nlog,main,1\n"
        );
    }

    #[test]
    fn test_duplicate_names_listed_once() {
        let graph = CallGraph::build(&parse_source("method f(); method f() begin f(); end;").unwrap());
        assert_eq!(graph.nodes, vec!["f"]);
        assert_eq!(graph.edges.len(), 1);
    }
}
