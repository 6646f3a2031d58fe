//! Graphviz output for AST outlines

use crate::outline::OutlineNode;

/// Escape `"`, `\`, and line breaks for use inside a quoted DOT string
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote `s` as a DOT string
pub fn escape_label(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

/// Emit `digraph AST { ... }`, numbering nodes in pre-order
pub fn ast_to_dot(root: &OutlineNode) -> String {
    let mut out = String::from("digraph AST {\n");
    let mut next_id = 0;
    write_node(&mut out, root, None, &mut next_id);
    out.push_str("}\n");
    out
}

fn write_node(out: &mut String, node: &OutlineNode, parent: Option<usize>, next_id: &mut usize) {
    let id = *next_id;
    *next_id += 1;

    out.push_str(&format!("  n{} [label={}];\n", id, escape_label(&node.label)));
    if let Some(parent) = parent {
        out.push_str(&format!("  n{} -> n{};\n", parent, id));
    }

    for child in &node.children {
        write_node(out, child, Some(id), next_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{outline, parse_source};

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("plain"), "\"plain\"");
        assert_eq!(escape_label("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn test_ast_to_dot() {
        let file = parse_source("method f() begin break; end;").unwrap();
        let dot = ast_to_dot(&outline::build(&file));

        assert_eq!(
            dot,
            "digraph AST {
  n0 [label=\"source\"];
  n1 [label=\"method f\"];
  n0 -> n1;
  n2 [label=\"block\"];
  n1 -> n2;
  n3 [label=\"break\"];
  n2 -> n3;
}
"
        );
    }

    #[test]
    fn test_string_literal_label() {
        let file = parse_source("method f() begin s := \"hi\"; end;").unwrap();
        let dot = ast_to_dot(&outline::build(&file));
        assert!(dot.contains("[label=\"literal \\\"hi\\\"\"];"));
    }
}
