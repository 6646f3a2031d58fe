//! Whole-file CFG rendering, one Graphviz cluster per function

use super::FunctionFlow;
use crate::dot::escape;
use std::path::Path;

/// Node-name prefix for a file: `file_` plus the base name with every
/// non-alphanumeric character replaced by `_`
pub fn file_prefix(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("file_{}", sanitized)
}

pub fn write_program_dot(prefix: &str, functions: &[FunctionFlow]) -> String {
    let mut out = String::from("digraph G {\n");

    for (f, function) in functions.iter().enumerate() {
        out.push_str(&format!("  subgraph cluster_f{} {{\n", f));
        out.push_str(&format!(
            "    label=\"function {}\";\n",
            escape(&function.name)
        ));

        for node in &function.cfg.nodes {
            out.push_str(&format!(
                "    {}_f{}_n{} [shape=box,label=\"{}\"];\n",
                prefix,
                f,
                node.id,
                escape(&node.text())
            ));
        }
        for node in &function.cfg.nodes {
            for (to, label) in &node.succ {
                out.push_str(&format!(
                    "    {prefix}_f{f}_n{} -> {prefix}_f{f}_n{}",
                    node.id, to
                ));
                if let Some(label) = label {
                    out.push_str(&format!(" [label=\"{}\"]", label.as_str()));
                }
                out.push_str(";\n");
            }
        }

        out.push_str("  }\n");
    }

    out.push_str("}\n");
    out
}
