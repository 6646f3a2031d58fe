//! Control-flow and call-graph analysis over parsed files
//!
//! [`analyze`] builds one [`cfg::Cfg`] per method; [`write_file_outputs`]
//! renders a file's graphs and call graph into an output directory.

pub mod callgraph;
pub mod cfg;
pub mod dot;
mod ir;

use crate::diagnostic::Diagnostic;
use crate::parser::ast::SourceFile;
use callgraph::CallGraph;
use cfg::Cfg;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tunables for CFG construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOptions {
    /// Straight-line operations per block before a new block starts
    pub max_block_lines: usize,
    /// Expression nesting shown in operation text before eliding with `...`
    pub max_ir_depth: usize,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            max_block_lines: 3,
            max_ir_depth: 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Diagnostic,
    },
}

/// The CFG of one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFlow {
    pub name: String,
    pub cfg: Cfg,
}

/// Build the CFG of every method in declaration order
pub fn analyze(file: &SourceFile, options: &FlowOptions) -> Vec<FunctionFlow> {
    file.functions()
        .map(|func| FunctionFlow {
            name: func.name.clone(),
            cfg: Cfg::build(func, options),
        })
        .collect()
}

/// Write `<base>.dot`, `<base>.callgraph.dot` and `<base>.callgraph.csv`
/// for `path` into `outdir`, creating the directory when missing.
/// `<base>` is the full file name of `path`.
pub fn write_file_outputs(
    path: &Path,
    file: &SourceFile,
    outdir: &Path,
    options: &FlowOptions,
) -> Result<Vec<PathBuf>, FlowError> {
    fs::create_dir_all(outdir).map_err(|source| FlowError::Io {
        path: outdir.to_path_buf(),
        source,
    })?;

    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());

    let functions = analyze(file, options);
    let graph = CallGraph::build(file);

    let outputs = [
        (
            format!("{}.dot", base),
            dot::write_program_dot(&dot::file_prefix(path), &functions),
        ),
        (format!("{}.callgraph.dot", base), graph.to_dot()),
        (format!("{}.callgraph.csv", base), graph.to_csv()),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, contents) in outputs {
        let target = outdir.join(name);
        fs::write(&target, contents).map_err(|source| FlowError::Io {
            path: target.clone(),
            source,
        })?;
        tracing::debug!(path = %target.display(), "wrote flow output");
        written.push(target);
    }
    Ok(written)
}

/// Read and parse `path`, then write its outputs as [`write_file_outputs`] does
pub fn process_file(
    path: &Path,
    outdir: &Path,
    options: &FlowOptions,
) -> Result<Vec<PathBuf>, FlowError> {
    let source = fs::read_to_string(path).map_err(|source| FlowError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = crate::parse_source(&source).map_err(|source| FlowError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    write_file_outputs(path, &file, outdir, options)
}
