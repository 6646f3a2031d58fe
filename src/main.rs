// v2lang: parser, pretty-printer, graph dumps and AST viewer for v2 sources

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser as CliParser, Subcommand, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Level;

use v2lang::diagnostic::Diagnostic;
use v2lang::flow::{self, FlowOptions};
use v2lang::parser::Parser;
use v2lang::ui::App;
use v2lang::{dot, outline, parse_source, printer};

#[derive(CliParser)]
#[command(name = "v2lang", version)]
#[command(about = "Parse v2 sources and inspect their syntax trees and control flow")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every syntax error in the given files
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Dump the AST outline of a file
    Ast {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = AstFormat::Text)]
        format: AstFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a file in canonical layout
    Fmt { file: PathBuf },
    /// Write control-flow and call graphs for each file
    Flow {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value = ".")]
        outdir: PathBuf,
    },
    /// Browse a file's AST in the terminal
    View { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum AstFormat {
    Text,
    Dot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Check { files } => check(&files),
        Command::Ast {
            file,
            format,
            output,
        } => {
            let tree = outline::build(&parse_file(&file)?);
            let text = match format {
                AstFormat::Text => outline::render_text(&tree),
                AstFormat::Dot => dot::ast_to_dot(&tree),
            };
            match output {
                Some(path) => fs::write(&path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", text),
            }
            Ok(())
        }
        Command::Fmt { file } => {
            print!("{}", printer::print_source_file(&parse_file(&file)?));
            Ok(())
        }
        Command::Flow { files, outdir } => {
            let options = FlowOptions::default();
            let mut failed = 0;
            for file in &files {
                match flow::process_file(file, &outdir, &options) {
                    Ok(written) => {
                        for path in written {
                            println!("Wrote {}", path.display());
                        }
                    }
                    Err(err) => {
                        eprintln!("{}", err);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} file(s) failed", failed, files.len());
            }
            Ok(())
        }
        Command::View { file } => view(&file),
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_file(path: &Path) -> Result<v2lang::SourceFile> {
    let source = read_source(path)?;
    parse_source(&source).with_context(|| format!("failed to parse {}", path.display()))
}

fn check(files: &[PathBuf]) -> Result<()> {
    let mut total = 0;
    for path in files {
        let source = read_source(path)?;
        let diagnostics: Vec<Diagnostic> = match Parser::new(&source) {
            Ok(mut parser) => {
                let (_, errors) = parser.parse_source_file_recovering();
                errors.into_iter().map(Diagnostic::from).collect()
            }
            Err(err) => vec![Diagnostic::from(err)],
        };

        for diagnostic in &diagnostics {
            println!("{}: {}", path.display(), diagnostic);
        }
        tracing::info!(file = %path.display(), errors = diagnostics.len(), "checked");
        total += diagnostics.len();
    }

    if total > 0 {
        bail!("{} error(s) found", total);
    }
    Ok(())
}

fn view(path: &Path) -> Result<()> {
    let source = read_source(path)?;
    let mut app = App::new(&source);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("viewer failed")
}
