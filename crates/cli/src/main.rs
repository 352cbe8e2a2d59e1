//! jscrunch - JavaScript cruncher and formatter
//!
//! Command line front end over the scripting crate.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use jscrunch_config::CrunchConfig;
use jscrunch_core::{CrunchError, Locale, ScriptVersion, Warning};
use jscrunch_scripting::{Cruncher, CruncherOptions, FunctionTree};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jscrunch", version, about = "Crunch, format and check JavaScript")]
struct Cli {
    /// JavaScript version, e.g. 1.3 (0 selects the newest)
    #[arg(long = "js-version", global = true)]
    js_version: Option<f64>,

    /// Options file (defaults to ./jscrunch.cfg when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report warnings on stderr
    #[arg(long, global = true)]
    warnings: bool,

    /// Diagnostic language: en or fr
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the compact form of a script
    Crunch(IoArgs),
    /// Reformat a script, keeping comments
    Format {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Remove comments
    Strip {
        #[command(flatten)]
        io: IoArgs,
        /// Only run the lexer; keeps the original layout
        #[arg(long)]
        no_check: bool,
    },
    /// Check scripts for syntax errors
    Check {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump the parsed tree
    Tree {
        input: PathBuf,
        /// List functions instead of nodes
        #[arg(long)]
        functions: bool,
        /// Print the function list as JSON
        #[arg(long, requires = "functions")]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    input: PathBuf,
    /// Write here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[arg(long)]
    offset: Option<u32>,
    #[arg(long)]
    indent: Option<u32>,
    #[arg(long)]
    label_setback: Option<u32>,
    /// Indent with tabs
    #[arg(long)]
    tabs: bool,
    /// Blank line before case labels and labeled statements
    #[arg(long)]
    blank_line: bool,
}

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    config.display();

    let mut cruncher = Cruncher::new(CruncherOptions {
        version: config.version,
        locale: config.locale,
        warnings: config.warnings,
    });

    match cli.command {
        Command::Crunch(io) => {
            let text = read_input(&io.input)?;
            cruncher.set_source_name(io.input.display().to_string());
            report_warnings(&cruncher);
            let out = cruncher.crunch(&text)?;
            write_output(io.output.as_deref(), &out)?;
        }
        Command::Format { io, layout } => {
            let mut options = config.layout;
            if let Some(offset) = layout.offset {
                options.offset = offset;
            }
            if let Some(indent) = layout.indent {
                options.indent = indent;
            }
            if let Some(setback) = layout.label_setback {
                options.label_setback = setback;
            }
            options.use_tabs |= layout.tabs;
            options.blank_line_before_label |= layout.blank_line;

            let text = read_input(&io.input)?;
            cruncher.set_source_name(io.input.display().to_string());
            report_warnings(&cruncher);
            let out = cruncher.format(&text, options)?;
            write_output(io.output.as_deref(), &out)?;
        }
        Command::Strip { io, no_check } => {
            let text = read_input(&io.input)?;
            cruncher.set_source_name(io.input.display().to_string());
            report_warnings(&cruncher);
            let check_syntax = config.check_syntax && !no_check;
            let out = cruncher.remove_comments_with(&text, check_syntax)?;
            write_output(io.output.as_deref(), &out)?;
        }
        Command::Check { inputs, json } => return check(&mut cruncher, &inputs, json),
        Command::Tree {
            input,
            functions,
            json,
        } => {
            let text = read_input(&input)?;
            cruncher.set_source_name(input.display().to_string());
            report_warnings(&cruncher);
            let tree = cruncher.parse(&text)?;
            if functions {
                let ft = FunctionTree::new(tree);
                if json {
                    println!("{}", serde_json::to_string_pretty(ft.functions())?);
                } else {
                    for (i, f) in ft.functions().iter().enumerate() {
                        println!(
                            "{:indent$}#{i} {}({}) line {}",
                            "",
                            f.name.as_deref().unwrap_or("<anonymous>"),
                            f.params.join(", "),
                            f.line,
                            indent = f.depth * 2
                        );
                    }
                }
            } else {
                print!("{}", tree.to_string_tree());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(cli: &Cli) -> Result<CrunchConfig> {
    let mut config = match &cli.config {
        Some(path) => CrunchConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CrunchConfig::load_default()?,
    };

    if let Some(version) = cli.js_version {
        config.version = ScriptVersion::from_f64(version)?;
    }
    if let Some(tag) = &cli.locale {
        let Some(locale) = Locale::from_tag(tag) else {
            bail!("Unknown locale {tag:?} (expected en or fr)");
        };
        config.locale = locale;
    }
    config.warnings |= cli.warnings;
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading input");
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Print warnings on stderr as they arrive
fn report_warnings(cruncher: &Cruncher) {
    cruncher.clear_listeners();
    if cruncher.warnings() {
        cruncher.on_warning(|w| eprintln!("{w}"));
    }
}

fn check(cruncher: &mut Cruncher, inputs: &[PathBuf], json: bool) -> Result<ExitCode> {
    let mut all_valid = true;
    let mut results = Vec::new();

    for input in inputs {
        let text = read_input(input)?;
        cruncher.set_source_name(input.display().to_string());

        let warnings: Arc<Mutex<Vec<Warning>>> = Arc::default();
        cruncher.clear_listeners();
        if json {
            let sink = Arc::clone(&warnings);
            cruncher.on_warning(move |w| sink.lock().push(w.clone()));
        } else if cruncher.warnings() {
            cruncher.on_warning(|w| eprintln!("{w}"));
        }

        let error = match cruncher.check(&text) {
            Ok(()) => None,
            Err(e @ CrunchError::Syntax { .. }) => Some(e),
            Err(e) => return Err(e).with_context(|| format!("Failed to check {}", input.display())),
        };
        all_valid &= error.is_none();

        if json {
            let (line, message) = match &error {
                Some(CrunchError::Syntax { line, message, .. }) => (Some(*line), Some(message.clone())),
                _ => (None, None),
            };
            results.push(serde_json::json!({
                "file": input.display().to_string(),
                "valid": error.is_none(),
                "line": line,
                "message": message,
                "warnings": &*warnings.lock(),
            }));
        } else {
            match &error {
                None => println!("{}: ok", input.display()),
                Some(e) => println!("{e}"),
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
