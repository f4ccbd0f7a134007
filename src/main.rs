//! Block Layout CLI
//!
//! Usage:
//!   block-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>    Layout configuration (TOML format)
//!   -f, --format <FORMAT>  Output format: text, json or toml
//!   -l, --lint             Check the final layout for defects
//!   -v, --verbose          Raise log level (repeatable)
//!   -g, --grammar          Show script grammar reference
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use block_layout::{parse, run_on, LayoutConfig, LayoutSnapshot, LayoutStore, RunConfig, RunError};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Toml,
}

#[derive(Parser)]
#[command(name = "block-layout")]
#[command(about = "Grid-based block layout with overlap resolution")]
struct Cli {
    /// Input script (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for the final layout
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Check the final layout for overlaps and unsupported blocks
    #[arg(short, long)]
    lint: bool,

    /// Raise log level: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show script grammar reference
    #[arg(short, long)]
    grammar: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    if cli.grammar {
        print_grammar();
        return;
    }

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let layout = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                process::exit(1);
            }
            (buffer, "<stdin>".to_string())
        }
    };

    let script = match parse(&source) {
        Ok(script) => script,
        Err(errors) => {
            for e in &errors {
                eprint!("{}", e.format(&source, &filename));
            }
            process::exit(1);
        }
    };

    let config = RunConfig::new().with_layout(layout).with_lint(cli.lint);
    let mut store = LayoutStore::new();
    let warnings = match run_on(&mut store, &script, &config) {
        Ok((reports, warnings)) => {
            for report in &reports {
                log::info!("{}", report);
            }
            warnings
        }
        Err(RunError::Command(e)) => {
            let line = source[..e.span.start.min(source.len())].lines().count().max(1);
            eprintln!("Error at {}:{}: {}", filename, line, e);
            if let Some(suggestions) = e.error.suggestions().filter(|s| !s.is_empty()) {
                eprintln!("  did you mean: {}?", suggestions.join(", "));
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let snapshot = LayoutSnapshot::from_store(&store);
    let output = match cli.format {
        Format::Text => Ok(snapshot.to_text()),
        Format::Json => snapshot.to_json(),
        Format::Toml => snapshot.to_toml(),
    };
    match output {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }
    if !warnings.is_empty() {
        process::exit(2);
    }
}

fn print_intro() {
    println!(
        r#"Block Layout - grid-based block layout with overlap resolution

USAGE:
    block-layout [OPTIONS] [FILE]
    echo '<script>' | block-layout

OPTIONS:
    -c, --config     Layout configuration (TOML file)
    -f, --format     Output format: text, json, toml
    -l, --lint       Check the final layout for defects
    -v, --verbose    Raise log level (repeatable)
    -g, --grammar    Show script grammar reference
    -h, --help       Print help

QUICK START:
    echo 'block a at (0, 0, 0)  add next_to a face +y  resize a height 2' | block-layout

This stacks a block on top of another, then grows the bottom one; the
stacked block is pushed up to stay on top.
Run --grammar for the full syntax reference."#
    );
}

fn print_grammar() {
    println!(
        r#"BLOCK LAYOUT GRAMMAR
====================

COMMANDS
--------
block NAME at (x, y, z) [size (w, h, d)] [MODIFIERS]
    Declare a named block. Size defaults to (1, 1, 1).

add at (x, y, z)
    Add a unit block. Skipped if a block already sits there.

add next_to NAME face +x|-x|+y|-y|+z|-z
add next_to NAME face (nx, ny, nz)
    Add a unit block against a face of NAME. The largest normal
    component picks the face.

resize NAME to (w, h, d)
resize NAME width|height|depth VALUE
    Change dimensions. Blocks resting against grown faces are pushed
    along, and so are the blocks resting against them.

move NAME to (x, y, z)
remove NAME
text NAME "content" at (x, y, z) [color: #333, size: 0.5]

MODIFIERS
---------
kind: apartment | store | office | parking
status: available | reserved | sold
name: "Display name"

Comments start with // and run to the end of the line."#
    );
}
