//! selbox: per-line CSS selector sandbox on the command line
//!
//! Usage:
//!   selbox map [FILE]       Show the selectors generated for each line
//!   selbox format [FILE]    Print the markup re-indented
//!   selbox lines [FILE]     Print the line count
//!
//! With neither FILE nor `--html`, the built-in sample markup is used.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use selbox_core::common::warning::set_quiet;
use selbox_core::html::{Isolation, print_tree};
use selbox_core::markup::tokenize;
use selbox_core::{DEFAULT_SAMPLE, SandboxConfig, Session, format, line_count};

/// Per-line CSS selector sandbox for raw HTML markup
#[derive(Parser, Debug)]
#[command(name = "selbox")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Selectors for the built-in sample
    selbox map

    # Selectors for a file, as JSON
    selbox map page.html --json

    # Render as a standalone document and show the tree
    selbox map --isolation isolated --tree page.html

    # Re-indent inline markup with four spaces
    selbox format --indent 4 --html '<ul><li>a</li></ul>'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the markup and list each line's selectors with timings
    Map(MapArgs),
    /// Print the markup in canonical indentation
    Format(FormatArgs),
    /// Print the number of lines in the markup
    Lines(InputArgs),
}

/// Where the markup comes from
#[derive(Args, Debug)]
struct InputArgs {
    /// Path to an HTML file
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Use this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,
}

#[derive(Args, Debug)]
struct MapArgs {
    #[command(flatten)]
    input: InputArgs,

    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render into a shared container or as a standalone document
    #[arg(long, value_name = "MODE")]
    isolation: Option<Isolation>,

    /// Count tags written inside comments when mapping lines
    #[arg(long)]
    naive_comments: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print the rendered tree before the mapping
    #[arg(long)]
    tree: bool,

    /// Do not print renderer and generator warnings
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct FormatArgs {
    #[command(flatten)]
    input: InputArgs,

    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Spaces per indent level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Show the formatter's tokens instead of the formatted markup
    #[arg(long)]
    tokens: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Map(args) => run_map(&args),
        Command::Format(args) => run_format(&args),
        Command::Lines(input) => {
            println!("{}", line_count(&read_input(&input)?));
            Ok(())
        }
    }
}

/// Read markup from `--html`, a file, or fall back to the sample
fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(ref html) = input.html {
        Ok(html.clone())
    } else if let Some(ref path) = input.path {
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    } else {
        Ok(DEFAULT_SAMPLE.to_string())
    }
}

/// Load the configuration file if one was given
fn load_config(path: Option<&Path>) -> Result<SandboxConfig> {
    match path {
        Some(path) => Ok(SandboxConfig::from_json_file(path)?),
        None => Ok(SandboxConfig::default()),
    }
}

fn run_map(args: &MapArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let mut config = load_config(args.config.as_deref())?;
    if let Some(isolation) = args.isolation {
        config.isolation = isolation;
    }
    if args.naive_comments {
        config.skip_comments = false;
    }
    // Warnings go to stderr, so they never mix with --json output
    set_quiet(args.quiet);

    let mut session = Session::new(config);
    let _ = session.set_text(text);

    if args.tree {
        let rendered = session.rendered();
        println!("=== Rendered Tree ===");
        print_tree(&rendered.tree, rendered.root, 0);
        println!();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.result())?);
        return Ok(());
    }

    print_lines(&session);
    Ok(())
}

/// Print each line followed by its selectors
fn print_lines(session: &Session) {
    let width = session.line_count().to_string().len();
    for line in session.lines() {
        println!(
            "{} {}",
            format!("{:>width$} |", line.number + 1).dimmed(),
            line.text
        );
        for timing in line.selectors {
            println!(
                "{:>width$}   {} {}",
                "",
                timing.selector.cyan(),
                format!("({})", call_time(timing.time_ms())).dimmed()
            );
        }
    }

    let result = session.result();
    println!();
    println!(
        "{} {}",
        "Total selector time:".bold(),
        total_time(result.total_time_ms())
    );
    println!(
        "{} mapped, {} unmapped, {} skipped",
        result.stats.mapped.green(),
        result.stats.unmapped.yellow(),
        result.stats.skipped.red()
    );
}

/// A single generation call, in microsecond resolution
fn call_time(ms: f64) -> String {
    format!("{ms:.3} ms")
}

/// A whole pass
fn total_time(ms: f64) -> String {
    format!("{ms:.2} ms")
}

fn run_format(args: &FormatArgs) -> Result<()> {
    let text = read_input(&args.input)?;

    if args.tokens {
        for token in tokenize(&text) {
            println!("{}: {}", token.kind().cyan(), token.content());
        }
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let indent = args.indent.unwrap_or(config.indent_size);
    println!("{}", format(&text, indent));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_times_keep_microseconds() {
        assert_eq!(call_time(0.004_2), "0.004 ms");
        assert_eq!(call_time(1.5), "1.500 ms");
        assert_eq!(total_time(12.345_6), "12.35 ms");
    }
}
