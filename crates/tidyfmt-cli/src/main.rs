//! tidyfmt: run the configured formatters over a tree, in place or as a
//! check.

mod output;

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tidyfmt_core::{Config, DispatchOptions, FormatterRegistry, dispatch};

#[derive(Parser, Debug)]
#[command(name = "tidyfmt", version, about = "Format source trees: whitespace normalization plus external formatter wrappers")]
struct Cli {
    /// Paths to process instead of each formatter's configured paths.
    /// `-` reads newline-separated paths from stdin.
    paths: Vec<String>,

    /// Report files that need formatting without modifying anything
    #[arg(long)]
    check: bool,

    /// Copy each file to `<file>.bak` before rewriting it
    #[arg(long)]
    backup: bool,

    /// Overwrite existing `.bak` files
    #[arg(long)]
    force: bool,

    /// Root that formatter-configured relative paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    file_root: PathBuf,

    /// Run only the named formatter (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// Skip the named formatter (repeatable)
    #[arg(long = "skip", value_name = "NAME")]
    skip: Vec<String>,

    /// Extra arguments for one formatter, e.g. `cpp=-style=llvm` (repeatable)
    #[arg(long = "formatter-args", value_name = "NAME=VALUE", value_parser = parse_formatter_arg)]
    formatter_args: Vec<(String, String)>,

    /// In check mode, also list files no whitespace rule covers
    #[arg(long)]
    list_unruled: bool,

    /// In check mode, show a unified diff of the pending whitespace rewrite
    #[arg(long)]
    diff: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Config file (default: <file-root>/tidyfmt.toml, then the user config
    /// directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_formatter_arg(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {s:?}")),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tidyfmt={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns `Ok(true)` on a clean run, `Ok(false)` when formatting errors or
/// check findings occurred, `Err` only for setup failures (bad config,
/// unknown formatter names).
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = load_config(cli.config.as_deref(), &cli.file_root)?;
    let registry = FormatterRegistry::from_config(&config);
    let override_paths = expand_paths(&cli.paths)?;

    let args: HashMap<String, String> = cli.formatter_args.iter().cloned().collect();
    let options = DispatchOptions {
        check: cli.check,
        backup: cli.backup,
        force: cli.force,
        file_root: cli.file_root.clone(),
        verbose: cli.verbose,
        list_unruled: cli.list_unruled,
    };

    tracing::debug!(?options, only = ?cli.only, skip = ?cli.skip, "dispatching");
    let report = dispatch(
        &registry,
        &cli.only,
        &cli.skip,
        &args,
        &override_paths,
        &options,
    )
    .context("formatter dispatch failed")?;

    match cli.format {
        OutputFormat::Text => output::render_text(&report, &config, cli.diff, cli.check),
        OutputFormat::Json => output::render_json(&report)?,
    }
    Ok(!report.failed())
}

/// Config discovery order: explicit flag, file root, user config directory,
/// built-in defaults.
fn load_config(explicit: Option<&Path>, file_root: &Path) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path).with_context(|| format!("loading {}", path.display()));
    }
    let local = file_root.join("tidyfmt.toml");
    if local.is_file() {
        return Config::load(&local).with_context(|| format!("loading {}", local.display()));
    }
    if let Some(dir) = dirs::config_dir() {
        let global = dir.join("tidyfmt").join("tidyfmt.toml");
        if global.is_file() {
            return Config::load(&global)
                .with_context(|| format!("loading {}", global.display()));
        }
    }
    Ok(Config::default())
}

/// Expand positional paths, replacing a lone `-` with newline-separated
/// paths read from stdin.
fn expand_paths(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut expanded = Vec::with_capacity(paths.len());
    for path in paths {
        if path == "-" {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line.context("reading paths from stdin")?;
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    expanded.push(PathBuf::from(trimmed));
                }
            }
        } else {
            expanded.push(PathBuf::from(path));
        }
    }
    Ok(expanded)
}
