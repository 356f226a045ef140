//! Report rendering: colored text, unified diffs, and JSON.

use std::collections::BTreeSet;
use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use similar::TextDiff;

use tidyfmt_core::encoding::read_text;
use tidyfmt_core::rules::resolve_rule;
use tidyfmt_core::whitespace::rewrite;
use tidyfmt_core::{Config, DispatchReport, FormatError, Violation};

pub fn render_text(report: &DispatchReport, config: &Config, show_diff: bool, check: bool) {
    for error in flatten(&report.errors) {
        match error {
            FormatError::CheckFailed {
                formatter,
                count,
                violations,
            } => {
                println!(
                    "{}: {} file(s) need formatting",
                    formatter.bold(),
                    count.to_string().yellow()
                );
                for violation in violations {
                    println!(
                        "  {}: {} {}",
                        violation.file.display(),
                        violation.rule.yellow(),
                        violation.message
                    );
                }
                if show_diff {
                    for file in diffable_files(violations) {
                        print_whitespace_diff(file, config);
                    }
                }
            }
            other => eprintln!("{} {}", "error:".red().bold(), error_chain(other)),
        }
    }

    let summary = report.summary(check);
    if report.failed() {
        println!("{}", summary.red().bold());
    } else {
        println!("{}", summary.green());
    }
}

pub fn render_json(report: &DispatchReport) -> anyhow::Result<()> {
    let mut violations: Vec<&Violation> = Vec::new();
    let mut errors = Vec::new();
    for error in flatten(&report.errors) {
        errors.push(error_chain(error));
        if let FormatError::CheckFailed {
            violations: found, ..
        } = error
        {
            violations.extend(found);
        }
    }

    let json = JsonReport {
        failed: report.failed(),
        files_processed: report.files_processed,
        formatters_run: report.formatters_run,
        elapsed_ms: report.elapsed_ms,
        violations,
        errors,
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    failed: bool,
    files_processed: usize,
    formatters_run: usize,
    elapsed_ms: u64,
    violations: Vec<&'a Violation>,
    errors: Vec<String>,
}

/// Expand aggregated group errors so each inner failure renders on its own.
fn flatten(errors: &[FormatError]) -> Vec<&FormatError> {
    let mut out = Vec::new();
    for error in errors {
        match error {
            FormatError::Multiple(inner) => out.extend(flatten(inner)),
            other => out.push(other),
        }
    }
    out
}

/// Distinct files with concrete whitespace findings, in path order. The
/// unruled-files listing carries no pending rewrite, so it is excluded.
fn diffable_files(violations: &[Violation]) -> BTreeSet<&PathBuf> {
    violations
        .iter()
        .filter(|v| v.rule != "WS-000")
        .map(|v| &v.file)
        .collect()
}

/// Recompute the whitespace rewrite for one file and print it as a unified
/// diff. Unreadable or unruled files are silently skipped; the violation
/// listing above already named them.
fn print_whitespace_diff(file: &PathBuf, config: &Config) {
    let Ok(original) = read_text(file) else {
        return;
    };
    let rules = config.effective_rules();
    let Some(rule) = resolve_rule(file, &rules) else {
        return;
    };
    let fixed = rewrite(&original, rule);
    if fixed == original {
        return;
    }

    let name = file.display().to_string();
    let diff = TextDiff::from_lines(&original, &fixed);
    print!(
        "{}",
        diff.unified_diff()
            .context_radius(3)
            .header(&format!("a/{name}"), &format!("b/{name}"))
    );
}

fn error_chain(error: &FormatError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}
