//! Whitespace measurement, checking, and rewriting.
//!
//! All operations are line-oriented text rewrites; encoding of the output is
//! decided separately at write time (see [`crate::encoding`]).

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::encoding::{Encoding, EncodingResult};
use crate::error::Violation;
use crate::rules::WhitespaceRule;

static TRAILING_RUN: OnceLock<Regex> = OnceLock::new();
static TRAILING_BEFORE_LF: OnceLock<Regex> = OnceLock::new();

/// Matches a trailing whitespace/tab run before a newline or at end of text.
fn trailing_run() -> &'static Regex {
    TRAILING_RUN.get_or_init(|| Regex::new(r"[ \t]+(?:\r?\n|$)").unwrap())
}

/// Matches a trailing run before an LF in already-normalized text.
fn trailing_before_lf() -> &'static Regex {
    TRAILING_BEFORE_LF.get_or_init(|| Regex::new(r"[ \t]+\n").unwrap())
}

/// Occurrence counts from a single pattern scan over a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    /// Bare LF line endings, excluding the LF inside CRLF.
    pub lf: usize,
    pub crlf: usize,
    /// Lone CR line endings, excluding the CR inside CRLF.
    pub cr: usize,
    pub tabs: usize,
    /// Trailing whitespace/tab runs before a newline or at end of text.
    pub trailing_whitespace: usize,
}

/// Count line endings, tabs, and trailing whitespace runs in `text`.
pub fn measure(text: &str) -> Counts {
    let crlf = text.matches("\r\n").count();
    let lf = text.matches('\n').count() - crlf;
    let cr = text.matches('\r').count() - crlf;
    Counts {
        lf,
        crlf,
        cr,
        tabs: text.matches('\t').count(),
        trailing_whitespace: trailing_run().find_iter(text).count(),
    }
}

/// Report every way `text` deviates from `rule`, one violation per finding.
///
/// Checks are independent: wrong line-ending style, trailing whitespace, tab
/// characters, end-of-file newline policy (only for non-empty text), and
/// encoding mismatch when a detection result is supplied. A file detected as
/// ASCII is accepted where the rule requires UTF-8.
pub fn check(
    path: &Path,
    text: &str,
    rule: &WhitespaceRule,
    detected: Option<&EncodingResult>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let counts = measure(text);

    if rule.crlf && counts.lf > 0 {
        violations.push(Violation::new(
            path.to_path_buf(),
            "WS-001",
            format!("{} LF line ending(s) found, CRLF expected", counts.lf),
        ));
    }
    if !rule.crlf && counts.crlf > 0 {
        violations.push(Violation::new(
            path.to_path_buf(),
            "WS-001",
            format!("{} CRLF line ending(s) found, LF expected", counts.crlf),
        ));
    }
    // A lone CR is treated as a line ending by `rewrite`, so it is wrong
    // under either style.
    if counts.cr > 0 {
        violations.push(Violation::new(
            path.to_path_buf(),
            "WS-001",
            format!("{} lone CR line ending(s) found", counts.cr),
        ));
    }

    if counts.trailing_whitespace > 0 {
        violations.push(Violation::new(
            path.to_path_buf(),
            "WS-002",
            format!(
                "{} line(s) with trailing whitespace",
                counts.trailing_whitespace
            ),
        ));
    }

    if counts.tabs > 0 {
        violations.push(Violation::new(
            path.to_path_buf(),
            "WS-003",
            format!("{} tab character(s) found", counts.tabs),
        ));
    }

    if !text.is_empty() {
        let has_final_newline = text.ends_with('\n');
        if rule.trailing_newline && !has_final_newline {
            violations.push(Violation::new(
                path.to_path_buf(),
                "WS-004",
                "missing newline at end of file",
            ));
        }
        if !rule.trailing_newline && has_final_newline {
            violations.push(Violation::new(
                path.to_path_buf(),
                "WS-004",
                "unexpected newline at end of file",
            ));
        }
    }

    if let Some(result) = detected {
        if !result.matches(rule.encoding) {
            violations.push(Violation::new(
                path.to_path_buf(),
                "WS-005",
                format!(
                    "detected encoding {:?}, rule requires {}",
                    result.raw_label,
                    encoding_name(rule.encoding)
                ),
            ));
        }
    }

    violations
}

/// Rewrite `text` to satisfy `rule`.
///
/// Line endings are normalized to LF (lone CR counts as a line ending),
/// trailing whitespace/tab runs before each newline are stripped, remaining
/// tabs become two spaces, the end of the buffer is trimmed of all trailing
/// whitespace, and exactly one newline is appended when the rule asks for
/// one. CRLF conversion happens last. Empty input stays empty. Idempotent.
pub fn rewrite(text: &str, rule: &WhitespaceRule) -> String {
    if text.is_empty() {
        return String::new();
    }

    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let stripped = trailing_before_lf().replace_all(&unified, "\n");
    let expanded = stripped.replace('\t', "  ");

    let mut out = expanded.trim_end().to_string();
    if rule.trailing_newline {
        out.push('\n');
    }
    if rule.crlf {
        out = out.replace('\n', "\r\n");
    }
    out
}

fn encoding_name(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::Ascii => "ascii",
        Encoding::Utf8 => "utf8",
        Encoding::Utf8Bom => "utf8-bom",
    }
}
