//! The whitespace/encoding normalization formatter.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::Config;
use crate::encoding::{EncodingDetector, read_text, write_text};
use crate::error::{FormatError, FormatResult, Violation};
use crate::formatter::{FormatAction, Formatter, RunContext};
use crate::rules::{WhitespaceRule, resolve_rule};
use crate::whitespace::{check, rewrite};

/// Build the whitespace formatter descriptor from config.
pub fn formatter(config: &Config) -> Formatter {
    Formatter::builder("whitespace")
        .default_enabled(true)
        .paths(&["."])
        .excludes(&[
            ".git/*",
            "*/.git/*",
            "target/*",
            "*/target/*",
            "*.bak",
        ])
        .action(WhitespaceFormat::new(
            config.effective_rules(),
            config.detector(),
        ))
}

/// Action applying the resolved whitespace rule to each file in a group.
///
/// Files with no matching rule are skipped (reported under `WS-000` when the
/// unruled listing is requested), as are files matching a rule with
/// `ignore = true`; the two outcomes stay distinguishable. Check mode
/// collects violations and signals them in aggregate via
/// [`FormatError::CheckFailed`]; write mode rewrites and re-encodes any file
/// whose text or detected encoding deviates from its rule.
pub struct WhitespaceFormat {
    rules: Vec<WhitespaceRule>,
    detector: EncodingDetector,
}

impl WhitespaceFormat {
    pub fn new(rules: Vec<WhitespaceRule>, detector: EncodingDetector) -> Self {
        Self { rules, detector }
    }
}

impl FormatAction for WhitespaceFormat {
    fn run(
        &self,
        ctx: &RunContext,
        files: &[PathBuf],
        check_mode: bool,
        _args: &str,
    ) -> FormatResult<()> {
        let mut violations: Vec<Violation> = Vec::new();
        let mut errors: Vec<FormatError> = Vec::new();

        for file in files {
            let rule = match resolve_rule(file, &self.rules) {
                None => {
                    if check_mode && ctx.list_unruled {
                        violations.push(Violation::new(
                            file.clone(),
                            "WS-000",
                            "no whitespace rule covers this extension",
                        ));
                    }
                    continue;
                }
                Some(rule) if rule.ignore => continue,
                Some(rule) => rule,
            };

            // A per-file failure must not discard findings already collected
            // for the rest of the group.
            let text = match read_text(file) {
                Ok(text) => text,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            let detected = match self.detector.detect(file) {
                Ok(detected) => detected,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };

            if check_mode {
                violations.extend(check(file, &text, rule, Some(&detected)));
            } else {
                let fixed = rewrite(&text, rule);
                let needs_reencode = !detected.matches(rule.encoding);
                if fixed != text || needs_reencode {
                    if let Err(err) = write_text(file, &fixed, rule.encoding) {
                        errors.push(err);
                    }
                }
            }
        }

        if !violations.is_empty() {
            let files_affected: HashSet<&PathBuf> = violations.iter().map(|v| &v.file).collect();
            errors.push(FormatError::CheckFailed {
                formatter: "whitespace".to_string(),
                count: files_affected.len(),
                violations,
            });
        }

        match errors.pop() {
            None => Ok(()),
            Some(err) if errors.is_empty() => Err(err),
            Some(err) => {
                errors.push(err);
                Err(FormatError::Multiple(errors))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::rules::WhitespaceRule;
    use std::fs;
    use tempfile::TempDir;

    fn action_with(rules: Vec<WhitespaceRule>) -> WhitespaceFormat {
        WhitespaceFormat::new(rules, EncodingDetector::default())
    }

    fn utf8_rule(extensions: &[&str]) -> WhitespaceRule {
        WhitespaceRule::new(extensions).encoding(Encoding::Utf8)
    }

    // The write-mode tests use the real `file` tool via the default
    // detector, matching production wiring.

    #[cfg(unix)]
    #[test]
    fn write_mode_normalizes_file_in_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("messy.a");
        fs::write(&path, "a\t \r\nb  \n").unwrap();

        let action = action_with(vec![utf8_rule(&[".a"])]);
        action
            .run(&RunContext::default(), &[path.clone()], false, "")
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_mode_leaves_clean_file_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clean.a");
        fs::write(&path, "a\nb\n").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        let action = action_with(vec![utf8_rule(&[".a"])]);
        action
            .run(&RunContext::default(), &[path.clone()], false, "")
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[cfg(unix)]
    #[test]
    fn write_mode_adds_bom_when_rule_requires_it() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("script.bat");
        fs::write(&path, "echo hi\r\n").unwrap();

        let rule = WhitespaceRule::new(&[".bat"])
            .crlf(true)
            .encoding(Encoding::Utf8Bom);
        let action = action_with(vec![rule]);
        action
            .run(&RunContext::default(), &[path.clone()], false, "")
            .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"echo hi\r\n");
    }

    #[cfg(unix)]
    #[test]
    fn check_mode_reports_without_modifying() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("messy.a");
        fs::write(&path, "a\t\n").unwrap();

        let action = action_with(vec![utf8_rule(&[".a"])]);
        let err = action
            .run(&RunContext::default(), &[path.clone()], true, "")
            .unwrap_err();

        match err {
            FormatError::CheckFailed {
                count, violations, ..
            } => {
                assert_eq!(count, 1);
                assert!(violations.iter().any(|v| v.rule == "WS-003"));
            }
            other => panic!("expected CheckFailed, got {other}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\t\n");
    }

    #[cfg(unix)]
    #[test]
    fn check_mode_passes_clean_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clean.a");
        fs::write(&path, "a\nb\n").unwrap();

        let action = action_with(vec![utf8_rule(&[".a"])]);
        action
            .run(&RunContext::default(), &[path.clone()], true, "")
            .unwrap();
    }

    #[test]
    fn unruled_file_is_skipped_silently_by_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mystery.zzz");
        fs::write(&path, "whatever\t").unwrap();

        let action = action_with(vec![utf8_rule(&[".a"])]);
        action
            .run(&RunContext::default(), &[path.clone()], true, "")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "whatever\t");
    }

    #[test]
    fn unruled_file_is_listed_when_requested() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mystery.zzz");
        fs::write(&path, "whatever\n").unwrap();

        let ctx = RunContext {
            list_unruled: true,
            ..RunContext::default()
        };
        let action = action_with(vec![utf8_rule(&[".a"])]);
        let err = action.run(&ctx, &[path], true, "").unwrap_err();

        match err {
            FormatError::CheckFailed { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].rule, "WS-000");
            }
            other => panic!("expected CheckFailed, got {other}"),
        }
    }

    #[test]
    fn ignored_rule_skips_file_without_listing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logo.png");
        fs::write(&path, "binary-ish\t").unwrap();

        let ctx = RunContext {
            list_unruled: true,
            ..RunContext::default()
        };
        let rules = vec![WhitespaceRule::new(&[".png"]).ignored()];
        let action = action_with(rules);
        action.run(&ctx, &[path.clone()], true, "").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "binary-ish\t");
    }

    #[test]
    fn write_mode_leaves_invalid_utf8_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.a");
        // "café" in Latin-1: 0xE9 is not valid UTF-8.
        let bytes = [0x63, 0x61, 0x66, 0xE9, 0x0A];
        fs::write(&path, bytes).unwrap();

        let action = action_with(vec![utf8_rule(&[".a"])]);
        let err = action
            .run(&RunContext::default(), &[path.clone()], false, "")
            .unwrap_err();

        assert!(matches!(err, FormatError::FileRead { .. }));
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[cfg(unix)]
    #[test]
    fn per_file_failure_keeps_findings_from_rest_of_group() {
        let temp = TempDir::new().unwrap();
        let messy = temp.path().join("messy.a");
        fs::write(&messy, "a\t\n").unwrap();
        let missing = temp.path().join("gone.a");

        let action = action_with(vec![utf8_rule(&[".a"])]);
        let err = action
            .run(&RunContext::default(), &[messy, missing], true, "")
            .unwrap_err();

        match err {
            FormatError::Multiple(errors) => {
                assert!(
                    errors
                        .iter()
                        .any(|e| matches!(e, FormatError::FileRead { .. }))
                );
                assert!(errors.iter().any(|e| matches!(
                    e,
                    FormatError::CheckFailed { violations, .. }
                        if violations.iter().any(|v| v.rule == "WS-003")
                )));
            }
            other => panic!("expected Multiple, got {other}"),
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let action = action_with(vec![utf8_rule(&[".a"])]);
        let err = action
            .run(
                &RunContext::default(),
                &[PathBuf::from("/nonexistent/f.a")],
                true,
                "",
            )
            .unwrap_err();
        assert!(matches!(err, FormatError::FileRead { .. }));
    }
}
