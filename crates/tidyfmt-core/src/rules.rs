//! Whitespace rules and first-match resolution by file extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::encoding::Encoding;

/// Declarative whitespace policy for a class of file extensions.
///
/// Rules are matched in list order; the first rule whose extension set
/// contains the file's extension wins. Extensions are case-sensitive literal
/// suffixes including the leading dot; no case folding is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhitespaceRule {
    pub extensions: Vec<String>,
    /// Use CRLF line endings instead of LF.
    #[serde(default)]
    pub crlf: bool,
    /// Require exactly one newline at end of file.
    #[serde(default = "default_true")]
    pub trailing_newline: bool,
    #[serde(default)]
    pub encoding: Encoding,
    /// Matched files are skipped entirely. Distinguishable from "no rule"
    /// for the unruled-files listing.
    #[serde(default)]
    pub ignore: bool,
}

fn default_true() -> bool {
    true
}

impl WhitespaceRule {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            crlf: false,
            trailing_newline: true,
            encoding: Encoding::Ascii,
            ignore: false,
        }
    }

    pub fn crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    pub fn trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

/// Extract the extension of `path` including the leading dot.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
}

/// Return the first rule in list order whose extension set contains the
/// file's extension, or `None` when no rule matches.
///
/// Comparison is exact string equality including the dot. A `None` result
/// and a matched rule with `ignore = true` are both "skip" outcomes but are
/// distinguishable by the caller.
pub fn resolve_rule<'a>(path: &Path, rules: &'a [WhitespaceRule]) -> Option<&'a WhitespaceRule> {
    let ext = file_extension(path)?;
    rules
        .iter()
        .find(|rule| rule.extensions.iter().any(|e| *e == ext))
}

/// Built-in rule set used when no config overrides it.
pub fn builtin_rules() -> Vec<WhitespaceRule> {
    vec![
        WhitespaceRule::new(&[".rs", ".toml", ".py", ".sh", ".c", ".cc", ".cpp", ".h", ".hpp"])
            .encoding(Encoding::Utf8),
        WhitespaceRule::new(&[".md", ".txt", ".json", ".yml", ".yaml"]).encoding(Encoding::Utf8),
        WhitespaceRule::new(&[".bat", ".cmd", ".ps1", ".psm1", ".psd1"])
            .crlf(true)
            .encoding(Encoding::Utf8Bom),
        WhitespaceRule::new(&[".sln", ".csproj", ".vcxproj"])
            .crlf(true)
            .encoding(Encoding::Utf8Bom)
            .ignored(),
        WhitespaceRule::new(&[".png", ".jpg", ".gif", ".ico", ".zip", ".exe", ".dll"]).ignored(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_first_matching_rule() {
        let rules = vec![
            WhitespaceRule::new(&[".a", ".b"]),
            WhitespaceRule::new(&[".b"]).crlf(true),
        ];
        let rule = resolve_rule(Path::new("dir/file.b"), &rules).expect("rule should match");
        assert!(!rule.crlf, "first rule in list order should win");
    }

    #[test]
    fn resolve_returns_none_without_match() {
        let rules = vec![WhitespaceRule::new(&[".a"])];
        assert!(resolve_rule(Path::new("file.z"), &rules).is_none());
        assert!(resolve_rule(Path::new("no_extension"), &rules).is_none());
    }

    #[test]
    fn extension_comparison_is_case_sensitive() {
        let rules = vec![WhitespaceRule::new(&[".rs"])];
        assert!(resolve_rule(Path::new("lib.rs"), &rules).is_some());
        assert!(resolve_rule(Path::new("lib.RS"), &rules).is_none());
    }

    #[test]
    fn extension_includes_leading_dot() {
        assert_eq!(
            file_extension(Path::new("a/b/c.txt")),
            Some(".txt".to_string())
        );
        assert_eq!(file_extension(Path::new("noext")), None);
    }

    #[test]
    fn ignored_rule_still_resolves() {
        let rules = vec![WhitespaceRule::new(&[".png"]).ignored()];
        let rule = resolve_rule(Path::new("logo.png"), &rules).expect("rule should match");
        assert!(rule.ignore);
    }

    #[test]
    fn builtin_rules_have_no_duplicate_extensions() {
        let mut all: Vec<String> = builtin_rules()
            .iter()
            .flat_map(|r| r.extensions.clone())
            .collect();
        let original_len = all.len();
        all.sort();
        all.dedup();
        assert_eq!(
            all.len(),
            original_len,
            "an extension appears in more than one builtin rule"
        );
    }

    #[test]
    fn rule_deserializes_from_toml_with_defaults() {
        let rule: WhitespaceRule = toml::from_str(
            r#"
            extensions = [".rs"]
            encoding = "utf8"
            "#,
        )
        .expect("rule should parse");
        assert!(!rule.crlf);
        assert!(rule.trailing_newline);
        assert_eq!(rule.encoding, Encoding::Utf8);
        assert!(!rule.ignore);
    }
}
