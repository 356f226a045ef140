//! TOML configuration for the formatting engine.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::encoding::EncodingDetector;
use crate::error::ConfigError;
use crate::rules::{WhitespaceRule, builtin_rules};

/// Engine configuration, loaded from `tidyfmt.toml`.
///
/// Everything is optional; an absent or empty config yields the built-in
/// rule set and formatter defaults. Unknown keys are rejected so typos fail
/// loudly instead of silently configuring nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// External encoding classifier command (default: `file`).
    pub classifier_tool: Option<String>,
    /// Whitespace rule list replacing the built-in set when non-empty.
    /// Order matters: first match by extension wins.
    pub rules: Vec<WhitespaceRule>,
    /// Per-formatter overrides, applied to the built-in descriptors.
    pub formatters: Vec<FormatterOverride>,
}

/// Overrides for one built-in formatter, keyed by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterOverride {
    pub name: String,
    pub enabled: Option<bool>,
    pub paths: Option<Vec<PathBuf>>,
    pub extensions: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation beyond what serde enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.extensions.is_empty() {
                return Err(ConfigError::EmptyRuleExtensions { index });
            }
            for extension in &rule.extensions {
                if !extension.starts_with('.') {
                    return Err(ConfigError::ExtensionMissingDot {
                        index,
                        extension: extension.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The whitespace rule set in effect: configured rules, else built-ins.
    pub fn effective_rules(&self) -> Vec<WhitespaceRule> {
        if self.rules.is_empty() {
            builtin_rules()
        } else {
            self.rules.clone()
        }
    }

    /// The encoding classifier in effect.
    pub fn detector(&self) -> EncodingDetector {
        match &self.classifier_tool {
            Some(tool) => EncodingDetector::new(tool.clone()),
            None => EncodingDetector::default(),
        }
    }

    /// Overrides for one formatter, if configured.
    pub fn override_for(&self, name: &str) -> Option<&FormatterOverride> {
        self.formatters.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use std::io::Write;

    #[test]
    fn default_config_uses_builtin_rules() {
        let config = Config::default();
        assert!(!config.effective_rules().is_empty());
        assert!(config.override_for("whitespace").is_none());
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            classifier_tool = "gfile"

            [[rules]]
            extensions = [".rs"]
            encoding = "utf8"

            [[rules]]
            extensions = [".bat"]
            crlf = true
            encoding = "utf8-bom"

            [[formatters]]
            name = "cpp"
            enabled = true
            paths = ["src", "include"]
            "#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.classifier_tool.as_deref(), Some("gfile"));
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].encoding, Encoding::Utf8Bom);
        assert!(config.rules[1].crlf);

        let cpp = config.override_for("cpp").unwrap();
        assert_eq!(cpp.enabled, Some(true));
        assert_eq!(cpp.paths.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn configured_rules_replace_builtins() {
        let config: Config = toml::from_str(
            r#"
            [[rules]]
            extensions = [".only"]
            "#,
        )
        .unwrap();
        let rules = config.effective_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].extensions, vec![".only"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Config, _> = toml::from_str("not_a_key = true");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_extension_list() {
        let config: Config = toml::from_str(
            r#"
            [[rules]]
            extensions = []
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRuleExtensions { index: 0 })
        ));
    }

    #[test]
    fn validate_rejects_extension_without_dot() {
        let config: Config = toml::from_str(
            r#"
            [[rules]]
            extensions = ["rs"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ExtensionMissingDot { .. })
        ));
    }

    #[test]
    fn load_reads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
            [[rules]]
            extensions = [".rs"]
            encoding = "utf8"
            "#,
        )
        .unwrap();
        file.flush().unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.rules.len(), 1);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = Config::load(Path::new("/nonexistent/tidyfmt.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
