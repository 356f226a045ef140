//! Formatter registry and run selection.

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::error::{FormatError, FormatResult};
use crate::formatter::{FormatSelection, Formatter};
use crate::formatters;

/// Ordered set of named formatters.
///
/// Order is significant: the dispatcher processes active formatters in
/// registration order, and selection preserves it. Most callers should use
/// [`FormatterRegistry::with_defaults`] for the built-in set; use
/// [`FormatterRegistry::builder`] to add custom formatters or drop built-ins.
#[derive(Debug, Default)]
pub struct FormatterRegistry {
    formatters: Vec<Formatter>,
}

impl FormatterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in formatters,
    /// configured from defaults.
    pub fn with_defaults() -> Self {
        Self::from_config(&Config::default())
    }

    /// Create a registry with the built-in formatters configured from
    /// `config` (rule set, classifier tool, per-formatter overrides).
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for formatter in formatters::builtin_formatters(config) {
            registry.register(formatter);
        }
        registry
    }

    pub fn builder() -> FormatterRegistryBuilder {
        FormatterRegistryBuilder::new()
    }

    /// Register a formatter. Duplicate names are allowed; lookup by name
    /// returns the most recent registration.
    pub fn register(&mut self, formatter: Formatter) {
        self.formatters.push(formatter);
    }

    pub fn get(&self, name: &str) -> Option<&Formatter> {
        self.formatters.iter().rev().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.formatters.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Error on any requested name that is not registered.
    pub fn verify_names<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> FormatResult<()> {
        for name in names {
            if self.get(name).is_none() {
                return Err(FormatError::UnknownFormatter {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Compute the active formatter list and per-formatter arguments for one
    /// dispatch call.
    ///
    /// A non-empty `enable` set selects exactly the named formatters;
    /// otherwise every formatter with `default_enabled` is active. Names in
    /// `disable` are then removed; disable wins over both explicit and
    /// default enablement. Arguments resolve from the caller-supplied value,
    /// defaulting to empty and then through the formatter's own transform.
    pub fn resolve_selection(
        &self,
        enable: &[String],
        disable: &[String],
        args: &HashMap<String, String>,
    ) -> FormatSelection<'_> {
        let active: Vec<&Formatter> = self
            .formatters
            .iter()
            .filter(|f| {
                if enable.is_empty() {
                    f.default_enabled
                } else {
                    enable.iter().any(|name| *name == f.name)
                }
            })
            .filter(|f| !disable.iter().any(|name| *name == f.name))
            .collect();

        let arguments = active
            .iter()
            .filter(|f| f.takes_args)
            .map(|f| {
                let resolved = f.resolve_args(args.get(&f.name).map(String::as_str));
                (f.name.clone(), resolved)
            })
            .collect();

        FormatSelection { active, arguments }
    }
}

/// Builder for a [`FormatterRegistry`] with fine-grained control.
#[derive(Default)]
pub struct FormatterRegistryBuilder {
    formatters: Vec<Formatter>,
    dropped: HashSet<String>,
}

impl FormatterRegistryBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Add the built-in formatters with default configuration.
    pub fn with_defaults(mut self) -> Self {
        self.formatters
            .extend(formatters::builtin_formatters(&Config::default()));
        self
    }

    /// Add the built-in formatters configured from `config`.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.formatters.extend(formatters::builtin_formatters(config));
        self
    }

    pub fn register(mut self, formatter: Formatter) -> Self {
        self.formatters.push(formatter);
        self
    }

    /// Exclude a formatter by name from the built registry.
    pub fn without_formatter(mut self, name: &str) -> Self {
        self.dropped.insert(name.to_string());
        self
    }

    pub fn build(self) -> FormatterRegistry {
        let mut registry = FormatterRegistry::new();
        for formatter in self.formatters {
            if !self.dropped.contains(&formatter.name) {
                registry.register(formatter);
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::test_support::NoopAction;

    fn formatter(name: &str, default_enabled: bool) -> Formatter {
        Formatter::builder(name)
            .default_enabled(default_enabled)
            .action(NoopAction)
    }

    fn names<'a>(selection: &'a FormatSelection<'a>) -> Vec<&'a str> {
        selection.active.iter().map(|f| f.name.as_str()).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_selection_is_exactly_default_enabled() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("a", true));
        registry.register(formatter("b", false));
        registry.register(formatter("c", true));

        let selection = registry.resolve_selection(&[], &[], &HashMap::new());
        assert_eq!(names(&selection), vec!["a", "c"]);
    }

    #[test]
    fn explicit_enable_replaces_default_set() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("a", true));
        registry.register(formatter("b", false));

        let selection = registry.resolve_selection(&strings(&["b"]), &[], &HashMap::new());
        assert_eq!(names(&selection), vec!["b"]);
    }

    #[test]
    fn disable_wins_over_explicit_enable() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("a", true));

        let selection =
            registry.resolve_selection(&strings(&["a"]), &strings(&["a"]), &HashMap::new());
        assert!(selection.active.is_empty());
    }

    #[test]
    fn disable_removes_default_enabled() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("a", true));
        registry.register(formatter("b", true));

        let selection = registry.resolve_selection(&[], &strings(&["a"]), &HashMap::new());
        assert_eq!(names(&selection), vec!["b"]);
    }

    #[test]
    fn selection_preserves_registry_order() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("z", true));
        registry.register(formatter("a", true));

        let selection =
            registry.resolve_selection(&strings(&["a", "z"]), &[], &HashMap::new());
        assert_eq!(names(&selection), vec!["z", "a"]);
    }

    #[test]
    fn arguments_resolved_only_for_takes_args() {
        let mut registry = FormatterRegistry::new();
        registry.register(
            Formatter::builder("with-args")
                .default_enabled(true)
                .takes_args(true)
                .action(NoopAction),
        );
        registry.register(formatter("plain", true));

        let mut args = HashMap::new();
        args.insert("with-args".to_string(), "-x".to_string());
        args.insert("plain".to_string(), "ignored".to_string());

        let selection = registry.resolve_selection(&[], &[], &args);
        assert_eq!(selection.arguments.get("with-args").unwrap(), "-x");
        assert!(!selection.arguments.contains_key("plain"));
    }

    #[test]
    fn lookup_prefers_last_registration() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("dup", false));
        registry.register(formatter("dup", true));

        assert!(registry.get("dup").unwrap().default_enabled);
    }

    #[test]
    fn verify_names_rejects_unknown() {
        let mut registry = FormatterRegistry::new();
        registry.register(formatter("a", true));

        assert!(registry.verify_names(["a"]).is_ok());
        let err = registry.verify_names(["a", "nope"]).unwrap_err();
        assert!(matches!(err, FormatError::UnknownFormatter { name } if name == "nope"));
    }

    #[test]
    fn builder_without_formatter_drops_builtin() {
        let registry = FormatterRegistry::builder()
            .with_defaults()
            .without_formatter("cpp")
            .build();

        assert!(registry.get("cpp").is_none());
        assert!(registry.get("whitespace").is_some());
    }

    #[test]
    fn with_defaults_registers_builtins() {
        let registry = FormatterRegistry::with_defaults();
        assert!(registry.get("whitespace").is_some());
        assert!(registry.get("cpp").is_some());
        assert!(registry.get("python").is_some());

        let selection = registry.resolve_selection(&[], &[], &HashMap::new());
        assert_eq!(names(&selection), vec!["whitespace"]);
    }
}
