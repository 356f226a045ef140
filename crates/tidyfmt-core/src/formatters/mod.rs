//! Built-in formatters: whitespace normalization plus clang-format and
//! black wrappers.

pub mod black;
pub mod clang_format;
pub mod whitespace;

use crate::config::{Config, FormatterOverride};
use crate::formatter::Formatter;

/// Construct the built-in formatter set, with any per-formatter config
/// overrides applied. Only the whitespace formatter is default-enabled; the
/// external wrappers depend on tools that may not be installed.
pub fn builtin_formatters(config: &Config) -> Vec<Formatter> {
    vec![
        apply_override(whitespace::formatter(config), config),
        apply_override(clang_format::formatter(), config),
        apply_override(black::formatter(), config),
    ]
}

fn apply_override(mut formatter: Formatter, config: &Config) -> Formatter {
    if let Some(o) = config.override_for(&formatter.name) {
        apply_fields(&mut formatter, o);
    }
    formatter
}

fn apply_fields(formatter: &mut Formatter, o: &FormatterOverride) {
    if let Some(enabled) = o.enabled {
        formatter.default_enabled = enabled;
    }
    if let Some(paths) = &o.paths {
        formatter.paths = paths.clone();
    }
    if let Some(extensions) = &o.extensions {
        formatter.extensions = extensions.clone();
    }
    if let Some(excludes) = &o.excludes {
        formatter.excludes = excludes.clone();
    }
}
