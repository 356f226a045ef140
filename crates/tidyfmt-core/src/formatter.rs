//! Formatter descriptors and the action contract.
//!
//! A [`Formatter`] is a plain configuration record: identity, defaults for
//! file selection, and an action object implementing [`FormatAction`]. The
//! action receives an explicit [`RunContext`] instead of capturing ambient
//! state, so everything a run depends on is visible at the call site.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::FormatResult;

/// Argument-defaulting transform applied to a formatter's resolved argument
/// value (e.g. mapping an empty value to `-style=file`).
pub type ArgDefaulter = fn(&str) -> String;

/// Custom file lister, replacing the default recursive directory walk for
/// one formatter.
pub type FileLister = fn(&Path) -> io::Result<Vec<PathBuf>>;

/// Explicit per-invocation context threaded through every action.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunContext {
    pub verbose: bool,
    /// True in check mode; actions must not modify any file.
    pub dry_run: bool,
    /// Report files that no whitespace rule covers (check mode diagnostic).
    pub list_unruled: bool,
}

/// The unit of work a formatter performs on one file group.
///
/// Actions must not fail for "formatting found issues" under check mode by
/// panicking or short-circuiting siblings; they return
/// [`FormatError::CheckFailed`](crate::FormatError::CheckFailed) so the
/// finding flows through the dispatcher's aggregation channel. Hard failures
/// (tool missing, non-zero exit outside check semantics, I/O) use the other
/// error variants. In check mode no file may be modified.
pub trait FormatAction: 'static {
    fn run(&self, ctx: &RunContext, files: &[PathBuf], check: bool, args: &str)
    -> FormatResult<()>;
}

/// A named, pluggable formatter.
pub struct Formatter {
    pub name: String,
    pub default_enabled: bool,
    /// Default roots, joined with the dispatcher's file root at selection
    /// time. Ignored when the caller supplies override paths.
    pub paths: Vec<PathBuf>,
    /// Literal extension suffixes including the leading dot; empty means
    /// every file is extension-eligible.
    pub extensions: Vec<String>,
    /// Wildcard patterns matched against root-relative paths.
    pub excludes: Vec<String>,
    pub takes_args: bool,
    pub default_args: Option<ArgDefaulter>,
    pub lister: Option<FileLister>,
    action: Box<dyn FormatAction>,
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("name", &self.name)
            .field("default_enabled", &self.default_enabled)
            .field("paths", &self.paths)
            .field("extensions", &self.extensions)
            .field("excludes", &self.excludes)
            .field("takes_args", &self.takes_args)
            .finish_non_exhaustive()
    }
}

impl Formatter {
    pub fn builder(name: impl Into<String>) -> FormatterBuilder {
        FormatterBuilder::new(name)
    }

    /// Invoke this formatter's action on one file group.
    pub fn run(
        &self,
        ctx: &RunContext,
        files: &[PathBuf],
        check: bool,
        args: &str,
    ) -> FormatResult<()> {
        self.action.run(ctx, files, check, args)
    }

    /// Resolve the argument value for this formatter from an optional
    /// caller-supplied value: default to empty, then apply the formatter's
    /// own defaulting transform when declared.
    pub fn resolve_args(&self, supplied: Option<&str>) -> String {
        if !self.takes_args {
            return String::new();
        }
        let value = supplied.unwrap_or("");
        match self.default_args {
            Some(transform) => transform(value),
            None => value.to_string(),
        }
    }
}

/// Builder for [`Formatter`] records.
#[derive(Default)]
pub struct FormatterBuilder {
    name: String,
    default_enabled: bool,
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
    excludes: Vec<String>,
    takes_args: bool,
    default_args: Option<ArgDefaulter>,
    lister: Option<FileLister>,
}

impl FormatterBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn default_enabled(mut self, enabled: bool) -> Self {
        self.default_enabled = enabled;
        self
    }

    pub fn paths(mut self, paths: &[&str]) -> Self {
        self.paths = paths.iter().map(PathBuf::from).collect();
        self
    }

    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn excludes(mut self, excludes: &[&str]) -> Self {
        self.excludes = excludes.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn takes_args(mut self, takes_args: bool) -> Self {
        self.takes_args = takes_args;
        self
    }

    pub fn default_args(mut self, transform: ArgDefaulter) -> Self {
        self.default_args = Some(transform);
        self
    }

    pub fn lister(mut self, lister: FileLister) -> Self {
        self.lister = Some(lister);
        self
    }

    pub fn action(self, action: impl FormatAction) -> Formatter {
        Formatter {
            name: self.name,
            default_enabled: self.default_enabled,
            paths: self.paths,
            extensions: self.extensions,
            excludes: self.excludes,
            takes_args: self.takes_args,
            default_args: self.default_args,
            lister: self.lister,
            action: Box::new(action),
        }
    }
}

/// Resolved run configuration for one dispatch call.
#[derive(Debug)]
pub struct FormatSelection<'a> {
    /// Active formatters in registry order.
    pub active: Vec<&'a Formatter>,
    /// Resolved argument value per formatter name (only formatters that
    /// accept arguments appear here).
    pub arguments: HashMap<String, String>,
}


#[cfg(test)]
mod tests {
    use super::test_support::NoopAction;
    use super::*;

    fn plain(name: &str) -> Formatter {
        Formatter::builder(name).action(NoopAction)
    }

    #[test]
    fn builder_populates_record() {
        let formatter = Formatter::builder("cpp")
            .default_enabled(true)
            .paths(&["src", "include"])
            .extensions(&[".cpp", ".hpp"])
            .excludes(&["src/vendor*"])
            .takes_args(true)
            .action(NoopAction);

        assert_eq!(formatter.name, "cpp");
        assert!(formatter.default_enabled);
        assert_eq!(formatter.paths.len(), 2);
        assert_eq!(formatter.extensions, vec![".cpp", ".hpp"]);
        assert!(formatter.takes_args);
        assert!(formatter.default_args.is_none());
    }

    #[test]
    fn resolve_args_empty_without_takes_args() {
        let formatter = plain("x");
        assert_eq!(formatter.resolve_args(Some("ignored")), "");
    }

    #[test]
    fn resolve_args_passes_supplied_value_through() {
        let formatter = Formatter::builder("x").takes_args(true).action(NoopAction);
        assert_eq!(formatter.resolve_args(Some("-style=llvm")), "-style=llvm");
        assert_eq!(formatter.resolve_args(None), "");
    }

    #[test]
    fn resolve_args_applies_defaulting_transform() {
        fn fallback(args: &str) -> String {
            if args.is_empty() {
                "-style=file".to_string()
            } else {
                args.to_string()
            }
        }
        let formatter = Formatter::builder("cpp")
            .takes_args(true)
            .default_args(fallback)
            .action(NoopAction);

        assert_eq!(formatter.resolve_args(None), "-style=file");
        assert_eq!(formatter.resolve_args(Some("")), "-style=file");
        assert_eq!(formatter.resolve_args(Some("-style=llvm")), "-style=llvm");
    }
}
