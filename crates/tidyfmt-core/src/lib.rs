//! # tidyfmt-core
//!
//! Formatting engine: formatter registry, file selection, and the built-in
//! whitespace/encoding normalizer.
//!
//! The pipeline:
//! - a [`FormatterRegistry`] holds named [`Formatter`] descriptors
//! - [`dispatch`] resolves the active set, expands each formatter's paths
//!   into file groups, and runs the formatter action per group
//! - the whitespace formatter resolves a [`WhitespaceRule`] per file,
//!   checks or rewrites line endings, trailing whitespace, tabs, and the
//!   final newline, and verifies encoding via an external classifier
//!
//! External formatters (clang-format, black) are wrapped as actions behind
//! the same descriptor type.

pub mod config;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod formatter;
pub mod formatters;
pub mod patterns;
pub mod registry;
pub mod rules;
pub mod select;
pub mod tools;
pub mod whitespace;

pub use config::{Config, FormatterOverride};
pub use dispatch::{DispatchOptions, DispatchReport, dispatch};
pub use encoding::{Encoding, EncodingDetector, EncodingResult};
pub use error::{ConfigError, FormatError, FormatResult, Violation};
pub use formatter::{FormatAction, FormatSelection, Formatter, FormatterBuilder, RunContext};
pub use registry::{FormatterRegistry, FormatterRegistryBuilder};
pub use rules::WhitespaceRule;
pub use select::FileGroup;
