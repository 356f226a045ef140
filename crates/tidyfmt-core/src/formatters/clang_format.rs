//! clang-format wrapper for C/C++ sources.

use std::path::PathBuf;

use crate::error::{FormatError, FormatResult};
use crate::formatter::{FormatAction, Formatter, RunContext};
use crate::tools::{run_tool, split_args};

const TOOL: &str = "clang-format";

pub fn formatter() -> Formatter {
    Formatter::builder("cpp")
        .paths(&["."])
        .extensions(&[".c", ".cc", ".cpp", ".h", ".hpp"])
        .takes_args(true)
        .default_args(default_style)
        .action(ClangFormat)
}

/// With no explicit arguments clang-format is pointed at the project's
/// `.clang-format` file.
fn default_style(args: &str) -> String {
    if args.is_empty() {
        "-style=file".to_string()
    } else {
        args.to_string()
    }
}

struct ClangFormat;

impl FormatAction for ClangFormat {
    fn run(
        &self,
        _ctx: &RunContext,
        files: &[PathBuf],
        check: bool,
        args: &str,
    ) -> FormatResult<()> {
        let mut argv: Vec<String> = if check {
            vec!["--dry-run".to_string(), "--Werror".to_string()]
        } else {
            vec!["-i".to_string()]
        };
        argv.extend(split_args(args));
        argv.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));

        let status = run_tool(TOOL, &argv)?;
        if status.success() {
            return Ok(());
        }
        // Exit code 1 under --dry-run --Werror means findings, not failure.
        if check && status.code() == Some(1) {
            return Err(FormatError::CheckFailed {
                formatter: "cpp".to_string(),
                count: files.len(),
                violations: Vec::new(),
            });
        }
        Err(FormatError::ToolExit {
            tool: TOOL.to_string(),
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_shape() {
        let f = formatter();
        assert_eq!(f.name, "cpp");
        assert!(!f.default_enabled);
        assert!(f.takes_args);
        assert_eq!(f.extensions, vec![".c", ".cc", ".cpp", ".h", ".hpp"]);
    }

    #[test]
    fn style_defaults_to_project_file() {
        let f = formatter();
        assert_eq!(f.resolve_args(None), "-style=file");
        assert_eq!(f.resolve_args(Some("-style=llvm")), "-style=llvm");
    }
}
