//! black wrapper for Python sources.

use std::path::PathBuf;

use crate::error::{FormatError, FormatResult};
use crate::formatter::{FormatAction, Formatter, RunContext};
use crate::tools::{run_tool, split_args};

const TOOL: &str = "black";

pub fn formatter() -> Formatter {
    Formatter::builder("python")
        .paths(&["."])
        .extensions(&[".py"])
        .takes_args(true)
        .action(Black)
}

struct Black;

impl FormatAction for Black {
    fn run(
        &self,
        ctx: &RunContext,
        files: &[PathBuf],
        check: bool,
        args: &str,
    ) -> FormatResult<()> {
        let mut argv: Vec<String> = Vec::new();
        if check {
            argv.push("--check".to_string());
        }
        if !ctx.verbose {
            argv.push("--quiet".to_string());
        }
        argv.extend(split_args(args));
        argv.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));

        let status = run_tool(TOOL, &argv)?;
        if status.success() {
            return Ok(());
        }
        // black exits 1 from --check when files would be reformatted.
        if check && status.code() == Some(1) {
            return Err(FormatError::CheckFailed {
                formatter: "python".to_string(),
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
