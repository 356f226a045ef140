//! External process invocation for formatter wrappers.

use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{FormatError, FormatResult};

/// Run an external tool to completion, inheriting stdout/stderr.
///
/// Spawn failure (tool not installed) is a [`FormatError::ToolSpawn`]; the
/// exit status is returned for the caller to interpret, since check-mode
/// wrappers treat a non-zero exit as a finding rather than a hard failure.
pub fn run_tool<I, S>(tool: &str, args: I) -> FormatResult<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .map_err(|source| FormatError::ToolSpawn {
            tool: tool.to_string(),
            source,
        })
}

/// Require a successful exit, mapping failure to [`FormatError::ToolExit`].
pub fn ensure_success(tool: &str, status: ExitStatus) -> FormatResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(FormatError::ToolExit {
            tool: tool.to_string(),
            status: status.to_string(),
        })
    }
}

/// Split a formatter argument string on whitespace.
///
/// Arguments are simple flag tokens like `-style=file`; no quoting or
/// escaping is supported.
pub fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(|s| s.to_string()).collect()
}
