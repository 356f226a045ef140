//! Sequential dispatch of active formatters over their file groups.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{FormatError, FormatResult};
use crate::formatter::RunContext;
use crate::registry::FormatterRegistry;
use crate::select::select_files;

/// Options for one dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Report instead of rewriting; no file is modified.
    pub check: bool,
    /// Copy each file to `<file>.bak` before rewriting it.
    pub backup: bool,
    /// Overwrite existing `.bak` files instead of aborting the group.
    pub force: bool,
    /// Root that formatter-configured relative paths are joined with.
    pub file_root: PathBuf,
    pub verbose: bool,
    /// List files no whitespace rule covers (check mode diagnostic).
    pub list_unruled: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            check: false,
            backup: false,
            force: false,
            file_root: PathBuf::from("."),
            verbose: false,
            list_unruled: false,
        }
    }
}

/// Outcome of one dispatch call.
///
/// Errors are aggregated rather than short-circuiting: a failure in one
/// formatter or file group never prevents the remaining work from running.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub errors: Vec<FormatError>,
    pub files_processed: usize,
    pub formatters_run: usize,
    pub elapsed_ms: u64,
}

impl DispatchReport {
    pub fn with_timing(mut self, start: Instant) -> Self {
        self.elapsed_ms = start.elapsed().as_millis() as u64;
        self
    }

    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line outcome summary for the end of a run.
    pub fn summary(&self, check: bool) -> String {
        if !self.failed() {
            format!(
                "Processed {} file(s) with {} formatter(s) in {}ms",
                self.files_processed, self.formatters_run, self.elapsed_ms
            )
        } else if check {
            "Code formatting check failed".to_string()
        } else {
            "Code formatting failed".to_string()
        }
    }
}

/// Run every active formatter over its file groups, in order.
///
/// Unknown names in `enable`, `disable`, or `args` are a hard error before
/// any work starts. After that, errors accumulate in the report: a group
/// whose backup pre-scan finds a conflict is skipped, a formatter whose
/// action fails does not stop its siblings.
pub fn dispatch(
    registry: &FormatterRegistry,
    enable: &[String],
    disable: &[String],
    args: &HashMap<String, String>,
    override_paths: &[PathBuf],
    options: &DispatchOptions,
) -> FormatResult<DispatchReport> {
    let start = Instant::now();
    registry.verify_names(
        enable
            .iter()
            .chain(disable.iter())
            .chain(args.keys())
            .map(String::as_str),
    )?;

    let selection = registry.resolve_selection(enable, disable, args);
    let ctx = RunContext {
        verbose: options.verbose,
        dry_run: options.check,
        list_unruled: options.list_unruled,
    };

    let mut report = DispatchReport::default();
    for formatter in &selection.active {
        let groups = match select_files(formatter, override_paths, &options.file_root) {
            Ok(groups) => groups,
            Err(err) => {
                report.errors.push(err);
                continue;
            }
        };

        let mut ran = false;
        let args = selection
            .arguments
            .get(&formatter.name)
            .map(String::as_str)
            .unwrap_or("");

        for group in &groups {
            if group.is_empty() {
                continue;
            }

            if options.backup && !options.check {
                if let Err(err) = back_up_group(&group.files, options.force) {
                    report.errors.push(err);
                    continue;
                }
            }

            ran = true;
            report.files_processed += group.files.len();
            if let Err(err) = formatter.run(&ctx, &group.files, options.check, args) {
                report.errors.push(err);
            }
        }

        if ran {
            report.formatters_run += 1;
        }
    }

    Ok(report.with_timing(start))
}

/// Copy every file in a group to `<file>.bak` before it is rewritten.
///
/// The conflict pre-scan runs over the whole group first so a group is
/// either backed up completely or not touched at all.
fn back_up_group(files: &[PathBuf], force: bool) -> FormatResult<()> {
    let backups: Vec<(PathBuf, PathBuf)> = files
        .iter()
        .map(|file| (file.clone(), backup_path(file)))
        .collect();

    if !force {
        for (_, backup) in &backups {
            if backup.exists() {
                return Err(FormatError::BackupConflict {
                    path: backup.clone(),
                });
            }
        }
    }

    for (file, backup) in &backups {
        std::fs::copy(file, backup).map_err(|source| FormatError::FileWrite {
            path: backup.clone(),
            source,
        })?;
    }
    Ok(())
}

fn backup_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}
