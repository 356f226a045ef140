//! File selection: expanding configured paths into per-root file groups.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FormatError, FormatResult};
use crate::formatter::Formatter;
use crate::patterns::matches_none;
use crate::rules::file_extension;

/// The files resolved from one configured path entry.
///
/// Groups are kept separate so batch dispatch to an external formatter
/// process happens once per configured root instead of flattening everything
/// into one call, which would run into command-line length limits.
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub origin: PathBuf,
    pub files: Vec<PathBuf>,
}

impl FileGroup {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Expand a formatter's configured paths (or caller-supplied overrides) into
/// concrete file groups.
///
/// Override paths are used verbatim; configured paths are joined with
/// `file_root`. A base path naming an existing regular file yields a
/// singleton group when it passes the extension/exclusion filter; any other
/// base path is walked recursively (the formatter's custom lister when
/// declared, else a sorted directory walk). One group per base path, in
/// declaration order, possibly empty.
pub fn select_files(
    formatter: &Formatter,
    override_paths: &[PathBuf],
    file_root: &Path,
) -> FormatResult<Vec<FileGroup>> {
    let base_paths: Vec<PathBuf> = if override_paths.is_empty() {
        formatter.paths.iter().map(|p| file_root.join(p)).collect()
    } else {
        override_paths.to_vec()
    };

    let mut groups = Vec::with_capacity(base_paths.len());
    for base in base_paths {
        let files = if base.is_file() {
            if passes_filter(&base, formatter, file_root) {
                vec![base.clone()]
            } else {
                Vec::new()
            }
        } else {
            let candidates = match formatter.lister {
                Some(lister) => lister(&base).map_err(|source| FormatError::FileRead {
                    path: base.clone(),
                    source,
                })?,
                None => walk_files(&base),
            };
            candidates
                .into_iter()
                .filter(|path| passes_filter(path, formatter, file_root))
                .collect()
        };
        groups.push(FileGroup {
            origin: base,
            files,
        });
    }
    Ok(groups)
}

/// Default recursive lister: every regular file under `base`, sorted by name
/// for deterministic dispatch order. Unreadable entries are skipped.
fn walk_files(base: &Path) -> Vec<PathBuf> {
    WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

fn passes_filter(path: &Path, formatter: &Formatter, file_root: &Path) -> bool {
    if !formatter.extensions.is_empty() {
        match file_extension(path) {
            Some(ext) if formatter.extensions.iter().any(|e| *e == ext) => {}
            _ => return false,
        }
    }
    matches_none(&relative_str(path, file_root), &formatter.excludes)
}

/// Path string relative to `file_root` with forward slashes, used for
/// exclusion matching. Falls back to the full path outside the root.
fn relative_str(path: &Path, file_root: &Path) -> String {
    let rel = path.strip_prefix(file_root).unwrap_or(path);
    let s = rel.to_string_lossy().replace('\\', "/");
    match s.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => s,
    }
}
