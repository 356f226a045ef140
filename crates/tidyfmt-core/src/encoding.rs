//! Encoding detection and byte-level text encoding.
//!
//! Detection shells out to an external heuristic classifier (`file` by
//! default) and maps its human-readable label onto a normalized tag. Writing
//! re-encodes text according to the resolved whitespace rule: strict
//! single-byte ASCII, UTF-8, or UTF-8 with a byte-order mark.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

use crate::error::{FormatError, FormatResult};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Normalized text encoding tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "utf8")]
    Utf8,
    #[serde(rename = "utf8-bom")]
    Utf8Bom,
}

/// Outcome of classifying one file's on-disk encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingResult {
    /// Verbatim label reported by the classifier tool.
    pub raw_label: String,
    /// Normalized tag, or `None` for an unrecognized label.
    pub encoding: Option<Encoding>,
}

impl EncodingResult {
    pub fn is_recognized(&self) -> bool {
        self.encoding.is_some()
    }

    /// Whether the detected encoding satisfies `expected`.
    ///
    /// ASCII is a byte-level subset of UTF-8, so a file detected as ASCII is
    /// accepted when the rule requires UTF-8. Unrecognized labels never
    /// satisfy any expectation.
    pub fn matches(&self, expected: Encoding) -> bool {
        match self.encoding {
            Some(found) if found == expected => true,
            Some(Encoding::Ascii) => expected == Encoding::Utf8,
            _ => false,
        }
    }
}

/// Map a classifier label to a normalized tag. First match wins.
pub fn classify_label(label: &str) -> Option<Encoding> {
    if label == "empty" || label.contains("ASCII text") {
        return Some(Encoding::Ascii);
    }
    if label.contains("UTF-8") {
        if label.contains("(with BOM)") {
            return Some(Encoding::Utf8Bom);
        }
        return Some(Encoding::Utf8);
    }
    if label.contains("JSON data") {
        return Some(Encoding::Utf8);
    }
    None
}

/// Wrapper around the external heuristic classifier.
#[derive(Debug, Clone)]
pub struct EncodingDetector {
    tool: String,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self::new("file")
    }
}

impl EncodingDetector {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// Classify `path` by invoking `<tool> -E -F '|' <path>`.
    ///
    /// The classifier prints `<path>| <label>` on one line; the label is the
    /// part after the separator, trimmed. A non-zero exit (e.g. file not
    /// found) is a hard error.
    pub fn detect(&self, path: &Path) -> FormatResult<EncodingResult> {
        let output = Command::new(&self.tool)
            .arg("-E")
            .arg("-F")
            .arg("|")
            .arg(path)
            .output()
            .map_err(|source| FormatError::ToolSpawn {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormatError::ToolExit {
                tool: self.tool.clone(),
                status: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().next().unwrap_or("");
        let raw_label = match line.split_once('|') {
            Some((_, label)) => label.trim().to_string(),
            None => line.trim().to_string(),
        };
        let encoding = classify_label(&raw_label);

        Ok(EncodingResult { raw_label, encoding })
    }
}

/// Read a file as text, stripping a leading UTF-8 byte-order mark.
///
/// Invalid UTF-8 is a hard error, not a lossy decode: rewriting a file this
/// engine cannot represent would replace the offending bytes on write, so
/// such files are reported and left alone.
pub fn read_text(path: &Path) -> FormatResult<String> {
    let bytes = std::fs::read(path).map_err(|source| FormatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let stripped = strip_bom(&bytes);
    String::from_utf8(stripped.to_vec()).map_err(|source| FormatError::FileRead {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
    })
}

/// Encode `text` for on-disk storage under `encoding`.
///
/// ASCII is strict: any non-ASCII character is an error rather than a lossy
/// substitution. UTF-8 variants differ only in the byte-order mark.
pub fn encode_text(text: &str, encoding: Encoding, path: &Path) -> FormatResult<Vec<u8>> {
    match encoding {
        Encoding::Ascii => {
            if !text.is_ascii() {
                return Err(FormatError::NonAsciiContent {
                    path: path.to_path_buf(),
                });
            }
            Ok(text.as_bytes().to_vec())
        }
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Utf8Bom => {
            let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
            bytes.extend_from_slice(&UTF8_BOM);
            bytes.extend_from_slice(text.as_bytes());
            Ok(bytes)
        }
    }
}

/// Write `text` to `path` under the given encoding.
pub fn write_text(path: &Path, text: &str, encoding: Encoding) -> FormatResult<()> {
    let bytes = encode_text(text, encoding, path)?;
    std::fs::write(path, bytes).map_err(|source| FormatError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes)
}
