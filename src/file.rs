//! Loading of the optional JSON settings files.
//!
//! A missing file is absence, not an error: [`load_settings_file`] returns
//! an absent [`LoadedFile`] and the file contributes nothing to the cascade. A file
//! that exists but cannot be read, is not valid JSON, or does not hold a
//! top-level object is a hard error. Malformed input is never skipped.
//!
//! The whole file is read into memory with `read_to_string`, so no handle
//! outlives the call on any path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::TestSettingsError;
use crate::flatten;
use crate::types::FileKind;

/// A settings file as seen at load time: where it was looked for and, if
/// it exists, its flattened entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub kind: FileKind,
    pub path: PathBuf,
    pub entries: Option<Vec<(String, String)>>,
}

impl LoadedFile {
    /// A file that was looked for but does not exist.
    pub fn absent(kind: FileKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            entries: None,
        }
    }

    /// A file with pre-parsed JSON content. Used by tests and callers that
    /// already hold the document in memory.
    pub fn from_json(
        kind: FileKind,
        path: impl Into<PathBuf>,
        content: &str,
    ) -> Result<Self, TestSettingsError> {
        let path = path.into();
        let entries = parse_settings(content, &path)?;
        Ok(Self {
            kind,
            path,
            entries: Some(entries),
        })
    }

    pub fn is_present(&self) -> bool {
        self.entries.is_some()
    }
}

/// Resolve `file_name` against an optional base directory.
///
/// Without a directory the name stays relative and is looked up in the
/// current working directory at read time. Absolute names are kept as-is.
pub fn settings_path(directory: Option<&Path>, file_name: &str) -> PathBuf {
    match directory {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Load one settings file.
///
/// Returns an absent [`LoadedFile`] if the file does not exist. I/O errors other than
/// not-found, parse errors, and case-insensitive duplicate keys are
/// propagated.
pub fn load_settings_file(
    kind: FileKind,
    path: &Path,
) -> Result<LoadedFile, TestSettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::trace!(file = %path.display(), %kind, "settings file not found, skipping");
            return Ok(LoadedFile::absent(kind, path));
        }
        Err(e) => {
            return Err(TestSettingsError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let entries = parse_settings(&content, path)?;
    tracing::debug!(
        file = %path.display(),
        %kind,
        entries = entries.len(),
        "loaded settings file"
    );
    Ok(LoadedFile {
        kind,
        path: path.to_path_buf(),
        entries: Some(entries),
    })
}

/// Parse a JSON document into flattened `parent:child` pairs.
pub fn parse_settings(
    content: &str,
    path: &Path,
) -> Result<Vec<(String, String)>, TestSettingsError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| TestSettingsError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    if !value.is_object() {
        return Err(TestSettingsError::NotAnObject {
            path: path.to_path_buf(),
        });
    }

    let entries = flatten::flatten(&value);

    // Keys are case-insensitive, so `Value` and `value` in one file collide.
    let mut seen = HashSet::with_capacity(entries.len());
    for (key, _) in &entries {
        if !seen.insert(key.to_lowercase()) {
            return Err(TestSettingsError::DuplicateKey {
                key: key.clone(),
                path: path.to_path_buf(),
            });
        }
    }

    Ok(entries)
}
