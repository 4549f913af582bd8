use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestSettingsError {
    #[error("File name for '{parameter}' must not be empty or whitespace")]
    EmptyFileName { parameter: &'static str },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Top-level value in {path} must be a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("Duplicate key '{key}' in {path}")]
    DuplicateKey { key: String, path: PathBuf },

    #[error("Invalid value for directive '{key}': expected {expected}, found '{value}'")]
    InvalidDirective {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_name_names_parameter() {
        let err = TestSettingsError::EmptyFileName {
            parameter: "development_file",
        };
        assert!(err.to_string().contains("development_file"));
    }

    #[test]
    fn invalid_directive_formats_correctly() {
        let err = TestSettingsError::InvalidDirective {
            key: "testConfiguration:loadEnvironmentVariables".into(),
            value: "yes".into(),
            expected: "a boolean",
        };
        let msg = err.to_string();
        assert!(msg.contains("loadEnvironmentVariables"));
        assert!(msg.contains("yes"));
        assert!(msg.contains("boolean"));
    }

    #[test]
    fn duplicate_key_formats() {
        let err = TestSettingsError::DuplicateKey {
            key: "Value".into(),
            path: "testsettings.json".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Value"));
        assert!(msg.contains("testsettings.json"));
    }

    #[test]
    fn key_not_found_formats() {
        let err = TestSettingsError::KeyNotFound("database:url".into());
        assert!(err.to_string().contains("database:url"));
    }
}
