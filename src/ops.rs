//! Settings operations: key lookup, listing, source introspection, and
//! result types.
//!
//! Provides the logic behind `list`, `get`, and `sources`, and the
//! `SettingsResult` enum that callers use to display results.

use std::fmt;

use crate::configuration::Configuration;
use crate::error::TestSettingsError;

/// Result of a settings operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsResult {
    /// A key's resolved value.
    KeyValue { key: String, value: String },
    /// All resolved key-value pairs.
    Listing { entries: Vec<(String, String)> },
    /// The layers that contributed, lowest priority first.
    Sources { sources: Vec<String> },
}

impl fmt::Display for SettingsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            SettingsResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            SettingsResult::Sources { sources } => {
                for (i, source) in sources.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}. {source}", i + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Get a resolved value by its `parent:child` key.
pub fn get_value(config: &Configuration, key: &str) -> Result<SettingsResult, TestSettingsError> {
    let value = config
        .get(key)
        .ok_or_else(|| TestSettingsError::KeyNotFound(key.into()))?;
    Ok(SettingsResult::KeyValue {
        key: key.into(),
        value: value.into(),
    })
}

/// List all resolved key-value pairs.
pub fn list_values(config: &Configuration) -> SettingsResult {
    SettingsResult::Listing {
        entries: config.entries(),
    }
}

/// Describe the layers merged in the final pass.
pub fn list_sources(config: &Configuration) -> SettingsResult {
    SettingsResult::Sources {
        sources: config.sources().iter().map(ToString::to_string).collect(),
    }
}
