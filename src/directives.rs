//! The reserved `testConfiguration` section and its typed record.
//!
//! Directives decide which layers the final pass merges, yet they live in
//! those same files. They are therefore read from a bootstrap merge of all
//! three files, then combined with the caller's explicit overrides.
//!
//! ```json
//! {
//!     "testConfiguration": {
//!         "isInBuildServerModeEnvironmentVariableName": "CI",
//!         "loadEnvironmentVariables": true,
//!         "environmentVariablesPrefix": "MyTests_",
//!         "loadDevelopmentSettingsFileInBuildServerMode": false
//!     }
//! }
//! ```

use crate::error::TestSettingsError;
use crate::flatten::join;
use crate::merge::SettingsMap;

/// Name of the reserved section.
pub const SECTION: &str = "testConfiguration";
pub const BUILD_SERVER_MODE_ENV_VAR_KEY: &str = "isInBuildServerModeEnvironmentVariableName";
pub const LOAD_ENVIRONMENT_VARIABLES_KEY: &str = "loadEnvironmentVariables";
pub const ENVIRONMENT_VARIABLES_PREFIX_KEY: &str = "environmentVariablesPrefix";
pub const LOAD_DEV_IN_BUILD_SERVER_MODE_KEY: &str = "loadDevelopmentSettingsFileInBuildServerMode";

/// Control settings for one resolution. Defaults are all empty/false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Environment variable whose value (`true` or `1`) turns on build-server
    /// mode. Empty disables the check.
    pub build_server_mode_env_var: String,
    pub load_environment_variables: bool,
    /// Only variables starting with this prefix are imported, with the
    /// prefix stripped. Empty imports all variables.
    pub environment_variables_prefix: String,
    /// Keep the development file in build-server mode.
    pub load_dev_in_build_server_mode: bool,
}

/// Explicit caller values. `None` leaves the field to the file directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveOverrides {
    /// Forces build-server mode on or off, bypassing the environment check.
    pub build_server_mode: Option<bool>,
    pub build_server_mode_env_var: Option<String>,
    pub load_environment_variables: Option<bool>,
    pub environment_variables_prefix: Option<String>,
    pub load_dev_in_build_server_mode: Option<bool>,
}

impl Directives {
    /// Read the reserved section of a merged map.
    ///
    /// Missing keys keep their default. A present key whose value is not of
    /// the expected type is an error, never silently defaulted.
    pub fn extract(map: &SettingsMap) -> Result<Self, TestSettingsError> {
        let directives = Self {
            build_server_mode_env_var: read_string(map, BUILD_SERVER_MODE_ENV_VAR_KEY)?
                .unwrap_or_default(),
            load_environment_variables: read_bool(map, LOAD_ENVIRONMENT_VARIABLES_KEY)?
                .unwrap_or_default(),
            environment_variables_prefix: read_string(map, ENVIRONMENT_VARIABLES_PREFIX_KEY)?
                .unwrap_or_default(),
            load_dev_in_build_server_mode: read_bool(map, LOAD_DEV_IN_BUILD_SERVER_MODE_KEY)?
                .unwrap_or_default(),
        };
        tracing::debug!(?directives, "extracted directives");
        Ok(directives)
    }

    /// Apply explicit overrides field by field: an override always beats
    /// the file-derived value.
    pub fn with_overrides(&self, overrides: &DirectiveOverrides) -> Self {
        Self {
            build_server_mode_env_var: overrides
                .build_server_mode_env_var
                .clone()
                .unwrap_or_else(|| self.build_server_mode_env_var.clone()),
            load_environment_variables: overrides
                .load_environment_variables
                .unwrap_or(self.load_environment_variables),
            environment_variables_prefix: overrides
                .environment_variables_prefix
                .clone()
                .unwrap_or_else(|| self.environment_variables_prefix.clone()),
            load_dev_in_build_server_mode: overrides
                .load_dev_in_build_server_mode
                .unwrap_or(self.load_dev_in_build_server_mode),
        }
    }
}

fn read_string(map: &SettingsMap, name: &str) -> Result<Option<String>, TestSettingsError> {
    let key = join(SECTION, name);
    match map.get(&key) {
        Some(value) => Ok(Some(value.to_string())),
        // An object where a string belongs.
        None if map.has_children(&key) => Err(TestSettingsError::InvalidDirective {
            value: format!("<section with keys {}>", map.child_keys(Some(key.as_str())).join(", ")),
            key,
            expected: "a string",
        }),
        None => Ok(None),
    }
}

fn read_bool(map: &SettingsMap, name: &str) -> Result<Option<bool>, TestSettingsError> {
    let key = join(SECTION, name);
    let Some(raw) = map.get(&key) else {
        if map.has_children(&key) {
            return Err(TestSettingsError::InvalidDirective {
                value: format!("<section with keys {}>", map.child_keys(Some(key.as_str())).join(", ")),
                key,
                expected: "a boolean",
            });
        }
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else if trimmed.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(TestSettingsError::InvalidDirective {
            key,
            value: raw.to_string(),
            expected: "a boolean",
        })
    }
}
