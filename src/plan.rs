//! Cascade planning: decide which layers the final pass merges, and in
//! which order.
//!
//! ```text
//! Base file                  always, first
//!        ↑ overridden by
//! Build-server file          only in build-server mode
//!        ↑ overridden by
//! Development file           outside build-server mode, or in it when
//!                            loadDevelopmentSettingsFileInBuildServerMode
//!        ↑ overridden by
//! Environment variables      when loadEnvironmentVariables, always last
//! ```
//!
//! The development file is merged *after* the build-server file when both
//! are active, so a whitelisted developer file has the final file-level say.

use std::path::PathBuf;

use crate::directives::{DirectiveOverrides, Directives};
use crate::types::{FileKind, SourceDescriptor};

/// Paths of the three settings files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFiles {
    pub base: PathBuf,
    pub development: PathBuf,
    pub build_server: PathBuf,
}

impl SettingsFiles {
    fn source(&self, kind: FileKind) -> SourceDescriptor {
        let path = match kind {
            FileKind::Base => &self.base,
            FileKind::Development => &self.development,
            FileKind::BuildServer => &self.build_server,
        };
        SourceDescriptor::File {
            kind,
            path: path.clone(),
        }
    }
}

/// Outcome of planning: the effective directive values and the ordered
/// layers to merge (first = lowest priority).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    pub directives: Directives,
    pub build_server_mode: bool,
    pub sources: Vec<SourceDescriptor>,
}

/// Plan the final pass.
///
/// `directives` come from the bootstrap merge; `overrides` from the caller
/// and win field by field. `env_var` looks up a single environment variable
/// and is only consulted for build-server detection when no explicit mode
/// override is given.
pub fn plan<'a>(
    files: &SettingsFiles,
    directives: &Directives,
    overrides: &DirectiveOverrides,
    env_var: impl Fn(&str) -> Option<&'a str>,
) -> CascadePlan {
    let effective = directives.with_overrides(overrides);
    let build_server_mode = overrides
        .build_server_mode
        .unwrap_or_else(|| detect_build_server_mode(&effective.build_server_mode_env_var, env_var));

    let mut sources = vec![files.source(FileKind::Base)];
    if build_server_mode {
        sources.push(files.source(FileKind::BuildServer));
        if effective.load_dev_in_build_server_mode {
            sources.push(files.source(FileKind::Development));
        }
    } else {
        sources.push(files.source(FileKind::Development));
    }

    if effective.load_environment_variables {
        sources.push(SourceDescriptor::EnvironmentVariables {
            prefix: effective.environment_variables_prefix.clone(),
        });
    }

    tracing::debug!(
        build_server_mode,
        layers = sources.len(),
        "planned settings cascade"
    );

    CascadePlan {
        directives: effective,
        build_server_mode,
        sources,
    }
}

/// Build-server mode is on when the named variable exists and its trimmed
/// value is `true` (any case) or exactly `1`. An empty name disables the
/// check.
pub fn detect_build_server_mode<'a>(
    env_var_name: &str,
    env_var: impl Fn(&str) -> Option<&'a str>,
) -> bool {
    if env_var_name.trim().is_empty() {
        return false;
    }
    env_var(env_var_name).is_some_and(is_build_server_flag)
}

fn is_build_server_flag(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.eq_ignore_ascii_case("true") || trimmed == "1"
}
