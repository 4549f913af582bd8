//! Clap adapter for testsettings.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//!
//! [`ResolveArgs`] exposes every resolution parameter as a flag and can be
//! flattened into any clap parser; [`ResolveArgs::apply`] copies the parsed
//! values onto a [`TestSettingsBuilder`]. [`SettingsArgs`] adds
//! `list|get|sources` subcommands that convert into a framework-agnostic
//! [`SettingsAction`](crate::SettingsAction).

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::builder::TestSettingsBuilder;
use crate::types::{
    DEFAULT_BASE_FILE, DEFAULT_BUILD_SERVER_FILE, DEFAULT_DEVELOPMENT_FILE, SettingsAction,
};

/// Flags controlling one resolution of the settings cascade.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     settings: ResolveArgs,
/// }
/// ```
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Directory holding the settings files (default: current directory).
    #[arg(long, global = true)]
    pub directory: Option<PathBuf>,

    /// Name of the base settings file.
    #[arg(long, global = true, default_value = DEFAULT_BASE_FILE)]
    pub base_file: String,

    /// Name of the developer-local override file.
    #[arg(long, global = true, default_value = DEFAULT_DEVELOPMENT_FILE)]
    pub development_file: String,

    /// Name of the build-server override file.
    #[arg(long, global = true, default_value = DEFAULT_BUILD_SERVER_FILE)]
    pub build_server_file: String,

    /// Force build-server mode on or off instead of detecting it.
    #[arg(long, global = true)]
    pub build_server_mode: Option<bool>,

    /// Environment variable that signals build-server mode.
    #[arg(long, global = true, default_value = "")]
    pub build_server_mode_env_var: String,

    /// Merge environment variables on top of the files.
    #[arg(long, global = true)]
    pub load_environment_variables: Option<bool>,

    /// Only import environment variables with this prefix.
    #[arg(long, global = true, default_value = "")]
    pub environment_variables_prefix: String,

    /// Keep the development file in build-server mode.
    #[arg(long, global = true)]
    pub load_development_file_in_build_server_mode: Option<bool>,
}

impl ResolveArgs {
    /// Copy the parsed flags onto `builder`.
    pub fn apply(self, builder: TestSettingsBuilder) -> TestSettingsBuilder {
        let builder = match self.directory {
            Some(dir) => builder.directory(dir),
            None => builder,
        };
        builder
            .base_file(&self.base_file)
            .development_file(&self.development_file)
            .build_server_file(&self.build_server_file)
            .build_server_mode(self.build_server_mode)
            .build_server_mode_env_var(&self.build_server_mode_env_var)
            .load_environment_variables(self.load_environment_variables)
            .environment_variables_prefix(&self.environment_variables_prefix)
            .load_development_file_in_build_server_mode(
                self.load_development_file_in_build_server_mode,
            )
    }
}

/// Clap-derived args for the `settings` subcommand group.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: Option<SettingsSubcommand>,
}

/// Available settings subcommands.
#[derive(Debug, Subcommand)]
pub enum SettingsSubcommand {
    /// Show all resolved key-value pairs.
    List,
    /// Show the resolved value of one key.
    Get {
        /// Colon-separated key path (e.g. "database:connectionString").
        key: String,
    },
    /// Show which layers were merged, lowest priority first.
    Sources,
}

impl SettingsArgs {
    /// Convert clap-parsed args into a framework-agnostic `SettingsAction`.
    /// A bare `settings` maps to `List`.
    pub fn into_action(self) -> SettingsAction {
        match self.action {
            None | Some(SettingsSubcommand::List) => SettingsAction::List,
            Some(SettingsSubcommand::Get { key }) => SettingsAction::Get { key },
            Some(SettingsSubcommand::Sources) => SettingsAction::Sources,
        }
    }
}
