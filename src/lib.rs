//! Layered, self-describing settings for automated tests. Drop a JSON file
//! next to your tests, and go.
//!
//! testsettings resolves configuration from up to three optional JSON files
//! and, optionally, process environment variables. The files themselves say
//! which of them apply: build-server detection, environment variable import,
//! and whether a developer's local file survives on CI are all declared in a
//! reserved `testConfiguration` section.
//!
//! ```ignore
//! let settings = testsettings::configuration()?;
//! if settings.get("database:runIntegrationTests") == Some("true") {
//!     // ...
//! }
//! ```
//!
//! That single call reads `testsettings.json`, `testsettings.Development.json`
//! and `testsettings.Build.json` from the working directory, works out whether
//! it runs on a build server, merges the applicable layers and caches the
//! result for the rest of the process.
//!
//! # The three files
//!
//! - **`testsettings.json`** is committed and lists every setting with a safe
//!   default. Integration tests that need a database or web service should
//!   be switched off here, so a fresh clone passes its test suite.
//! - **`testsettings.Development.json`** is the developer's uncommitted local
//!   override. It is ignored in build-server mode unless
//!   `loadDevelopmentSettingsFileInBuildServerMode` is set.
//! - **`testsettings.Build.json`** is committed and only read in build-server
//!   mode.
//!
//! Every file is optional. A missing file contributes nothing; a file that
//! exists but is not a JSON object is an error.
//!
//! # Layer precedence
//!
//! ```text
//! testsettings.json              always
//!        ↑ overridden by
//! testsettings.Build.json        build-server mode only
//!        ↑ overridden by
//! testsettings.Development.json  outside build-server mode, or whitelisted
//!        ↑ overridden by
//! Environment variables          when loadEnvironmentVariables is on
//! ```
//!
//! # Directives
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
//!
//! Directives may sit in any of the three files. Because they decide which
//! files are merged, resolution runs in two passes: a bootstrap pass merges
//! all three files just to read this section, then the final pass merges the
//! layers the directives select. A directive in `testsettings.Build.json`
//! therefore applies even on a developer machine where that file's values
//! are not merged.
//!
//! Build-server mode is on when the variable named by
//! `isInBuildServerModeEnvironmentVariableName` holds `true` (any case) or
//! `1`. A mistyped directive, such as `"loadEnvironmentVariables": "yes"`,
//! fails resolution instead of being silently ignored.
//!
//! # Explicit overrides
//!
//! [`TestSettings::builder()`] accepts a value for every directive. Explicit
//! values win over the files field by field; blank strings count as "not
//! given".
//!
//! ```ignore
//! let settings = TestSettings::builder()
//!     .build_server_mode(Some(true))
//!     .environment_variables_prefix("MyTests_")
//!     .load()?;
//! ```
//!
//! # Keys
//!
//! Nested JSON is flattened into colon-separated keys that compare without
//! regard to case: `{"database": {"url": "..."}}` is read with
//! `get("database:url")` or `get("Database:URL")`. Environment variables use
//! `__` for the separator, so `MyTests_Database__Url` overrides
//! `database:url`.
//!
//! # Error handling
//!
//! All fallible operations return [`TestSettingsError`]. The shared instance
//! returned by [`configuration()`] hands errors out as
//! `Arc<TestSettingsError>` because one failed attempt is reported to every
//! thread that was waiting on it; the next call tries again.

pub mod error;
pub mod order;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod configuration;
mod directives;
mod env;
mod file;
mod flatten;
mod lazy;
pub(crate) mod merge;
mod ops;
mod plan;
mod resolve;

use std::sync::Arc;

pub use builder::{TestSettings, TestSettingsBuilder};
#[cfg(feature = "clap")]
pub use cli::{ResolveArgs, SettingsArgs, SettingsSubcommand};
pub use configuration::{Configuration, Section};
pub use directives::{DirectiveOverrides, Directives};
pub use error::TestSettingsError;
pub use file::LoadedFile;
pub use lazy::RetryableLazy;
pub use ops::SettingsResult;
pub use plan::{CascadePlan, SettingsFiles, detect_build_server_mode, plan};
pub use resolve::{ResolveInput, resolve};
pub use types::{FileKind, SettingsAction, SourceDescriptor};

static CONFIGURATION: RetryableLazy<Configuration, TestSettingsError> = RetryableLazy::new();

/// The process-wide settings, resolved with default parameters on first
/// access and kept for the life of the process.
///
/// Concurrent first calls resolve once; every caller gets the same instance.
/// A failed resolution is not cached.
pub fn configuration() -> Result<Arc<Configuration>, Arc<TestSettingsError>> {
    CONFIGURATION.get_or_try_init(|| TestSettings::builder().load())
}
