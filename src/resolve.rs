//! Core resolution pipeline: bootstrap, plan, and merge the settings layers.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Bootstrap-merge all present files, ignoring build-server gating
//! 2. Extract the `testConfiguration` directives from the bootstrap merge
//! 3. Plan the cascade from directives plus caller overrides
//! 4. Merge the planned layers, env vars last
//!
//! The bootstrap pass ignores the mode: the directives that decide whether
//! a file is merged may live in that very file.

use crate::configuration::Configuration;
use crate::directives::{DirectiveOverrides, Directives};
use crate::env;
use crate::error::TestSettingsError;
use crate::file::LoadedFile;
use crate::merge::{SettingsMap, merge};
use crate::plan::{self, SettingsFiles};
use crate::types::{FileKind, SourceDescriptor};

/// All pre-loaded data needed to resolve settings. No I/O happens here.
#[derive(Debug, Clone)]
pub struct ResolveInput {
    pub base: LoadedFile,
    pub development: LoadedFile,
    pub build_server: LoadedFile,
    /// Environment snapshot (pass `env::process_vars()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    pub overrides: DirectiveOverrides,
}

impl ResolveInput {
    fn file(&self, kind: FileKind) -> &LoadedFile {
        match kind {
            FileKind::Base => &self.base,
            FileKind::Development => &self.development,
            FileKind::BuildServer => &self.build_server,
        }
    }

    fn settings_files(&self) -> SettingsFiles {
        SettingsFiles {
            base: self.base.path.clone(),
            development: self.development.path.clone(),
            build_server: self.build_server.path.clone(),
        }
    }
}

/// Resolve settings from pre-loaded inputs.
pub fn resolve(input: ResolveInput) -> Result<Configuration, TestSettingsError> {
    let bootstrap = bootstrap(&input);
    let directives = Directives::extract(&bootstrap)?;

    let cascade = plan::plan(
        &input.settings_files(),
        &directives,
        &input.overrides,
        |name| env::lookup(&input.env_vars, name),
    );

    let mut layers = Vec::with_capacity(cascade.sources.len());
    let mut sources = Vec::with_capacity(cascade.sources.len());
    for source in cascade.sources {
        match &source {
            SourceDescriptor::File { kind, .. } => {
                let Some(entries) = &input.file(*kind).entries else {
                    continue;
                };
                layers.push(entries.clone());
            }
            SourceDescriptor::EnvironmentVariables { prefix } => {
                layers.push(env::env_to_entries(prefix, &input.env_vars));
            }
        }
        sources.push(source);
    }

    let values = merge(layers);
    tracing::debug!(
        sources = sources.len(),
        keys = values.len(),
        build_server_mode = cascade.build_server_mode,
        "resolved test settings"
    );

    Ok(Configuration {
        values,
        sources,
        directives: cascade.directives,
        build_server_mode: cascade.build_server_mode,
    })
}

/// Base, development, then build-server file, whatever the mode.
fn bootstrap(input: &ResolveInput) -> SettingsMap {
    merge(
        [&input.base, &input.development, &input.build_server]
            .into_iter()
            .filter_map(|file| file.entries.clone()),
    )
}
