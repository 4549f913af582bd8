use std::path::{Path, PathBuf};

use crate::configuration::Configuration;
use crate::directives::DirectiveOverrides;
use crate::env;
use crate::error::TestSettingsError;
use crate::file;
use crate::ops::{self, SettingsResult};
use crate::resolve::{self, ResolveInput};
use crate::types::{
    DEFAULT_BASE_FILE, DEFAULT_BUILD_SERVER_FILE, DEFAULT_DEVELOPMENT_FILE, FileKind,
    SettingsAction,
};

/// Entry point for resolving test settings.
pub struct TestSettings;

impl TestSettings {
    pub fn builder() -> TestSettingsBuilder {
        TestSettingsBuilder::new()
    }
}

/// Builder for one resolution of the settings cascade.
///
/// Every setter mirrors one parameter of the resolution: the three file
/// names and the explicit directive overrides. Unset overrides fall through
/// to the `testConfiguration` section of the files, then to defaults.
#[derive(Debug, Clone)]
pub struct TestSettingsBuilder {
    directory: Option<PathBuf>,
    base_file: String,
    development_file: String,
    build_server_file: String,
    overrides: DirectiveOverrides,
}

impl Default for TestSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSettingsBuilder {
    fn new() -> Self {
        Self {
            directory: None,
            base_file: DEFAULT_BASE_FILE.to_string(),
            development_file: DEFAULT_DEVELOPMENT_FILE.to_string(),
            build_server_file: DEFAULT_BUILD_SERVER_FILE.to_string(),
            overrides: DirectiveOverrides::default(),
        }
    }

    /// Look for the files in `dir` instead of the current working directory.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Override the base file name (default: `testsettings.json`).
    pub fn base_file(mut self, name: &str) -> Self {
        self.base_file = name.to_string();
        self
    }

    /// Override the development file name (default: `testsettings.Development.json`).
    pub fn development_file(mut self, name: &str) -> Self {
        self.development_file = name.to_string();
        self
    }

    /// Override the build-server file name (default: `testsettings.Build.json`).
    pub fn build_server_file(mut self, name: &str) -> Self {
        self.build_server_file = name.to_string();
        self
    }

    /// Force build-server mode on or off. `None` detects it from the
    /// environment variable named by the directive.
    pub fn build_server_mode(mut self, enabled: Option<bool>) -> Self {
        self.overrides.build_server_mode = enabled;
        self
    }

    /// Name of the variable that signals build-server mode. Blank names are
    /// ignored.
    pub fn build_server_mode_env_var(mut self, name: &str) -> Self {
        self.overrides.build_server_mode_env_var = non_blank(name);
        self
    }

    /// Whether to merge environment variables last. `None` defers to the files.
    pub fn load_environment_variables(mut self, enabled: Option<bool>) -> Self {
        self.overrides.load_environment_variables = enabled;
        self
    }

    /// Prefix that imported environment variables must start with. Blank
    /// prefixes are ignored.
    pub fn environment_variables_prefix(mut self, prefix: &str) -> Self {
        self.overrides.environment_variables_prefix = non_blank(prefix);
        self
    }

    /// Whether the development file is kept in build-server mode. `None`
    /// defers to the files.
    pub fn load_development_file_in_build_server_mode(mut self, enabled: Option<bool>) -> Self {
        self.overrides.load_dev_in_build_server_mode = enabled;
        self
    }

    fn file_path(&self, parameter: &'static str, name: &str) -> Result<PathBuf, TestSettingsError> {
        if name.trim().is_empty() {
            return Err(TestSettingsError::EmptyFileName { parameter });
        }
        Ok(file::settings_path(self.directory.as_deref(), name))
    }

    /// Validate the file names and read everything the pipeline needs.
    fn build_input(&self) -> Result<ResolveInput, TestSettingsError> {
        let base = self.file_path("base_file", &self.base_file)?;
        let development = self.file_path("development_file", &self.development_file)?;
        let build_server = self.file_path("build_server_file", &self.build_server_file)?;

        Ok(ResolveInput {
            base: load(FileKind::Base, &base)?,
            development: load(FileKind::Development, &development)?,
            build_server: load(FileKind::BuildServer, &build_server)?,
            env_vars: env::process_vars(),
            overrides: self.overrides.clone(),
        })
    }

    /// Resolve the cascade against the current files and environment.
    pub fn load(&self) -> Result<Configuration, TestSettingsError> {
        let input = self.build_input()?;
        resolve::resolve(input)
    }

    /// Handle a `SettingsAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &SettingsAction) -> Result<(), TestSettingsError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `SettingsAction` (list / get / sources).
    pub fn handle(&self, action: &SettingsAction) -> Result<SettingsResult, TestSettingsError> {
        let config = self.load()?;
        match action {
            SettingsAction::List => Ok(ops::list_values(&config)),
            SettingsAction::Get { key } => ops::get_value(&config, key),
            SettingsAction::Sources => Ok(ops::list_sources(&config)),
        }
    }
}

fn load(kind: FileKind, path: &Path) -> Result<file::LoadedFile, TestSettingsError> {
    file::load_settings_file(kind, path)
}

fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceDescriptor;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn three_files() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(&dir, "testsettings.json", r#"{"theValue": "Foo"}"#);
        write(&dir, "testsettings.Development.json", r#"{"theValue": "Bar"}"#);
        write(&dir, "testsettings.Build.json", r#"{"theValue": "Baz"}"#);
        dir
    }

    #[test]
    fn defaults_use_conventional_file_names() {
        let builder = TestSettings::builder();
        assert_eq!(builder.base_file, "testsettings.json");
        assert_eq!(builder.development_file, "testsettings.Development.json");
        assert_eq!(builder.build_server_file, "testsettings.Build.json");
        assert_eq!(builder.overrides, DirectiveOverrides::default());
    }

    #[test]
    fn blank_strings_are_not_overrides() {
        let builder = TestSettings::builder()
            .build_server_mode_env_var("  ")
            .environment_variables_prefix("");
        assert_eq!(builder.overrides.build_server_mode_env_var, None);
        assert_eq!(builder.overrides.environment_variables_prefix, None);
    }

    #[test]
    fn setters_record_overrides() {
        let builder = TestSettings::builder()
            .build_server_mode(Some(true))
            .build_server_mode_env_var("CI")
            .load_environment_variables(Some(false))
            .environment_variables_prefix("APP_")
            .load_development_file_in_build_server_mode(Some(true));
        assert_eq!(
            builder.overrides,
            DirectiveOverrides {
                build_server_mode: Some(true),
                build_server_mode_env_var: Some("CI".into()),
                load_environment_variables: Some(false),
                environment_variables_prefix: Some("APP_".into()),
                load_dev_in_build_server_mode: Some(true),
            }
        );
    }

    #[test]
    fn empty_file_names_rejected() {
        for (builder, parameter) in [
            (TestSettings::builder().base_file(""), "base_file"),
            (TestSettings::builder().development_file("  "), "development_file"),
            (TestSettings::builder().build_server_file("\t"), "build_server_file"),
        ] {
            match builder.load() {
                Err(TestSettingsError::EmptyFileName { parameter: p }) => assert_eq!(p, parameter),
                other => panic!("Expected EmptyFileName, got {other:?}"),
            }
        }
    }

    #[test]
    fn no_files_in_directory() {
        let dir = TempDir::new().unwrap();
        let config = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(false))
            .load()
            .unwrap();
        assert!(config.child_keys(None).is_empty());
        assert_eq!(config.source_count(), 0);
    }

    #[test]
    fn base_file_only() {
        let dir = TempDir::new().unwrap();
        write(&dir, "testsettings.json", r#"{"someValue": "Foo"}"#);
        let config = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(false))
            .load()
            .unwrap();
        assert_eq!(config.get("someValue"), Some("Foo"));
        assert_eq!(config.source_count(), 1);
    }

    #[test]
    fn development_wins_outside_build_server_mode() {
        let dir = three_files();
        let config = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(false))
            .load()
            .unwrap();
        assert_eq!(config.get("theValue"), Some("Bar"));
        assert_eq!(config.source_count(), 2);
    }

    #[test]
    fn build_file_wins_in_build_server_mode() {
        let dir = three_files();
        let config = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(true))
            .load()
            .unwrap();
        assert_eq!(config.get("theValue"), Some("Baz"));
        assert_eq!(config.source_count(), 2);
    }

    #[test]
    fn custom_file_names() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.json", r#"{"v": "a"}"#);
        write(&dir, "b.json", r#"{"v": "b"}"#);
        let config = TestSettings::builder()
            .directory(dir.path())
            .base_file("a.json")
            .development_file("b.json")
            .build_server_mode(Some(false))
            .load()
            .unwrap();
        assert_eq!(config.get("v"), Some("b"));
        assert_eq!(
            config.sources()[1],
            SourceDescriptor::File {
                kind: FileKind::Development,
                path: dir.path().join("b.json"),
            }
        );
    }

    #[test]
    fn malformed_file_is_surfaced() {
        let dir = TempDir::new().unwrap();
        write(&dir, "testsettings.Development.json", "{ not json");
        let result = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(true))
            .load();
        // Excluded from the final pass, but the bootstrap pass still reads it.
        assert!(matches!(result, Err(TestSettingsError::ParseError { .. })));
    }

    #[test]
    #[serial]
    fn process_env_vars_with_prefix() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "testsettings.json",
            r#"{
                "TestVariable": "FromFile",
                "testConfiguration": {
                    "loadEnvironmentVariables": true,
                    "environmentVariablesPrefix": "TESTSETTINGS_BUILDER_"
                }
            }"#,
        );
        temp_env::with_var("TESTSETTINGS_BUILDER_TestVariable", Some("Foo"), || {
            let config = TestSettings::builder()
                .directory(dir.path())
                .build_server_mode(Some(false))
                .load()
                .unwrap();
            assert_eq!(config.get("TestVariable"), Some("Foo"));
        });
    }

    #[test]
    #[serial]
    fn detection_variable_from_process_env() {
        let dir = three_files();
        temp_env::with_var("TESTSETTINGS_BUILDER_CI", Some(" true "), || {
            let config = TestSettings::builder()
                .directory(dir.path())
                .build_server_mode_env_var("TESTSETTINGS_BUILDER_CI")
                .load()
                .unwrap();
            assert!(config.build_server_mode());
            assert_eq!(config.get("theValue"), Some("Baz"));
        });
    }

    #[test]
    #[serial]
    fn explicit_mode_beats_process_env() {
        let dir = three_files();
        temp_env::with_var("TESTSETTINGS_BUILDER_CI", Some("1"), || {
            let config = TestSettings::builder()
                .directory(dir.path())
                .build_server_mode(Some(false))
                .build_server_mode_env_var("TESTSETTINGS_BUILDER_CI")
                .load()
                .unwrap();
            assert!(!config.build_server_mode());
            assert_eq!(config.get("theValue"), Some("Bar"));
        });
    }

    // --- handle tests ---

    #[test]
    fn handle_get() {
        let dir = three_files();
        let result = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(false))
            .handle(&SettingsAction::Get {
                key: "theValue".into(),
            })
            .unwrap();
        match result {
            SettingsResult::KeyValue { value, .. } => assert_eq!(value, "Bar"),
            other => panic!("Expected KeyValue, got {other:?}"),
        }
    }

    #[test]
    fn handle_get_missing_key() {
        let dir = three_files();
        let result = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(false))
            .handle(&SettingsAction::Get { key: "nope".into() });
        assert!(matches!(result, Err(TestSettingsError::KeyNotFound(_))));
    }

    #[test]
    fn handle_sources() {
        let dir = three_files();
        let result = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(true))
            .handle(&SettingsAction::Sources)
            .unwrap();
        match result {
            SettingsResult::Sources { sources } => {
                assert_eq!(sources.len(), 2);
                assert!(sources[1].contains("testsettings.Build.json"));
            }
            other => panic!("Expected Sources, got {other:?}"),
        }
    }

    #[test]
    fn handle_list() {
        let dir = three_files();
        let result = TestSettings::builder()
            .directory(dir.path())
            .build_server_mode(Some(false))
            .handle(&SettingsAction::List)
            .unwrap();
        assert_eq!(
            result,
            SettingsResult::Listing {
                entries: vec![("theValue".into(), "Bar".into())]
            }
        );
    }
}
