use std::fmt;
use std::path::PathBuf;

/// Default name of the committed base settings file.
pub const DEFAULT_BASE_FILE: &str = "testsettings.json";
/// Default name of the uncommitted, developer-local override file.
pub const DEFAULT_DEVELOPMENT_FILE: &str = "testsettings.Development.json";
/// Default name of the build-server override file.
pub const DEFAULT_BUILD_SERVER_FILE: &str = "testsettings.Build.json";

/// The three settings files, in the order the bootstrap pass reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Base,
    Development,
    BuildServer,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Base => write!(f, "base"),
            FileKind::Development => write!(f, "development"),
            FileKind::BuildServer => write!(f, "build server"),
        }
    }
}

/// One layer of the cascade. Every source is optional: an absent file
/// contributes nothing and is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    File { kind: FileKind, path: PathBuf },
    /// Process environment variables starting with `prefix` (stripped).
    /// An empty prefix imports every variable.
    EnvironmentVariables { prefix: String },
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDescriptor::File { kind, path } => {
                write!(f, "{kind} file {}", path.display())
            }
            SourceDescriptor::EnvironmentVariables { prefix } if prefix.is_empty() => {
                write!(f, "environment variables")
            }
            SourceDescriptor::EnvironmentVariables { prefix } => {
                write!(f, "environment variables with prefix '{prefix}'")
            }
        }
    }
}

/// A settings operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    List,
    Get { key: String },
    Sources,
}
