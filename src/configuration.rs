use crate::directives::Directives;
use crate::flatten::join;
use crate::merge::SettingsMap;
use crate::types::SourceDescriptor;

/// The resolved settings: a case-insensitive `parent:child` key space plus
/// a record of which layers actually contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub(crate) values: SettingsMap,
    pub(crate) sources: Vec<SourceDescriptor>,
    pub(crate) directives: Directives,
    pub(crate) build_server_mode: bool,
}

impl Configuration {
    /// Look up a value by its full key, e.g. `"database:connectionString"`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key)
    }

    /// Immediate child segments below `prefix` (`None` for the top level).
    pub fn child_keys(&self, prefix: Option<&str>) -> Vec<String> {
        self.values.child_keys(prefix)
    }

    /// A view whose lookups are relative to `prefix`.
    pub fn section<'a>(&'a self, prefix: &str) -> Section<'a> {
        Section {
            configuration: self,
            prefix: prefix.to_string(),
        }
    }

    /// All resolved pairs, ordered by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Layers merged in the final pass, lowest priority first. Absent files
    /// are not listed.
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Directive values in effect after caller overrides.
    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn build_server_mode(&self) -> bool {
        self.build_server_mode
    }
}

/// Borrowed view of one section of a [`Configuration`].
#[derive(Debug, Clone)]
pub struct Section<'a> {
    configuration: &'a Configuration,
    prefix: String,
}

impl<'a> Section<'a> {
    pub fn path(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.configuration.values.get(&join(&self.prefix, key))
    }

    pub fn child_keys(&self) -> Vec<String> {
        self.configuration.child_keys(Some(self.prefix.as_str()))
    }

    pub fn section(&self, key: &str) -> Section<'a> {
        Section {
            configuration: self.configuration,
            prefix: join(&self.prefix, key),
        }
    }

    /// Whether the section holds any keys at all.
    pub fn exists(&self) -> bool {
        self.configuration.values.has_children(&self.prefix)
    }
}
