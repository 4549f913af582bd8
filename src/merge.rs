use std::collections::BTreeMap;

use crate::flatten::KEY_DELIMITER;

/// Flat, case-insensitive store of hierarchical `parent:child` keys.
///
/// Sections exist only through key prefixes: `testConfiguration` is a
/// section because `testConfiguration:loadEnvironmentVariables` is a key.
/// The casing of the most recent write is kept for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsMap {
    entries: BTreeMap<String, (String, String)>,
}

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value, replacing any existing value under the same key
    /// regardless of case.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.entries.insert(normalize(&key), (key, value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All `(key, value)` pairs ordered by case-insensitive key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct immediate child segments below `prefix`, ordered
    /// case-insensitively. `None` or an empty prefix lists the top level.
    pub fn child_keys(&self, prefix: Option<&str>) -> Vec<String> {
        let prefix_segments: Vec<String> = match prefix {
            Some(p) if !p.is_empty() => p.split(KEY_DELIMITER).map(normalize).collect(),
            _ => Vec::new(),
        };

        let mut children: BTreeMap<String, String> = BTreeMap::new();
        for (original, _) in self.entries.values() {
            let segments: Vec<&str> = original.split(KEY_DELIMITER).collect();
            if segments.len() <= prefix_segments.len() {
                continue;
            }
            let under_prefix = segments
                .iter()
                .zip(&prefix_segments)
                .all(|(seg, want)| normalize(seg) == *want);
            if under_prefix {
                let child = segments[prefix_segments.len()];
                children
                    .entry(normalize(child))
                    .or_insert_with(|| child.to_string());
            }
        }
        children.into_values().collect()
    }

    /// Whether any key lies strictly below `prefix`.
    pub fn has_children(&self, prefix: &str) -> bool {
        !self.child_keys(Some(prefix)).is_empty()
    }

    fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

/// Merge layers in order: every pair of a later layer overwrites the same
/// key from earlier layers. Order is the only conflict-resolution rule.
pub fn merge<I, L>(layers: I) -> SettingsMap
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = (String, String)>,
{
    let mut merged = SettingsMap::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged
}
