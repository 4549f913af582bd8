/// Build configuration entries from environment variables starting with `prefix`.
///
/// The prefix match ignores ASCII case, like keys do everywhere else in the
/// cascade. The prefix is stripped and a double underscore `__` in the rest
/// of the name becomes the `:` section separator, so `APP_Database__Url`
/// with prefix `APP_` yields `Database:Url`. An empty prefix imports every
/// variable. Variables whose name is exactly the prefix are skipped.
///
/// Takes an iterator so tests can pass synthetic data instead of the real
/// process environment.
pub fn env_to_entries<'a>(
    prefix: &str,
    vars: impl IntoIterator<Item = &'a (String, String)>,
) -> Vec<(String, String)> {
    let mut entries = Vec::new();

    for (name, value) in vars {
        let Some(rest) = strip_prefix_ignore_case(name, prefix) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        entries.push((rest.replace("__", ":"), value.clone()));
    }

    entries
}

/// Look up a single variable by exact name.
pub fn lookup<'a>(vars: &'a [(String, String)], name: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Snapshot the process environment. Variables that are not valid UTF-8 are
/// skipped rather than panicking.
pub fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if name.len() < prefix.len() || !name.is_char_boundary(prefix.len()) {
        return None;
    }
    let (head, rest) = name.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix).then_some(rest)
}
