//! Flatten a parsed JSON document into `parent:child` key/value pairs.
//!
//! A pre-order walk over the object tree: objects recurse with `:` between
//! segments, arrays use the element index as the segment, and scalars are
//! emitted as strings. `null` becomes an empty value. Empty objects and
//! arrays emit nothing.

use serde_json::Value;

/// Separator between the segments of a hierarchical key.
pub const KEY_DELIMITER: char = ':';

/// Flatten a JSON value into ordered `(key, value)` pairs.
///
/// `{"database": {"url": "pg://"}, "ports": [80, 443]}` →
/// `[("database:url", "pg://"), ("ports:0", "80"), ("ports:1", "443")]`
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    walk(value, String::new(), &mut out);
    out
}

fn walk(value: &Value, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, join(&prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, join(&prefix, &index.to_string()), out);
            }
        }
        Value::Null => out.push((prefix, String::new())),
        Value::Bool(b) => out.push((prefix, b.to_string())),
        Value::Number(n) => out.push((prefix, n.to_string())),
        Value::String(s) => out.push((prefix, s.clone())),
    }
}

/// Join two key segments, treating an empty prefix as the root.
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{KEY_DELIMITER}{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(value: Value) -> Vec<(String, String)> {
        flatten(&value)
    }

    #[test]
    fn flat_object() {
        let out = pairs(json!({"someValue": "Foo"}));
        assert_eq!(out, vec![("someValue".to_string(), "Foo".to_string())]);
    }

    #[test]
    fn nested_object_uses_colon_paths() {
        let out = pairs(json!({
            "testConfiguration": {"loadEnvironmentVariables": true}
        }));
        assert_eq!(
            out,
            vec![(
                "testConfiguration:loadEnvironmentVariables".to_string(),
                "true".to_string()
            )]
        );
    }

    #[test]
    fn arrays_use_index_segments() {
        let out = pairs(json!({"hosts": ["a", "b"]}));
        assert_eq!(
            out,
            vec![
                ("hosts:0".to_string(), "a".to_string()),
                ("hosts:1".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn scalars_are_stringified() {
        let out = pairs(json!({"port": 8080, "rate": 1.5, "debug": false, "none": null}));
        let get = |k: &str| out.iter().find(|(key, _)| key == k).unwrap().1.clone();
        assert_eq!(get("port"), "8080");
        assert_eq!(get("rate"), "1.5");
        assert_eq!(get("debug"), "false");
        assert_eq!(get("none"), "");
    }

    #[test]
    fn empty_containers_emit_nothing() {
        let out = pairs(json!({"section": {}, "list": []}));
        assert!(out.is_empty());
    }

    #[test]
    fn array_of_objects() {
        let out = pairs(json!({"servers": [{"name": "x"}]}));
        assert_eq!(out, vec![("servers:0:name".to_string(), "x".to_string())]);
    }
}
