//! Query-string encoding for GET arguments.
//!
//! Follows the bracket conventions the Front API (and PHP's
//! `http_build_query`) understands: nested objects become `a[b]=c`, arrays
//! become `a[0]=c`, booleans encode as `1`/`0`, and nulls are skipped.
//! Keys and values are percent-encoded, spaces as `%20`.

use serde_json::Value;

/// Encode `args` as a query string without the leading `?`.
///
/// Only objects and arrays produce pairs; a bare scalar has no key to hang
/// on and yields an empty string.
pub fn build_query(args: &Value) -> String {
    let mut pairs = Vec::new();
    match args {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(key.clone(), value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(index.to_string(), value, &mut pairs);
            }
        }
        _ => {}
    }

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((prefix, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => out.push((prefix, n.to_string())),
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{prefix}[{index}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten(format!("{prefix}[{key}]"), item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_object() {
        assert_eq!(build_query(&json!({"limit": 10, "q": "open"})), "limit=10&q=open");
    }

    #[test]
    fn nested_keys_use_brackets() {
        let query = build_query(&json!({"q": {"statuses": ["archived", "open"]}}));
        assert_eq!(query, "q%5Bstatuses%5D%5B0%5D=archived&q%5Bstatuses%5D%5B1%5D=open");
    }

    #[test]
    fn booleans_and_nulls() {
        assert_eq!(build_query(&json!({"a": true, "b": false, "c": null})), "a=1&b=0");
    }

    #[test]
    fn values_are_percent_encoded() {
        assert_eq!(build_query(&json!({"name": "Jane Doe&co"})), "name=Jane%20Doe%26co");
    }

    #[test]
    fn empty_and_scalar_args_yield_nothing() {
        assert_eq!(build_query(&json!({})), "");
        assert_eq!(build_query(&json!("bare")), "");
    }
}
