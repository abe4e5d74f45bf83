// File: src/query.rs
// Purpose: Query-string declaration parsing and serialization

use crate::error::{PathError, Result};
use crate::value::Values;

/// Delimiter that starts the query half of a template
pub const QUERY_DELIMITER: char = '?';

/// Splits a template into its path half and optional query declaration
///
/// ```
/// use rhtmx_paths::query::split_template;
///
/// assert_eq!(split_template("/search?q={}&page={}"), ("/search", Some("q={}&page={}")));
/// assert_eq!(split_template("/users/:id"), ("/users/:id", None));
/// ```
pub fn split_template(template: &str) -> (&str, Option<&str>) {
    match template.split_once(QUERY_DELIMITER) {
        Some((path, query)) => (path, Some(query)),
        None => (template, None),
    }
}

/// Declared query keys, in order, without duplicates
///
/// Accepts `key={}` pairs as well as bare keys; placeholder values are ignored.
///
/// ```
/// use rhtmx_paths::query::parse_query_keys;
///
/// assert_eq!(parse_query_keys("q={}&page={}"), vec!["q", "page"]);
/// assert_eq!(parse_query_keys("a&b=&a"), vec!["a", "b"]);
/// assert!(parse_query_keys("").is_empty());
/// ```
pub fn parse_query_keys(declaration: &str) -> Vec<String> {
    declaration
        .split('&')
        .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key).trim())
        .filter(|key| !key.is_empty())
        .fold(Vec::new(), |mut keys: Vec<String>, key| {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
            keys
        })
}

/// Serializes search values into `?a=..&b=..`
///
/// Returns an empty string (no `?`) when `values` is absent or empty.
/// Pairs follow the mapping's insertion order; each value is rendered with
/// [`Value::to_text`](crate::Value::to_text): dates as ISO-8601, arrays and
/// objects as compact JSON, everything else as plain text.
///
/// ```
/// use rhtmx_paths::query::serialize;
/// use rhtmx_paths::{values, Value};
///
/// let v = values! { "q" => "foo", "tags" => vec![Value::from("a"), Value::from(1)] };
/// assert_eq!(serialize(Some(&v), false), r#"?q=foo&tags=["a",1]"#);
/// assert_eq!(serialize(None, false), "");
/// ```
pub fn serialize(values: Option<&Values>, encode: bool) -> String {
    let Some(values) = values.filter(|v| !v.is_empty()) else {
        return String::new();
    };

    let pairs: Vec<String> = values
        .iter()
        .map(|(key, value)| {
            let text = value.to_text();
            if encode {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(&text))
            } else {
                format!("{}={}", key, text)
            }
        })
        .collect();

    format!("{}{}", QUERY_DELIMITER, pairs.join("&"))
}

/// Checks that the supplied keys match the declared keys exactly
///
/// Order does not matter; count and names do.
pub fn check_keys(values: &Values, expected: &[String], route: &str) -> Result<()> {
    let matches = values.len() == expected.len()
        && values.keys().all(|key| expected.iter().any(|e| e == key));

    if matches {
        Ok(())
    } else {
        Err(PathError::QueryKeyMismatch {
            route: route.to_string(),
            expected: expected.to_vec(),
            found: values.keys().map(str::to_string).collect(),
        })
    }
}

/// Serializes search values, enforcing declared keys when `strict`
///
/// The key check only runs when the route declares query keys and values
/// were supplied.
pub fn serialize_checked(
    values: Option<&Values>,
    expected: &[String],
    strict: bool,
    encode: bool,
    route: &str,
) -> Result<String> {
    if let Some(values) = values {
        if strict && !expected.is_empty() {
            check_keys(values, expected, route)?;
        }
    }
    Ok(serialize(values, encode))
}
