// File: src/value.rs
// Purpose: Call-time values substituted into paths and serialized into query strings

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Largest integer an `f64` represents exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A value supplied when formatting a URL
///
/// Path parameters are normally primitives; query values may nest arrays and
/// objects, which are rendered as compact JSON text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Values),
}

impl Value {
    /// Canonical textual form used for path segments and query values
    ///
    /// ```
    /// use rhtmx_paths::{values, Value};
    ///
    /// assert_eq!(Value::from(42).to_text(), "42");
    /// assert_eq!(Value::Null.to_text(), "null");
    /// assert_eq!(Value::from(vec![Value::from("a"), Value::from(1)]).to_text(), r#"["a",1]"#);
    /// assert_eq!(Value::from(values! { "role" => "admin" }).to_text(), r#"{"role":"admin"}"#);
    /// ```
    pub fn to_text(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Date(d) => format_date(d),
            Value::Array(_) | Value::Object(_) => {
                // Serialize impl below never fails
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Whether this value is a mapping of further values
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }
}

/// Formats a number the way JavaScript's `String(n)` does
///
/// Plain decimals for `1e-6 <= |n| < 1e21`, exponent notation with an
/// explicit sign outside that range (`1e+21`, `1.5e-7`).
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // covers -0
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&format_date(d)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(values) => {
                // Undefined members are dropped, as JSON has no such value
                let defined = values
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined));
                let mut map = serializer.serialize_map(Some(defined.clone().count()))?;
                for (key, value) in defined {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Insertion-ordered mapping of keys to values
///
/// Order matters: query pairs are emitted in the order keys were inserted.
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Values::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value, replacing any existing value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + Clone {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (key, value) in iter {
            values.insert(key, value);
        }
        values
    }
}

impl IntoIterator for Values {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Builds a [`Values`] mapping
///
/// ```
/// use rhtmx_paths::values;
///
/// let v = values! { "id" => 42, "slug" => "hello" };
/// assert_eq!(v.len(), 2);
/// assert_eq!(v.keys().collect::<Vec<_>>(), vec!["id", "slug"]);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        $crate::Values::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut values = $crate::Values::new();
        $( values.insert($key, $value); )+
        values
    }};
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Values> for Value {
    fn from(values: Values) -> Self {
        Value::Object(values)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.into(),
            serde_json::Value::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}

// ============================================================================
// Path arguments
// ============================================================================

/// Path parameter input: a per-key mapping or one scalar
///
/// A scalar is broadcast to every parameter slot of the route, which makes
/// single-parameter routes callable as `leaf.with_path(42)`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathArgs {
    Map(Values),
    Scalar(Value),
}

impl From<Values> for PathArgs {
    fn from(values: Values) -> Self {
        PathArgs::Map(values)
    }
}

impl From<Value> for PathArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(values) => PathArgs::Map(values),
            other => PathArgs::Scalar(other),
        }
    }
}

macro_rules! impl_scalar_args {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathArgs {
                fn from(v: $t) -> Self {
                    PathArgs::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_scalar_args!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, &str,
    DateTime<Utc>
);
