//! Tagged field values and the ordered set-tracking field map.
//!
//! # Design
//! A field is "set" exactly when it has an entry in `Fields`; there is no
//! separate unset marker. `FieldValue::Null` is an explicit assignment of
//! JSON `null` and is serialized as such.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Value};

use crate::schema::FieldType;

/// An RFC 3339 instant together with the exact text it was read from.
///
/// The text is what goes back on the wire, so offsets such as `+00:00` and
/// short fractions such as `.5` are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    at: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn parse(text: &str) -> Option<Self> {
        let at = DateTime::parse_from_rfc3339(text).ok()?;
        Some(Self {
            raw: text.to_string(),
            at,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn at(&self) -> DateTime<FixedOffset> {
        self.at
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self {
            raw: format_timestamp(&at),
            at,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(Timestamp),
    Object(Fields),
    List(Vec<FieldValue>),
    /// A key the server returned that the schema does not declare.
    Raw(Value),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Object(_) => "object",
            FieldValue::List(_) => "list",
            FieldValue::Raw(_) => "raw",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            FieldValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FieldValue::Timestamp(t) => Some(t.at()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            FieldValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value as a path segment or query parameter.
    pub fn to_param(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(n) => Some(n.to_string()),
            FieldValue::Float(n) => Some(n.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Timestamp(t) => Some(t.as_str().to_string()),
            FieldValue::Raw(Value::String(s)) => Some(s.clone()),
            FieldValue::Raw(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Convert into JSON without any schema filtering.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Float(n) => Value::from(*n),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Timestamp(t) => Value::String(t.as_str().to_string()),
            FieldValue::Object(fields) => Value::Object(fields.to_json()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Raw(v) => v.clone(),
        }
    }

    /// Coerce the value into `ty` where the conversion is lossless:
    /// RFC 3339 strings become timestamps and integers widen to floats.
    /// Returns the value unchanged if no coercion applies.
    pub(crate) fn coerce(self, ty: &FieldType) -> FieldValue {
        match (self, ty) {
            (FieldValue::String(s), FieldType::Timestamp) => match Timestamp::parse(&s) {
                Some(t) => FieldValue::Timestamp(t),
                None => FieldValue::String(s),
            },
            (FieldValue::Integer(n), FieldType::Float) => FieldValue::Float(n as f64),
            (FieldValue::List(items), FieldType::List(inner)) => {
                FieldValue::List(items.into_iter().map(|v| v.coerce(inner)).collect())
            }
            (value, _) => value,
        }
    }

    /// Whether the value's shape matches `ty`. Nested object contents are
    /// checked separately against their own definition.
    pub(crate) fn matches(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (FieldValue::Null, _) => true,
            (FieldValue::String(_), FieldType::String) => true,
            (FieldValue::Integer(_), FieldType::Integer) => true,
            (FieldValue::Float(_), FieldType::Float) => true,
            (FieldValue::Boolean(_), FieldType::Boolean) => true,
            (FieldValue::Timestamp(_), FieldType::Timestamp) => true,
            (FieldValue::Object(_), FieldType::Object(_)) => true,
            (FieldValue::List(items), FieldType::List(inner)) => {
                items.iter().all(|item| item.matches(inner))
            }
            _ => false,
        }
    }
}

/// RFC 3339 with `Z` for UTC and only as many fractional digits as needed.
/// Used only for instants built in code; parsed text is kept as written.
pub fn format_timestamp(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n.into())
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Integer(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(t: DateTime<FixedOffset>) -> Self {
        FieldValue::Timestamp(t.into())
    }
}

impl From<Timestamp> for FieldValue {
    fn from(t: Timestamp) -> Self {
        FieldValue::Timestamp(t)
    }
}

impl From<Fields> for FieldValue {
    fn from(fields: Fields) -> Self {
        FieldValue::Object(fields)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Field name to value, in assignment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used for nested objects.
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or overwrite. Overwriting keeps the original position.
    pub fn insert(&mut self, name: String, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}
