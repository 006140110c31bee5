//! Flat key/value mappings used as request payloads and template data.
//!
//! # Design
//! `Payload` keeps entries in insertion order so serialized querystrings and
//! template substitution are deterministic. Values are `Primitive`s only; a
//! nested JSON value is rejected rather than flattened.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::ClientError;

/// A scalar payload value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Null => f.write_str("null"),
            Primitive::Bool(b) => write!(f, "{b}"),
            Primitive::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() => write_float(f, x),
                _ => write!(f, "{n}"),
            },
            Primitive::String(s) => f.write_str(s),
        }
    }
}

/// Shortest round-trip digits, positional between 1e-6 and 1e21 and
/// exponential (`1e+21`, `1e-7`) outside it.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x == 0.0 {
        return f.write_str("0");
    }
    let magnitude = x.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{x}");
    }
    let text = format!("{x:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&text),
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::String(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::String(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

impl From<i32> for Primitive {
    fn from(value: i32) -> Self {
        Primitive::Number(value.into())
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Number(value.into())
    }
}

impl From<u64> for Primitive {
    fn from(value: u64) -> Self {
        Primitive::Number(value.into())
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Primitive::Number(n),
            None if value.is_nan() => Primitive::String("NaN".to_string()),
            None if value > 0.0 => Primitive::String("Infinity".to_string()),
            None => Primitive::String("-Infinity".to_string()),
        }
    }
}

impl TryFrom<Value> for Primitive {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Primitive::Null),
            Value::Bool(b) => Ok(Primitive::Bool(b)),
            Value::Number(n) => Ok(Primitive::Number(n)),
            Value::String(s) => Ok(Primitive::String(s)),
            Value::Array(_) | Value::Object(_) => Err(ClientError::InvalidArgument(
                "nested values are not supported in a flat payload".to_string(),
            )),
        }
    }
}

/// An ordered, flat string → `Primitive` mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    entries: Vec<(String, Primitive)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Primitive>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Primitive>) -> Option<Primitive> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Primitive> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Primitive)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Primitive>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Payload::new();
        for (k, v) in iter {
            payload.insert(k, v);
        }
        payload
    }
}

impl TryFrom<Value> for Payload {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ClientError::InvalidArgument(
                "payload must be a JSON object".to_string(),
            ));
        };
        let mut payload = Payload::new();
        for (k, v) in map {
            payload.insert(k, Primitive::try_from(v)?);
        }
        Ok(payload)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = Payload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat map of scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Payload, A::Error> {
                let mut payload = Payload::new();
                while let Some((key, value)) = access.next_entry::<String, Primitive>()? {
                    payload.insert(key, value);
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}
