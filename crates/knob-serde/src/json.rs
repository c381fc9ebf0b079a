//! JSON codec.
//!
//! A snapshot is written as a flat object of name → scalar. Decoding is
//! driven by a [`Definition`]: only declared names are read, and each value
//! is converted to the kind its setting declares.
//!
//! # Invariants
//!
//! 1. Keys absent from the definition are skipped, never an error.
//! 2. `null` values are skipped; the setting keeps its preview.
//! 3. When a key repeats, the later value wins.
//! 4. Integers are accepted where a float is declared; the reverse is an
//!    error.
//!
//! ```
//! use knob_core::{Definition, Value, ValueKind};
//!
//! let mut definition = Definition::new();
//! definition.insert("Volume".into(), ValueKind::Integer);
//! definition.insert("Brightness".into(), ValueKind::Float);
//!
//! let decoded = knob_serde::json::decode(
//!     &definition,
//!     r#"{ "Volume": 75, "Brightness": 1, "Stale": true }"#,
//! )
//! .unwrap();
//! assert_eq!(decoded["Volume"], Value::Integer(75));
//! assert_eq!(decoded["Brightness"], Value::Float(1.0));
//! assert!(!decoded.contains_key("Stale"));
//! ```

use knob_core::{Definition, Value, ValueKind, ValueMap};
use serde_json::{Map, Number, Value as Json};

use crate::error::CodecError;

/// Encode a snapshot as a JSON object.
///
/// Fails with [`CodecError::NonFinite`] on NaN or infinite floats.
pub fn encode(values: &ValueMap) -> Result<Json, CodecError> {
    let mut object = Map::with_capacity(values.len());
    for (name, value) in values {
        let json = match value {
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(i) => Json::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| CodecError::NonFinite { name: name.clone() })?,
            Value::Text(s) => Json::String(s.clone()),
        };
        object.insert(name.clone(), json);
    }
    Ok(Json::Object(object))
}

/// Encode a snapshot as an indented JSON document.
pub fn to_string_pretty(values: &ValueMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&encode(values)?)?)
}

/// Decode `source` against `definition`.
pub fn decode(definition: &Definition, source: &str) -> Result<ValueMap, CodecError> {
    let document: Json = serde_json::from_str(source)?;
    decode_value(definition, &document)
}

/// Decode an already parsed document against `definition`.
pub fn decode_value(definition: &Definition, document: &Json) -> Result<ValueMap, CodecError> {
    let Json::Object(object) = document else {
        return Err(CodecError::NotAnObject {
            found: describe(document),
        });
    };

    let mut values = ValueMap::new();
    for (name, raw) in object {
        let Some(&kind) = definition.get(name) else {
            tracing::debug!(key = %name, "skipping undeclared key");
            continue;
        };
        if raw.is_null() {
            tracing::trace!(setting = %name, "skipping null value");
            continue;
        }
        values.insert(name.clone(), convert(name, kind, raw)?);
    }
    tracing::debug!(decoded = values.len(), "decoded JSON snapshot");
    Ok(values)
}

fn convert(name: &str, kind: ValueKind, raw: &Json) -> Result<Value, CodecError> {
    let value = match (kind, raw) {
        (ValueKind::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
        (ValueKind::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (ValueKind::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (ValueKind::Text, Json::String(s)) => Some(Value::Text(s.clone())),
        _ => None,
    };
    value.ok_or_else(|| CodecError::Kind {
        name: name.to_owned(),
        expected: kind,
        found: describe(raw),
    })
}

fn describe(raw: &Json) -> &'static str {
    match raw {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Json::Number(_) => "float",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
