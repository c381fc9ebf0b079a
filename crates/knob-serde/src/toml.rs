//! TOML codec.
//!
//! Mirrors [`json`](crate::json) for TOML tables. TOML has no null, and its
//! root is always a table, so only per-key kind errors can occur while
//! decoding a well-formed document.

use ::toml::{Table, Value as Toml};
use knob_core::{Definition, Value, ValueKind, ValueMap};

use crate::error::CodecError;

/// Encode a snapshot as a TOML table.
pub fn encode(values: &ValueMap) -> Result<Table, CodecError> {
    Ok(Table::try_from(values)?)
}

/// Encode a snapshot as a TOML document.
pub fn to_string(values: &ValueMap) -> Result<String, CodecError> {
    Ok(::toml::to_string(&encode(values)?)?)
}

/// Decode `source` against `definition`.
pub fn decode(definition: &Definition, source: &str) -> Result<ValueMap, CodecError> {
    let table: Table = ::toml::from_str(source)?;
    decode_table(definition, &table)
}

/// Decode an already parsed table against `definition`.
pub fn decode_table(definition: &Definition, table: &Table) -> Result<ValueMap, CodecError> {
    let mut values = ValueMap::new();
    for (name, raw) in table {
        let Some(&kind) = definition.get(name) else {
            tracing::debug!(key = %name, "skipping undeclared key");
            continue;
        };
        values.insert(name.clone(), convert(name, kind, raw)?);
    }
    tracing::debug!(decoded = values.len(), "decoded TOML snapshot");
    Ok(values)
}

fn convert(name: &str, kind: ValueKind, raw: &Toml) -> Result<Value, CodecError> {
    let value = match (kind, raw) {
        (ValueKind::Bool, Toml::Boolean(b)) => Some(Value::Bool(*b)),
        (ValueKind::Integer, Toml::Integer(i)) => Some(Value::Integer(*i)),
        (ValueKind::Float, Toml::Float(f)) => Some(Value::Float(*f)),
        (ValueKind::Float, Toml::Integer(i)) => Some(Value::Float(*i as f64)),
        (ValueKind::Text, Toml::String(s)) => Some(Value::Text(s.clone())),
        _ => None,
    };
    value.ok_or_else(|| CodecError::Kind {
        name: name.to_owned(),
        expected: kind,
        found: raw.type_str(),
    })
}
