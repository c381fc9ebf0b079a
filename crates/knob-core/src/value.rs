//! Dynamic value model shared by renderers, definers and codecs.
//!
//! Concrete settings are strongly typed (`Setting<S>` stores `S::Value`), but
//! anything crossing a name-keyed boundary goes through [`Value`], tagged by
//! the [`ValueKind`] each preview declares.
//!
//! # Invariants
//!
//! 1. `T::from_value(&t.into_value()) == Some(t)` for every [`SettingData`]
//!    implementation in this module.
//! 2. `t.into_value().kind() == T::KIND`.
//! 3. Conversions never truncate: an out-of-range integer is a mismatch,
//!    not a wrapped value, and a finite float too large for `f32` is a
//!    mismatch, not an infinity.

use core::fmt;
use std::collections::BTreeMap;

/// Name → value snapshot produced by a [`Renderer`](crate::Renderer) and
/// consumed by a [`Definer`](crate::Definer).
pub type ValueMap = BTreeMap<String, Value>;

/// Name → declared kind mapping exposed by a [`Definer`](crate::Definer).
pub type Definition = BTreeMap<String, ValueKind>;

/// Type tag of a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A dynamically typed setting value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// The kind tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view; integers widen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A concrete type that can be managed as a setting value.
///
/// Implemented for the primitive types below. User enums implement it by
/// mapping variants onto [`Value::Text`] (or [`Value::Integer`]):
///
/// ```
/// use knob_core::{SettingData, Value, ValueKind};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Quality { Low, High }
///
/// impl SettingData for Quality {
///     const KIND: ValueKind = ValueKind::Text;
///
///     fn into_value(self) -> Value {
///         match self {
///             Self::Low => "low".into(),
///             Self::High => "high".into(),
///         }
///     }
///
///     fn from_value(value: &Value) -> Option<Self> {
///         match value.as_text()? {
///             "low" => Some(Self::Low),
///             "high" => Some(Self::High),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Quality::from_value(&Quality::High.into_value()), Some(Quality::High));
/// ```
pub trait SettingData: Clone + PartialEq + fmt::Debug + 'static {
    /// Kind tag reported through [`PreviewSource::value_kind`](crate::PreviewSource::value_kind).
    const KIND: ValueKind;

    /// Convert into the dynamic representation.
    fn into_value(self) -> Value;

    /// Convert back from the dynamic representation, or `None` when the
    /// raw value cannot represent `Self`.
    fn from_value(value: &Value) -> Option<Self>;
}

impl SettingData for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

macro_rules! integer_data {
    ($($t:ty),* $(,)?) => {
        $(
            impl SettingData for $t {
                const KIND: ValueKind = ValueKind::Integer;

                fn into_value(self) -> Value {
                    Value::Integer(i64::from(self))
                }

                fn from_value(value: &Value) -> Option<Self> {
                    value.as_integer().and_then(|i| <$t>::try_from(i).ok())
                }
            }
        )*
    };
}

integer_data!(i8, i16, i32, i64, u8, u16, u32);

impl SettingData for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl SettingData for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }

    /// Finite values outside the `f32` range are rejected rather than
    /// rounded to infinity.
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        let wide = value.as_float()?;
        let narrow = wide as f32;
        (narrow.is_finite() || !wide.is_finite()).then_some(narrow)
    }
}

impl SettingData for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Integer(3).kind(), ValueKind::Integer);
        assert_eq!(Value::Float(0.5).kind(), ValueKind::Float);
        assert_eq!(Value::from("x").kind(), ValueKind::Text);
    }

    #[test]
    fn integer_out_of_range_is_rejected() {
        assert_eq!(u8::from_value(&Value::Integer(255)), Some(255));
        assert_eq!(u8::from_value(&Value::Integer(256)), None);
        assert_eq!(u8::from_value(&Value::Integer(-1)), None);
        assert_eq!(i32::from_value(&Value::Integer(i64::MAX)), None);
    }

    #[test]
    fn integer_widens_to_float() {
        assert_eq!(f64::from_value(&Value::Integer(2)), Some(2.0));
        assert_eq!(f32::from_value(&Value::Integer(2)), Some(2.0));
    }

    #[test]
    fn f32_rejects_finite_values_beyond_its_range() {
        assert_eq!(f32::from_value(&Value::Float(1e300)), None);
        assert_eq!(f32::from_value(&Value::Float(-1e300)), None);
        assert_eq!(f32::from_value(&Value::Float(0.5)), Some(0.5));
        assert_eq!(f32::from_value(&Value::Float(f64::INFINITY)), Some(f32::INFINITY));
        assert!(f32::from_value(&Value::Float(f64::NAN)).is_some_and(f32::is_nan));
    }

    #[test]
    fn float_does_not_narrow_to_integer() {
        assert_eq!(i32::from_value(&Value::Float(2.0)), None);
    }

    #[test]
    fn wrong_variant_is_rejected() {
        assert_eq!(bool::from_value(&Value::Integer(1)), None);
        assert_eq!(String::from_value(&Value::Bool(false)), None);
    }

    #[test]
    fn declared_kind_matches_converted_kind() {
        assert_eq!(true.into_value().kind(), bool::KIND);
        assert_eq!(7u16.into_value().kind(), u16::KIND);
        assert_eq!(0.25f32.into_value().kind(), f32::KIND);
        assert_eq!(String::from("a").into_value().kind(), String::KIND);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Integer(75).to_string(), "75");
        assert_eq!(Value::Float(0.8).to_string(), "0.8");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(ValueKind::Float.to_string(), "float");
    }
}
