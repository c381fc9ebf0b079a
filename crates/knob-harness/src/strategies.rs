//! Proptest strategies for raw values and fixture edits.

use knob_core::{Value, ValueKind};
use proptest::prelude::*;

use crate::fixtures::{DisplaySettings, WindowMode};

/// Any raw value, of any kind.
pub fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1_000..=1_000i64).prop_map(Value::Integer),
        (-2.0..2.0f64).prop_map(Value::Float),
        "[a-z]{0,10}".prop_map(Value::Text),
    ]
}

/// Raw values of `kind` only.
pub fn value_of(kind: ValueKind) -> BoxedStrategy<Value> {
    match kind {
        ValueKind::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        ValueKind::Integer => (-1_000..=1_000i64).prop_map(Value::Integer).boxed(),
        ValueKind::Float => (-2.0..2.0f64).prop_map(Value::Float).boxed(),
        ValueKind::Text => "[a-z]{0,10}".prop_map(Value::Text).boxed(),
    }
}

/// A single preview edit on [`DisplaySettings`], possibly out of range.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Fullscreen(bool),
    Volume(i32),
    Brightness(f64),
    WindowMode(WindowMode),
}

impl Edit {
    /// Stage the edit; returns whether the preview accepted it.
    pub fn apply(&self, display: &DisplaySettings) -> bool {
        match *self {
            Self::Fullscreen(v) => display.fullscreen.try_set_preview(v),
            Self::Volume(v) => display.volume.try_set_preview(v),
            Self::Brightness(v) => display.brightness.try_set_preview(v),
            Self::WindowMode(v) => display.window_mode.try_set_preview(v),
        }
    }
}

pub fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<bool>().prop_map(Edit::Fullscreen),
        (-50..=150i32).prop_map(Edit::Volume),
        (-0.5..1.5f64).prop_map(Edit::Brightness),
        prop::sample::select(WindowMode::ALL.to_vec()).prop_map(Edit::WindowMode),
    ]
}

pub fn edits(max: usize) -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(edit(), 0..max)
}
