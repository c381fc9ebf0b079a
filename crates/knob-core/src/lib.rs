#![forbid(unsafe_code)]

//! Two-phase preview/commit settings for knob.
//!
//! Every setting has a validated *preview* that callers edit freely and a
//! *committed* value that only moves when its single owner applies the
//! preview. This crate provides:
//! - [`Setting`] and [`SettingKind`] for typed, validated previews
//! - [`Mediator`], the one-shot apply/discard capability
//! - [`Manager`] for batch apply/discard with a single `Modified` notification
//! - [`Renderer`] and [`Reporter`] for name → value snapshots of committed state
//! - [`Definer`] for name-keyed input onto previews
//! - [`SettingSet`] and [`SettingsBundle`] for wiring those together
//!
//! Everything is single-threaded (`Rc`/`RefCell`); notifications are
//! delivered synchronously before the triggering call returns.

pub mod bundle;
pub mod config;
pub mod define;
pub mod error;
pub mod manager;
pub mod mediator;
pub mod name;
pub mod registry;
pub mod render;
pub mod setting;
pub mod signal;
pub mod value;

pub use bundle::SettingsBundle;
pub use config::{DuplicatePolicy, KnobConfig};
pub use define::Definer;
#[cfg(feature = "policy-config")]
pub use error::ConfigError;
pub use error::{Result, SettingError};
pub use manager::{Manager, SettingEntry, SettingsView};
pub use mediator::Mediator;
pub use name::{CONVENTIONAL_SUFFIXES, derive_name};
pub use registry::{SettingSet, SettingSetBuilder};
pub use render::{Renderer, Reporter};
pub use setting::{CommitSource, PreviewSource, Setting, SettingKind};
pub use signal::{Signal, Subscription};
pub use value::{Definition, SettingData, Value, ValueKind, ValueMap};
