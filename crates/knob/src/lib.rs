#![forbid(unsafe_code)]

//! Two-phase preview/commit settings.
//!
//! Callers stage values on validated previews; a [`Manager`] commits or
//! discards the whole batch and notifies observers once per effective
//! apply. Snapshots cross the external boundary as name → [`Value`] maps.
//!
//! ```
//! use knob::prelude::*;
//!
//! knob::setting_kind!(FullscreenSetting: bool = false);
//! knob::setting_kind!(VolumeSetting: i32 = 50, |v| (0..=100).contains(v));
//!
//! let fullscreen = Setting::<FullscreenSetting>::new();
//! let volume = Setting::<VolumeSetting>::new();
//! let manager = knob::setting_set![fullscreen, volume]
//!     .and_then(SettingSet::into_manager)
//!     .unwrap();
//!
//! fullscreen.set_preview(true).unwrap();
//! volume.set_preview(75).unwrap();
//! assert!(manager.apply_preview());
//!
//! let snapshot = Renderer::new(&manager).render();
//! assert_eq!(snapshot["Volume"], Value::Integer(75));
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `json` | yes | [`json`] codec |
//! | `toml` | no | [`toml`] codec |
//! | `policy-config` | no | `KnobConfig::from_toml_str` / `from_json_str` |

pub use knob_core::*;

#[cfg(feature = "json")]
pub use knob_serde::json;
#[cfg(feature = "toml")]
pub use knob_serde::toml;
#[cfg(any(feature = "json", feature = "toml"))]
pub use knob_serde::CodecError;

/// Everything needed to declare, wire and observe settings.
pub mod prelude {
    pub use knob_core::{
        Definer, KnobConfig, Manager, Renderer, Reporter, Setting, SettingError, SettingKind,
        SettingSet, SettingsBundle, Subscription, Value, ValueKind, ValueMap,
    };
}
