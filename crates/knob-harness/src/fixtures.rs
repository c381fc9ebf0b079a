//! Reference display-settings panel.
//!
//! | Name | Type | Default | Valid |
//! |------|------|---------|-------|
//! | `Fullscreen` | `bool` | `false` | any |
//! | `Volume` | `i32` | `50` | `0..=100` |
//! | `Brightness` | `f64` | `0.8` | finite, `0.0..=1.0` |
//! | `WindowMode` | [`WindowMode`] | `Windowed` | any |

use std::fmt;

use knob_core::{Result, Setting, SettingData, SettingSet, Value, ValueKind};

knob_core::setting_kind! {
    /// Whether the window covers the whole screen.
    pub FullscreenSetting: bool = false
}

knob_core::setting_kind! {
    /// Master volume in percent.
    pub VolumeSetting: i32 = 50, |v| (0..=100).contains(v)
}

knob_core::setting_kind! {
    /// Screen brightness as a fraction.
    pub BrightnessSetting: f64 = 0.8, |v| v.is_finite() && (0.0..=1.0).contains(v)
}

knob_core::setting_kind! {
    pub WindowModePreview: WindowMode = WindowMode::Windowed
}

/// Window presentation, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    #[default]
    Windowed,
    Borderless,
    Exclusive,
}

impl WindowMode {
    pub const ALL: [Self; 3] = [Self::Windowed, Self::Borderless, Self::Exclusive];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windowed => "windowed",
            Self::Borderless => "borderless",
            Self::Exclusive => "exclusive",
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SettingData for WindowMode {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self.as_str().to_owned())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let text = value.as_text()?;
        Self::ALL.into_iter().find(|mode| mode.as_str() == text)
    }
}

/// One handle per fixture setting.
#[derive(Debug, Clone, Default)]
pub struct DisplaySettings {
    pub fullscreen: Setting<FullscreenSetting>,
    pub volume: Setting<VolumeSetting>,
    pub brightness: Setting<BrightnessSetting>,
    pub window_mode: Setting<WindowModePreview>,
}

impl DisplaySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fullscreen, volume and brightness, in that order.
    pub fn core_set(&self) -> Result<SettingSet> {
        knob_core::setting_set![self.fullscreen, self.volume, self.brightness]
    }

    /// All four settings, window mode last.
    pub fn set(&self) -> Result<SettingSet> {
        knob_core::setting_set![
            self.fullscreen,
            self.volume,
            self.brightness,
            self.window_mode
        ]
    }
}
