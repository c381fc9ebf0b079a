//! Error taxonomy for the preview/commit core.
//!
//! Every variant is a contract violation surfaced to the immediate caller.
//! Nothing in this crate retries or swallows these errors; batch operations
//! that must continue past a failing entry report an aggregate `bool`
//! instead (see [`Definer::try_define`](crate::Definer::try_define)).
//!
//! # Failure Modes
//!
//! | Error | Raised by | Recoverable |
//! |-------|-----------|-------------|
//! | `Validation` | `set_preview`, `define` | yes, pick another value |
//! | `TypeMismatch` | `set_preview_value`, `define` | yes, fix the input |
//! | `NotActive` | reading a committed value before activation | no |
//! | `AlreadyActivated` | second `activate`, manager construction | no |
//! | `BindingMismatch` | `Reporter::with_renderer` | no |
//! | `DuplicateName` | manager, definer and set construction | no |

use crate::value::ValueKind;

/// Result alias used throughout `knob-core`.
pub type Result<T, E = SettingError> = std::result::Result<T, E>;

/// Errors raised by settings, managers and their collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingError {
    /// A staged or assigned value failed the setting's validator.
    #[error("value {value} is out of range for setting '{name}'")]
    Validation {
        /// Setting name.
        name: String,
        /// Debug rendering of the rejected value.
        value: String,
    },

    /// The committed value was read before the setting was activated.
    #[error("setting '{name}' has to be activated before its value can be read")]
    NotActive {
        /// Setting name.
        name: String,
    },

    /// A setting was activated twice, usually because two managers were
    /// built over the same collection.
    #[error("setting '{name}' has already been activated by another manager")]
    AlreadyActivated {
        /// Setting name.
        name: String,
    },

    /// A reporter was paired with a renderer bound to a different manager.
    #[error("renderer is not bound to the given manager")]
    BindingMismatch,

    /// A raw value could not be converted to the setting's declared kind.
    #[error("setting '{name}' expects {expected} but received {found}")]
    TypeMismatch {
        /// Setting name.
        name: String,
        /// Kind declared by the setting.
        expected: ValueKind,
        /// Kind of the rejected raw value.
        found: ValueKind,
    },

    /// Two settings in one collection derive the same external name.
    #[error("duplicate setting name '{name}'")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },
}

impl SettingError {
    /// Name of the setting the error refers to, if any.
    #[must_use]
    pub fn setting_name(&self) -> Option<&str> {
        match self {
            Self::Validation { name, .. }
            | Self::NotActive { name }
            | Self::AlreadyActivated { name }
            | Self::TypeMismatch { name, .. }
            | Self::DuplicateName { name } => Some(name),
            Self::BindingMismatch => None,
        }
    }
}

/// Errors from loading a [`KnobConfig`](crate::KnobConfig) document.
#[cfg(feature = "policy-config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    /// The JSON document could not be parsed.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_setting() {
        let err = SettingError::Validation {
            name: "Volume".into(),
            value: "120".into(),
        };
        assert_eq!(
            err.to_string(),
            "value 120 is out of range for setting 'Volume'"
        );
    }

    #[test]
    fn type_mismatch_display_uses_kind_names() {
        let err = SettingError::TypeMismatch {
            name: "Fullscreen".into(),
            expected: ValueKind::Bool,
            found: ValueKind::Text,
        };
        assert_eq!(
            err.to_string(),
            "setting 'Fullscreen' expects bool but received text"
        );
    }

    #[test]
    fn setting_name_accessor() {
        assert_eq!(
            SettingError::NotActive {
                name: "Volume".into()
            }
            .setting_name(),
            Some("Volume")
        );
        assert_eq!(SettingError::BindingMismatch.setting_name(), None);
    }
}
