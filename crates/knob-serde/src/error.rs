//! Codec errors.

use knob_core::ValueKind;

/// Errors raised while encoding or decoding setting snapshots.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The JSON document could not be parsed or written.
    #[cfg(feature = "json")]
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The TOML document could not be parsed.
    #[cfg(feature = "toml")]
    #[error("invalid TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// The snapshot could not be written as TOML.
    #[cfg(feature = "toml")]
    #[error("cannot write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The document root is not a name → value object.
    #[error("expected an object at the document root, found {found}")]
    NotAnObject {
        /// Short description of what was found.
        found: &'static str,
    },

    /// A value cannot be converted to the kind its setting declares.
    #[error("setting '{name}' expects {expected}, found {found}")]
    Kind {
        /// Setting name.
        name: String,
        /// Kind declared by the definition.
        expected: ValueKind,
        /// Short description of the raw value.
        found: &'static str,
    },

    /// A float is NaN or infinite and the format cannot represent it.
    #[error("setting '{name}' holds a non-finite float")]
    NonFinite {
        /// Setting name.
        name: String,
    },
}

impl CodecError {
    /// Name of the setting the error refers to, if any.
    #[must_use]
    pub fn setting_name(&self) -> Option<&str> {
        match self {
            Self::Kind { name, .. } | Self::NonFinite { name } => Some(name),
            _ => None,
        }
    }
}
