//! Construction policy for managers, definers and setting sets.
//!
//! The only knob today is how duplicate external names are treated. With the
//! `policy-config` feature the config can be loaded from a TOML or JSON
//! string:
//!
//! ```toml
//! duplicates = "last_wins"
//! ```

use std::collections::HashSet;

use crate::error::{Result, SettingError};

/// What to do when two settings in one collection share an external name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DuplicatePolicy {
    /// Fail construction with `DuplicateName`.
    #[default]
    Reject,
    /// Accept; name-keyed maps keep the later entry.
    LastWins,
}

impl DuplicatePolicy {
    /// Check `names` against this policy.
    pub fn check<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let mut seen = HashSet::new();
        for name in names {
            if seen.insert(name) {
                continue;
            }
            match self {
                Self::Reject => {
                    tracing::warn!(setting = name, "duplicate setting name rejected");
                    return Err(SettingError::DuplicateName {
                        name: name.to_owned(),
                    });
                }
                Self::LastWins => {
                    tracing::debug!(setting = name, "duplicate setting name, later entry wins");
                }
            }
        }
        Ok(())
    }
}

/// Construction-time configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct KnobConfig {
    /// Duplicate name handling.
    pub duplicates: DuplicatePolicy,
}

impl KnobConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for [`duplicates`](Self::duplicates).
    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Parse a TOML document. Missing keys take their defaults.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, crate::error::ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a JSON document. Missing keys take their defaults.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(source: &str) -> std::result::Result<Self, crate::error::ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn default_rejects_duplicates() {
        assert_eq!(KnobConfig::default().duplicates, DuplicatePolicy::Reject);
    }

    #[test]
    #[traced_test]
    fn reject_reports_first_collision() {
        let err = DuplicatePolicy::Reject
            .check(["Volume", "Brightness", "Volume"])
            .unwrap_err();
        assert_eq!(
            err,
            SettingError::DuplicateName {
                name: "Volume".into()
            }
        );
        assert!(logs_contain("duplicate setting name rejected"));
    }

    #[test]
    fn last_wins_accepts_collisions() {
        assert!(DuplicatePolicy::LastWins.check(["A", "A"]).is_ok());
    }

    #[test]
    fn unique_names_pass() {
        assert!(DuplicatePolicy::Reject.check(["A", "B", "C"]).is_ok());
        assert!(DuplicatePolicy::Reject.check(std::iter::empty()).is_ok());
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn parses_toml_and_json() {
        let cfg = KnobConfig::from_toml_str("duplicates = \"last_wins\"").unwrap();
        assert_eq!(cfg.duplicates, DuplicatePolicy::LastWins);

        let cfg = KnobConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, KnobConfig::default());

        assert!(KnobConfig::from_toml_str("duplicates = 3").is_err());
    }
}
