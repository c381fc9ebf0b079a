//! Explicit registration of settings into an ordered, duplicate-checked set.
//!
//! A [`SettingSet`] is the collection a [`Manager`] and a [`Definer`] are
//! built from. Each registered setting is stored under both capability
//! views, so the preview side (definer) and the commit side (manager) always
//! agree on membership and order.
//!
//! ```
//! use knob_core::{Setting, SettingSet};
//!
//! knob_core::setting_kind!(VolumeSetting: i32 = 50, |v| (0..=100).contains(v));
//! knob_core::setting_kind!(FullscreenSetting: bool = false);
//!
//! let volume = Setting::<VolumeSetting>::new();
//! let fullscreen = Setting::<FullscreenSetting>::new();
//!
//! let set = SettingSet::builder()
//!     .register(&fullscreen)
//!     .register(&volume)
//!     .build()
//!     .unwrap();
//! assert_eq!(set.names(), ["Fullscreen", "Volume"]);
//!
//! let definer = set.definer().unwrap();
//! let manager = set.into_manager().unwrap();
//! assert_eq!(manager.len(), definer.definition().len());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::config::KnobConfig;
use crate::define::Definer;
use crate::error::Result;
use crate::manager::Manager;
use crate::setting::{CommitSource, PreviewSource, Setting, SettingKind};

struct Registered {
    preview: Rc<dyn PreviewSource>,
    commit: Rc<dyn CommitSource>,
}

/// Ordered, duplicate-checked collection of registered settings.
pub struct SettingSet {
    entries: Vec<Registered>,
    config: KnobConfig,
}

/// Builder for [`SettingSet`].
#[derive(Default)]
pub struct SettingSetBuilder {
    entries: Vec<Registered>,
    config: KnobConfig,
}

impl SettingSetBuilder {
    /// Append `setting`.
    #[must_use]
    pub fn register<S: SettingKind>(mut self, setting: &Setting<S>) -> Self {
        self.entries.push(Registered {
            preview: setting.as_preview(),
            commit: setting.as_commit(),
        });
        self
    }

    /// Use `config` for the set and everything built from it.
    #[must_use]
    pub fn config(mut self, config: KnobConfig) -> Self {
        self.config = config;
        self
    }

    /// Finish, failing with `DuplicateName` under the reject policy.
    pub fn build(self) -> Result<SettingSet> {
        self.config
            .duplicates
            .check(self.entries.iter().map(|e| e.preview.name()))?;
        tracing::debug!(entries = self.entries.len(), "setting set registered");
        Ok(SettingSet {
            entries: self.entries,
            config: self.config,
        })
    }
}

impl SettingSet {
    #[must_use]
    pub fn builder() -> SettingSetBuilder {
        SettingSetBuilder::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// External keys in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.preview.name()).collect()
    }

    /// Preview capability of every entry.
    #[must_use]
    pub fn previews(&self) -> Vec<Rc<dyn PreviewSource>> {
        self.entries.iter().map(|e| Rc::clone(&e.preview)).collect()
    }

    /// Commit capability of every entry.
    #[must_use]
    pub fn commits(&self) -> Vec<Rc<dyn CommitSource>> {
        self.entries.iter().map(|e| Rc::clone(&e.commit)).collect()
    }

    /// Build a definer over the previews.
    pub fn definer(&self) -> Result<Definer> {
        Definer::with_config(self.previews(), &self.config)
    }

    /// Build a manager, activating every entry.
    pub fn into_manager(self) -> Result<Manager> {
        Manager::with_config(self.commits(), &self.config)
    }
}

impl fmt::Debug for SettingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingSet")
            .field("names", &self.names())
            .field("config", &self.config)
            .finish()
    }
}

/// Register settings into a [`SettingSet`], returning `Result<SettingSet>`.
///
/// ```
/// use knob_core::{Setting, setting_set};
///
/// knob_core::setting_kind!(VolumeSetting: i32 = 50);
/// knob_core::setting_kind!(FullscreenSetting: bool = false);
///
/// let volume = Setting::<VolumeSetting>::new();
/// let fullscreen = Setting::<FullscreenSetting>::new();
/// let set = setting_set![volume, fullscreen].unwrap();
/// assert_eq!(set.len(), 2);
/// ```
#[macro_export]
macro_rules! setting_set {
    ($($setting:expr),* $(,)?) => {
        $crate::SettingSet::builder()
            $(.register(&$setting))*
            .build()
    };
}
