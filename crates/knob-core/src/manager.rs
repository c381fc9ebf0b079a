//! Batch owner of a fixed collection of committed values.
//!
//! A [`Manager`] activates every setting it is given, keeps the resulting
//! [`Mediator`]s to itself, and exposes bulk apply/discard plus a read-only
//! view of the committed values.
//!
//! # Invariants
//!
//! 1. Entries are fixed at construction, in input order.
//! 2. Construction is all-or-nothing: names, handle identity and activation
//!    state are checked before any setting is activated.
//! 3. `apply_preview` visits every entry (last to first) and never
//!    short-circuits.
//! 4. `Modified` fires exactly once per `apply_preview` call that changed at
//!    least one entry, and zero times otherwise, before the call returns.
//! 5. `discard_preview` never fires `Modified`.
//! 6. [`settings`](Manager::settings) reads committed values only.
//!
//! # Example
//!
//! ```
//! use knob_core::{Manager, Setting};
//!
//! knob_core::setting_kind!(VolumeSetting: i32 = 50, |v| (0..=100).contains(v));
//!
//! let volume = Setting::<VolumeSetting>::new();
//! let manager = Manager::new([volume.as_commit()]).unwrap();
//!
//! volume.set_preview(75).unwrap();
//! assert!(manager.apply_preview());
//! assert_eq!(volume.value().unwrap(), 75);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::config::KnobConfig;
use crate::error::{Result, SettingError};
use crate::mediator::Mediator;
use crate::setting::CommitSource;
use crate::signal::{Signal, Subscription};
use crate::value::Value;

struct ManagerInner {
    entries: Vec<Mediator>,
    modified: Signal<()>,
}

/// Owner of a batch of activated settings.
pub struct Manager {
    inner: Rc<ManagerInner>,
}

impl Manager {
    /// Activate `sources` in order under the default [`KnobConfig`].
    pub fn new<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = Rc<dyn CommitSource>>,
    {
        Self::with_config(sources, &KnobConfig::default())
    }

    /// Activate `sources` in order.
    ///
    /// Fails with `DuplicateName` (under [`DuplicatePolicy::Reject`]) or
    /// `AlreadyActivated` (a source already active, or passed twice) without
    /// activating anything.
    ///
    /// [`DuplicatePolicy::Reject`]: crate::DuplicatePolicy::Reject
    pub fn with_config<I>(sources: I, config: &KnobConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Rc<dyn CommitSource>>,
    {
        let sources: Vec<Rc<dyn CommitSource>> = sources.into_iter().collect();

        config.duplicates.check(sources.iter().map(|s| s.name()))?;
        let mut seen = HashSet::with_capacity(sources.len());
        if let Some(repeat) = sources
            .iter()
            .find(|s| !seen.insert(Rc::as_ptr(*s).cast::<()>()))
        {
            tracing::warn!(setting = repeat.name(), "setting passed to manager twice");
            return Err(SettingError::AlreadyActivated {
                name: repeat.name().to_owned(),
            });
        }
        if let Some(taken) = sources.iter().find(|s| s.is_active()) {
            tracing::warn!(
                setting = taken.name(),
                "setting already owned by another manager"
            );
            return Err(SettingError::AlreadyActivated {
                name: taken.name().to_owned(),
            });
        }

        let entries = sources
            .into_iter()
            .map(|source| source.activate())
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(entries = entries.len(), "manager activated settings");
        Ok(Self {
            inner: Rc::new(ManagerInner {
                entries,
                modified: Signal::new(),
            }),
        })
    }

    /// Commit every preview. Returns whether any committed value changed.
    pub fn apply_preview(&self) -> bool {
        let mut modified = false;
        for entry in self.inner.entries.iter().rev() {
            modified |= entry.try_apply_preview();
        }
        tracing::debug!(modified, "applied previews");
        if modified {
            self.inner.modified.emit(&());
        }
        modified
    }

    /// Reset every preview to its committed value.
    pub fn discard_preview(&self) {
        for entry in self.inner.entries.iter().rev() {
            entry.discard_preview();
        }
        tracing::debug!(entries = self.inner.entries.len(), "discarded previews");
    }

    /// Read-through view of the committed values, in construction order.
    #[must_use]
    pub fn settings(&self) -> SettingsView<'_> {
        SettingsView {
            entries: &self.inner.entries,
        }
    }

    /// Number of managed settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Subscribe to the `Modified` notification. It carries no payload;
    /// observers read [`settings`](Self::settings) or render.
    pub fn on_modified(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.modified.subscribe(move |()| callback())
    }

    /// Whether both handles refer to the same manager.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Another handle to this manager, for identity-bound collaborators.
    pub(crate) fn share(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("entries", &self.inner.entries)
            .field("modified", &self.inner.modified)
            .finish()
    }
}

/// One committed setting as seen through [`SettingsView`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettingEntry<'a> {
    pub name: &'a str,
    pub value: Value,
}

/// Read-only, lazily evaluated projection of a manager's committed values.
#[derive(Clone, Copy)]
pub struct SettingsView<'a> {
    entries: &'a [Mediator],
}

impl<'a> SettingsView<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, reading the committed value now.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<SettingEntry<'a>> {
        self.entries.get(index).map(entry)
    }

    /// Iterate entries in construction order.
    pub fn iter(self) -> impl ExactSizeIterator<Item = SettingEntry<'a>> + 'a {
        self.entries.iter().map(entry)
    }
}

impl fmt::Debug for SettingsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

fn entry(mediator: &Mediator) -> SettingEntry<'_> {
    SettingEntry {
        name: mediator.name(),
        value: mediator.value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::setting::Setting;
    use std::cell::{Cell, RefCell};

    crate::setting_kind!(VolumeSetting: i32 = 50, |v| (0..=100).contains(v));
    crate::setting_kind!(FullscreenSetting: bool = false);
    crate::setting_kind!(BrightnessSetting: f64 = 0.8, |v| (0.0..=1.0).contains(v));

    mod other {
        crate::setting_kind!(pub VolumeSetting: u8 = 1);
    }

    struct Fixture {
        fullscreen: Setting<FullscreenSetting>,
        volume: Setting<VolumeSetting>,
        brightness: Setting<BrightnessSetting>,
        manager: Manager,
    }

    fn fixture() -> Fixture {
        let fullscreen = Setting::new();
        let volume = Setting::new();
        let brightness = Setting::new();
        let manager = Manager::new([
            fullscreen.as_commit(),
            volume.as_commit(),
            brightness.as_commit(),
        ])
        .unwrap();
        Fixture {
            fullscreen,
            volume,
            brightness,
            manager,
        }
    }

    fn counter(manager: &Manager) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = manager.on_modified(move || c.set(c.get() + 1));
        (count, sub)
    }

    #[test]
    fn construction_activates_in_order() {
        let f = fixture();
        assert!(f.fullscreen.is_active());
        assert!(f.volume.is_active());
        assert!(f.brightness.is_active());
        let names: Vec<_> = f.manager.settings().iter().map(|e| e.name).collect();
        assert_eq!(names, ["Fullscreen", "Volume", "Brightness"]);
    }

    #[test]
    fn second_manager_over_same_setting_fails_without_side_effects() {
        let f = fixture();
        let fresh = Setting::<other::VolumeSetting>::new();

        // Duplicate name is checked first.
        let err = Manager::new([fresh.as_commit(), f.volume.as_commit()]).unwrap_err();
        assert!(matches!(err, SettingError::DuplicateName { .. }));

        let err = Manager::new([f.fullscreen.as_commit()]).unwrap_err();
        assert!(matches!(err, SettingError::AlreadyActivated { ref name } if name == "Fullscreen"));
        assert!(!fresh.is_active(), "failed construction must not activate");
    }

    #[test]
    fn already_active_entry_blocks_whole_batch() {
        let f = fixture();
        let brightness = Setting::<BrightnessSetting>::new();
        let err = Manager::new([brightness.as_commit(), f.volume.as_commit()]).unwrap_err();
        assert!(matches!(err, SettingError::AlreadyActivated { .. }));
        assert!(!brightness.is_active());
    }

    #[test]
    fn duplicate_names_allowed_under_last_wins() {
        let a = Setting::<VolumeSetting>::new();
        let b = Setting::<other::VolumeSetting>::new();
        let config = KnobConfig::new().with_duplicates(DuplicatePolicy::LastWins);
        let manager = Manager::with_config([a.as_commit(), b.as_commit()], &config).unwrap();
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn same_handle_twice_fails_without_activating() {
        let volume = Setting::<VolumeSetting>::new();
        let config = KnobConfig::new().with_duplicates(DuplicatePolicy::LastWins);
        let err = Manager::with_config([volume.as_commit(), volume.clone().as_commit()], &config)
            .unwrap_err();
        assert!(matches!(err, SettingError::AlreadyActivated { ref name } if name == "Volume"));
        assert!(!volume.is_active());

        let manager = Manager::with_config([volume.as_commit()], &config).unwrap();
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn passes_visit_entries_last_to_first() {
        let f = fixture();
        let order = Rc::new(RefCell::new(Vec::new()));
        let (o1, o2, o3) = (Rc::clone(&order), Rc::clone(&order), Rc::clone(&order));
        let _subs = [
            f.fullscreen.on_commit(move |_| o1.borrow_mut().push("Fullscreen")),
            f.volume.on_commit(move |_| o2.borrow_mut().push("Volume")),
            f.brightness.on_commit(move |_| o3.borrow_mut().push("Brightness")),
        ];

        f.fullscreen.set_preview(true).unwrap();
        f.volume.set_preview(75).unwrap();
        f.brightness.set_preview(0.5).unwrap();
        f.manager.apply_preview();
        assert_eq!(*order.borrow(), ["Brightness", "Volume", "Fullscreen"]);
    }

    #[test]
    fn apply_fires_once_for_many_changes() {
        let f = fixture();
        let (count, _sub) = counter(&f.manager);

        f.fullscreen.set_preview(true).unwrap();
        f.volume.set_preview(75).unwrap();
        assert!(f.manager.apply_preview());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn apply_without_changes_fires_nothing() {
        let f = fixture();
        let (count, _sub) = counter(&f.manager);

        assert!(!f.manager.apply_preview());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn discard_never_fires() {
        let f = fixture();
        let (count, _sub) = counter(&f.manager);

        f.volume.set_preview(10).unwrap();
        f.manager.discard_preview();
        assert_eq!(f.volume.preview(), 50);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn settings_view_shows_committed_not_preview() {
        let f = fixture();
        f.volume.set_preview(75).unwrap();

        let view = f.manager.settings();
        assert_eq!(view.len(), 3);
        assert_eq!(
            view.get(1),
            Some(SettingEntry {
                name: "Volume",
                value: Value::Integer(50)
            })
        );

        f.manager.apply_preview();
        assert_eq!(f.manager.settings().get(1).unwrap().value, Value::Integer(75));
        assert_eq!(view.get(3), None);
    }

    #[test]
    fn notification_observes_committed_state() {
        let f = fixture();
        let manager = f.manager.share();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _sub = f.manager.on_modified(move || {
            let volume = manager.settings().get(1).and_then(|e| e.value.as_integer());
            s.set(volume.unwrap_or(-1));
        });

        f.volume.set_preview(64).unwrap();
        f.manager.apply_preview();
        assert_eq!(seen.get(), 64);
    }

    #[test]
    fn empty_manager() {
        let manager = Manager::new(Vec::new()).unwrap();
        assert!(manager.is_empty());
        assert!(!manager.apply_preview());
        manager.discard_preview();
    }

    #[test]
    fn debug_lists_entries() {
        let f = fixture();
        let debug = format!("{:?}", f.manager.settings());
        assert!(debug.contains("Brightness"));
    }
}
