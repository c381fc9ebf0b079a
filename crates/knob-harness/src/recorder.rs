//! Notification capture for assertions.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use knob_core::{Manager, Reporter, Setting, SettingKind, Subscription, ValueMap};

/// Records every payload delivered to the callbacks it hands out.
///
/// Keep the returned [`Subscription`] alive for as long as recording
/// should continue.
pub struct Recorder<T> {
    events: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> Recorder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that appends to this recorder.
    pub fn sink(&self) -> impl Fn(&T) + 'static {
        let events = Rc::clone(&self.events);
        move |event: &T| events.borrow_mut().push(event.clone())
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn events(&self) -> Vec<T> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.events.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Recorder<()> {
    /// Record each `Modified` notification of `manager`.
    pub fn manager(manager: &Manager) -> (Self, Subscription) {
        let recorder = Self::new();
        let sink = recorder.sink();
        let sub = manager.on_modified(move || sink(&()));
        (recorder, sub)
    }
}

impl Recorder<ValueMap> {
    /// Record each snapshot published by `reporter`.
    pub fn reporter(reporter: &Reporter) -> (Self, Subscription) {
        let recorder = Self::new();
        let sub = reporter.on_modified(recorder.sink());
        (recorder, sub)
    }
}

/// Record each committed change of `setting`.
pub fn commits<S: SettingKind>(setting: &Setting<S>) -> (Recorder<S::Value>, Subscription) {
    let recorder = Recorder::new();
    let sub = setting.on_commit(recorder.sink());
    (recorder, sub)
}

impl<T: fmt::Debug> fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.events.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DisplaySettings;

    #[test]
    fn records_manager_and_setting_events() {
        let display = DisplaySettings::new();
        let manager = display.core_set().unwrap().into_manager().unwrap();
        let (modified, _m) = Recorder::manager(&manager);
        let (volume, _v) = commits(&display.volume);

        display.volume.set_preview(75).unwrap();
        manager.apply_preview();
        manager.apply_preview();

        assert_eq!(modified.count(), 1);
        assert_eq!(volume.events(), vec![75]);

        volume.clear();
        assert_eq!(volume.last(), None);
    }
}
