//! Snapshots of committed values and their republication.
//!
//! - [`Renderer`]: flattens a manager's committed values into a
//!   [`ValueMap`], recomputed on every call.
//! - [`Reporter`]: re-renders whenever the manager fires `Modified` and
//!   hands the snapshot to its own subscribers.
//!
//! # Invariants
//!
//! 1. A renderer is bound to one manager for its whole life; binding is by
//!    identity, not by content.
//! 2. A reporter only ever pairs a manager with a renderer bound to that
//!    same manager.
//! 3. Reporter subscribers receive exactly one snapshot per manager
//!    notification, delivered before `Manager::apply_preview` returns.
//! 4. Dropping a reporter disconnects it from the manager.

use std::fmt;

use crate::error::{Result, SettingError};
use crate::manager::Manager;
use crate::signal::{Signal, Subscription};
use crate::value::ValueMap;

/// Produces name → value snapshots of one manager's committed values.
///
/// Clones stay bound to the same manager.
pub struct Renderer {
    manager: Manager,
}

impl Clone for Renderer {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.share(),
        }
    }
}

impl Renderer {
    /// Bind a renderer to `manager`.
    #[must_use]
    pub fn new(manager: &Manager) -> Self {
        Self {
            manager: manager.share(),
        }
    }

    /// Snapshot the committed values now.
    ///
    /// When two entries share a name (only possible under
    /// [`DuplicatePolicy::LastWins`](crate::DuplicatePolicy::LastWins)) the
    /// later entry wins.
    #[must_use]
    pub fn render(&self) -> ValueMap {
        self.manager
            .settings()
            .iter()
            .map(|entry| (entry.name.to_owned(), entry.value))
            .collect()
    }

    /// Whether this renderer is bound to `manager`.
    #[must_use]
    pub fn is_rendering(&self, manager: &Manager) -> bool {
        self.manager.ptr_eq(manager)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("entries", &self.manager.len())
            .finish()
    }
}

/// Republishes rendered snapshots whenever its manager changes.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use knob_core::{Manager, Reporter, Setting, Value};
///
/// knob_core::setting_kind!(VolumeSetting: i32 = 50, |v| (0..=100).contains(v));
///
/// let volume = Setting::<VolumeSetting>::new();
/// let manager = Manager::new([volume.as_commit()]).unwrap();
/// let reporter = Reporter::new(&manager);
///
/// let last = Rc::new(RefCell::new(None));
/// let sink = Rc::clone(&last);
/// let _sub = reporter.on_modified(move |snapshot| {
///     *sink.borrow_mut() = snapshot.get("Volume").cloned();
/// });
///
/// volume.set_preview(75).unwrap();
/// manager.apply_preview();
/// assert_eq!(*last.borrow(), Some(Value::Integer(75)));
/// ```
pub struct Reporter {
    renderer: Renderer,
    modified: Signal<ValueMap>,
    _manager_subscription: Subscription,
}

impl Reporter {
    /// Report on `manager` through a private renderer.
    #[must_use]
    pub fn new(manager: &Manager) -> Self {
        Self::bind(manager, Renderer::new(manager))
    }

    /// Report on `manager` through `renderer`.
    ///
    /// Fails with `BindingMismatch` if `renderer` renders another manager.
    pub fn with_renderer(manager: &Manager, renderer: Renderer) -> Result<Self> {
        if !renderer.is_rendering(manager) {
            tracing::warn!("reporter rejected a renderer bound to another manager");
            return Err(SettingError::BindingMismatch);
        }
        Ok(Self::bind(manager, renderer))
    }

    /// Caller guarantees `renderer.is_rendering(manager)`.
    pub(crate) fn bind(manager: &Manager, renderer: Renderer) -> Self {
        let modified = Signal::new();
        let publish = modified.clone();
        let render = renderer.clone();
        let subscription = manager.on_modified(move || {
            let snapshot = render.render();
            tracing::trace!(entries = snapshot.len(), "reporting snapshot");
            publish.emit(&snapshot);
        });
        Self {
            renderer,
            modified,
            _manager_subscription: subscription,
        }
    }

    /// Subscribe to rendered snapshots.
    pub fn on_modified(&self, callback: impl Fn(&ValueMap) + 'static) -> Subscription {
        self.modified.subscribe(callback)
    }

    /// The renderer used for snapshots.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("renderer", &self.renderer)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::Setting;
    use crate::value::Value;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    crate::setting_kind!(VolumeSetting: i32 = 50, |v| (0..=100).contains(v));
    crate::setting_kind!(FullscreenSetting: bool = false);

    fn manager() -> (Setting<FullscreenSetting>, Setting<VolumeSetting>, Manager) {
        let fullscreen = Setting::new();
        let volume = Setting::new();
        let manager = Manager::new([fullscreen.as_commit(), volume.as_commit()]).unwrap();
        (fullscreen, volume, manager)
    }

    fn recorder(reporter: &Reporter) -> (Rc<RefCell<Vec<ValueMap>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let sub = reporter.on_modified(move |m| sink.borrow_mut().push(m.clone()));
        (log, sub)
    }

    #[test]
    fn render_reflects_committed_values() {
        let (fullscreen, volume, manager) = manager();
        let renderer = Renderer::new(&manager);

        fullscreen.set_preview(true).unwrap();
        volume.set_preview(75).unwrap();
        assert_eq!(renderer.render()["Volume"], Value::Integer(50));

        manager.apply_preview();
        let snapshot = renderer.render();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["Fullscreen"], Value::Bool(true));
        assert_eq!(snapshot["Volume"], Value::Integer(75));
    }

    #[test]
    fn renderer_identity_binding() {
        let (_, _, first) = manager();
        let (_, _, second) = manager();
        let renderer = Renderer::new(&first);
        assert!(renderer.is_rendering(&first));
        assert!(!renderer.is_rendering(&second));
        assert!(renderer.clone().is_rendering(&first));
    }

    #[test]
    fn cloned_renderer_renders_same_manager() {
        let (_, volume, manager) = manager();
        let original = Renderer::new(&manager);
        let copy = original.clone();
        drop(original);

        volume.set_preview(12).unwrap();
        manager.apply_preview();
        assert!(copy.is_rendering(&manager));
        assert_eq!(copy.render()["Volume"], Value::Integer(12));
    }

    #[test]
    #[traced_test]
    fn reporter_rejects_foreign_renderer() {
        let (_, _, first) = manager();
        let (_, _, second) = manager();
        let err = Reporter::with_renderer(&first, Renderer::new(&second)).unwrap_err();
        assert_eq!(err, SettingError::BindingMismatch);
        assert!(logs_contain("bound to another manager"));
    }

    #[test]
    fn reporter_accepts_matching_renderer() {
        let (_, volume, manager) = manager();
        let renderer = Renderer::new(&manager);
        let reporter = Reporter::with_renderer(&manager, renderer).unwrap();
        assert!(reporter.renderer().is_rendering(&manager));

        let (log, _sub) = recorder(&reporter);
        volume.set_preview(1).unwrap();
        manager.apply_preview();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn reporter_republishes_once_per_apply() {
        let (fullscreen, volume, manager) = manager();
        let reporter = Reporter::new(&manager);
        let (log, _sub) = recorder(&reporter);

        fullscreen.set_preview(true).unwrap();
        volume.set_preview(75).unwrap();
        manager.apply_preview();
        manager.apply_preview();

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0]["Fullscreen"], Value::Bool(true));
        assert_eq!(log[0]["Volume"], Value::Integer(75));
    }

    #[test]
    fn dropped_reporter_stops_reporting() {
        let (_, volume, manager) = manager();
        let reporter = Reporter::new(&manager);
        let (log, _sub) = recorder(&reporter);
        drop(reporter);

        volume.set_preview(3).unwrap();
        manager.apply_preview();
        assert!(log.borrow().is_empty());
    }
}
