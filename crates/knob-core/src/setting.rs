//! Typed settings: a validated preview paired with a one-shot committed value.
//!
//! A [`Setting<S>`] is a cheap handle to shared state holding
//!
//! - the **preview**: the staged value, always validator-passing, and
//! - the **commit state**: `Inactive` until [`activate`](Setting::activate)
//!   seeds it from the preview, `Active(value)` forever after.
//!
//! The preview is edited freely through the handle. The committed value only
//! moves through the [`Mediator`] returned by activation.
//!
//! # State machine
//!
//! ```text
//!   Inactive ──activate()──▶ Active(v)
//!                               │  ▲
//!            apply: v := preview│  │discard: preview := v
//!                               ▼  │
//!                            Active(v')
//! ```
//!
//! # Invariants
//!
//! 1. The preview always passes `S::validate`.
//! 2. `activate` succeeds at most once per setting (all handle clones
//!    included).
//! 3. Reading the committed value while inactive is an error, never a
//!    default.
//! 4. Applying compares against the committed value before overwriting it.
//! 5. Discarding bypasses validation; its source was itself validated.
//!
//! # Example
//!
//! ```
//! use knob_core::{Setting, SettingKind};
//!
//! struct VolumeSetting;
//!
//! impl SettingKind for VolumeSetting {
//!     type Value = i32;
//!     fn validate(value: &i32) -> bool { (0..=100).contains(value) }
//!     fn default_value() -> i32 { 50 }
//! }
//!
//! let volume = Setting::<VolumeSetting>::new();
//! assert_eq!(volume.name(), "Volume");
//!
//! let mediator = volume.activate().unwrap();
//! volume.set_preview(75).unwrap();
//! assert_eq!(volume.value().unwrap(), 50);
//!
//! assert!(mediator.try_apply_preview());
//! assert_eq!(volume.value().unwrap(), 75);
//! assert!(volume.set_preview(101).is_err());
//! ```

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Result, SettingError};
use crate::mediator::{CommitTarget, Mediator};
use crate::name::derive_name;
use crate::signal::{Signal, Subscription};
use crate::value::{SettingData, Value, ValueKind};

/// Per-setting behavior: value type, validator, default and external name.
///
/// Implement it on a marker type whose name ends in `Setting` or `Preview`;
/// the suffix is dropped to form the external key.
pub trait SettingKind: 'static {
    /// Concrete value type.
    type Value: SettingData;

    /// Whether `value` may be staged.
    fn validate(value: &Self::Value) -> bool;

    /// Fallback for invalid initial values. Must pass [`validate`](Self::validate).
    fn default_value() -> Self::Value;

    /// External key. Defaults to the type name minus its conventional suffix.
    fn name() -> &'static str {
        derive_name(type_name::<Self>())
    }
}

/// Declare a [`SettingKind`] marker type in one line.
///
/// ```
/// knob_core::setting_kind! {
///     /// Master volume in percent.
///     pub VolumeSetting: i32 = 50, |v| (0..=100).contains(v)
/// }
///
/// use knob_core::SettingKind;
/// assert_eq!(VolumeSetting::name(), "Volume");
/// assert!(!VolumeSetting::validate(&101));
/// ```
#[macro_export]
macro_rules! setting_kind {
    ($(#[$meta:meta])* $vis:vis $name:ident : $ty:ty = $default:expr, |$v:ident| $validate:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::SettingKind for $name {
            type Value = $ty;

            fn validate($v: &$ty) -> bool {
                $validate
            }

            fn default_value() -> $ty {
                $default
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis $name:ident : $ty:ty = $default:expr) => {
        $crate::setting_kind!($(#[$meta])* $vis $name: $ty = $default, |_v| true);
    };
}

// ---------------------------------------------------------------------------
// Capability views
// ---------------------------------------------------------------------------

/// Preview-side capability: name, declared kind and validated staging.
///
/// This is what a [`Definer`](crate::Definer) works on.
pub trait PreviewSource {
    /// External key.
    fn name(&self) -> &str;

    /// Declared value kind.
    fn value_kind(&self) -> ValueKind;

    /// Current staged value.
    fn preview_value(&self) -> Value;

    /// Stage `value`, failing with `TypeMismatch` or `Validation`.
    fn set_preview_value(&self, value: Value) -> Result<()>;

    /// Stage `value`, reporting failure as `false` without mutating.
    fn try_set_preview_value(&self, value: Value) -> bool {
        self.set_preview_value(value).is_ok()
    }
}

/// Commit-side capability: name, committed value and activation.
///
/// This is what a [`Manager`](crate::Manager) is built from.
pub trait CommitSource {
    /// External key.
    fn name(&self) -> &str;

    /// Whether [`activate`](Self::activate) has already succeeded.
    fn is_active(&self) -> bool;

    /// Committed value, or `NotActive`.
    fn committed_value(&self) -> Result<Value>;

    /// Bind the committed value to a single owner.
    ///
    /// Seeds the committed value from the preview and returns the only
    /// [`Mediator`] for this setting. Fails with `AlreadyActivated` on any
    /// later call.
    fn activate(self: Rc<Self>) -> Result<Mediator>;
}

// ---------------------------------------------------------------------------
// Shared cell
// ---------------------------------------------------------------------------

enum CommitState<T> {
    Inactive,
    Active(T),
}

struct SettingCell<S: SettingKind> {
    name: &'static str,
    preview: RefCell<S::Value>,
    state: RefCell<CommitState<S::Value>>,
    committed: Signal<S::Value>,
}

impl<S: SettingKind> SettingCell<S> {
    fn new(initial: S::Value) -> Self {
        let default = S::default_value();
        debug_assert!(
            S::validate(&default),
            "default value of setting '{}' fails its own validator",
            S::name()
        );
        let preview = if S::validate(&initial) {
            initial
        } else {
            tracing::debug!(
                setting = S::name(),
                rejected = ?initial,
                "initial value failed validation, using default"
            );
            default
        };
        Self {
            name: S::name(),
            preview: RefCell::new(preview),
            state: RefCell::new(CommitState::Inactive),
            committed: Signal::new(),
        }
    }

    fn validated(&self, value: &S::Value) -> Result<()> {
        if S::validate(value) {
            Ok(())
        } else {
            Err(SettingError::Validation {
                name: self.name.to_owned(),
                value: format!("{value:?}"),
            })
        }
    }

    fn set_preview(&self, value: S::Value) -> Result<()> {
        self.validated(&value)?;
        *self.preview.borrow_mut() = value;
        Ok(())
    }

    fn committed(&self) -> Result<S::Value> {
        match &*self.state.borrow() {
            CommitState::Active(value) => Ok(value.clone()),
            CommitState::Inactive => Err(SettingError::NotActive {
                name: self.name.to_owned(),
            }),
        }
    }

    fn is_active(&self) -> bool {
        matches!(*self.state.borrow(), CommitState::Active(_))
    }
}

impl<S: SettingKind> PreviewSource for SettingCell<S> {
    fn name(&self) -> &str {
        self.name
    }

    fn value_kind(&self) -> ValueKind {
        <S::Value as SettingData>::KIND
    }

    fn preview_value(&self) -> Value {
        self.preview.borrow().clone().into_value()
    }

    fn set_preview_value(&self, value: Value) -> Result<()> {
        let typed =
            <S::Value as SettingData>::from_value(&value).ok_or_else(|| {
                SettingError::TypeMismatch {
                    name: self.name.to_owned(),
                    expected: self.value_kind(),
                    found: value.kind(),
                }
            })?;
        self.set_preview(typed)
    }
}

impl<S: SettingKind> CommitSource for SettingCell<S> {
    fn name(&self) -> &str {
        self.name
    }

    fn is_active(&self) -> bool {
        SettingCell::is_active(self)
    }

    fn committed_value(&self) -> Result<Value> {
        self.committed().map(SettingData::into_value)
    }

    fn activate(self: Rc<Self>) -> Result<Mediator> {
        {
            let mut state = self.state.borrow_mut();
            if matches!(*state, CommitState::Active(_)) {
                tracing::warn!(setting = self.name, "rejected second activation");
                return Err(SettingError::AlreadyActivated {
                    name: self.name.to_owned(),
                });
            }
            *state = CommitState::Active(self.preview.borrow().clone());
        }
        tracing::trace!(setting = self.name, "activated");
        Ok(Mediator::new(self))
    }
}

impl<S: SettingKind> CommitTarget for SettingCell<S> {
    fn target_name(&self) -> &str {
        self.name
    }

    fn active_value(&self) -> Value {
        match &*self.state.borrow() {
            CommitState::Active(value) => value.clone().into_value(),
            CommitState::Inactive => {
                unreachable!("mediator for '{}' exists without activation", self.name)
            }
        }
    }

    fn apply_preview(&self) -> bool {
        let staged = self.preview.borrow().clone();
        let changed = {
            let mut state = self.state.borrow_mut();
            let CommitState::Active(active) = &mut *state else {
                return false;
            };
            let changed = *active != staged;
            *active = staged.clone();
            changed
        };
        if changed {
            tracing::trace!(setting = self.name, value = ?staged, "committed");
            self.committed.emit(&staged);
        }
        changed
    }

    fn discard_preview(&self) {
        if let CommitState::Active(active) = &*self.state.borrow() {
            *self.preview.borrow_mut() = active.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Setting<S>
// ---------------------------------------------------------------------------

/// Handle to one setting's preview and committed value.
///
/// Clones share the same state; activation is tracked on the shared state,
/// so it is one-shot across all clones.
pub struct Setting<S: SettingKind> {
    cell: Rc<SettingCell<S>>,
}

impl<S: SettingKind> Clone for Setting<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<S: SettingKind> Default for Setting<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SettingKind> Setting<S> {
    /// Create a setting whose preview starts at `S::default_value()`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_value(S::default_value())
    }

    /// Create a setting whose preview starts at `value`, or at the default
    /// when `value` fails validation.
    #[must_use]
    pub fn with_value(value: S::Value) -> Self {
        Self {
            cell: Rc::new(SettingCell::new(value)),
        }
    }

    /// External key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.cell.name
    }

    /// Declared value kind.
    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        <S::Value as SettingData>::KIND
    }

    /// Current staged value.
    #[must_use]
    pub fn preview(&self) -> S::Value {
        self.cell.preview.borrow().clone()
    }

    /// Stage `value`, failing with `Validation` and leaving the preview
    /// untouched if it is out of range.
    pub fn set_preview(&self, value: S::Value) -> Result<()> {
        self.cell.set_preview(value)
    }

    /// Stage `value`, returning whether it was accepted.
    pub fn try_set_preview(&self, value: S::Value) -> bool {
        self.cell.set_preview(value).is_ok()
    }

    /// Committed value, or `NotActive` before activation.
    pub fn value(&self) -> Result<S::Value> {
        self.cell.committed()
    }

    /// Whether the setting has been activated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cell.is_active()
    }

    /// Activate the committed value. See [`CommitSource::activate`].
    pub fn activate(&self) -> Result<Mediator> {
        Rc::clone(&self.cell).activate()
    }

    /// Observe committed changes of this setting.
    ///
    /// The callback receives the new committed value after an apply that
    /// changed it. Discards never notify.
    pub fn on_commit(&self, callback: impl Fn(&S::Value) + 'static) -> Subscription {
        self.cell.committed.subscribe(callback)
    }

    /// Narrow to the preview capability.
    #[must_use]
    pub fn as_preview(&self) -> Rc<dyn PreviewSource> {
        Rc::clone(&self.cell) as Rc<dyn PreviewSource>
    }

    /// Narrow to the commit capability.
    #[must_use]
    pub fn as_commit(&self) -> Rc<dyn CommitSource> {
        Rc::clone(&self.cell) as Rc<dyn CommitSource>
    }

    /// Whether both handles share the same state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<S: SettingKind> fmt::Debug for Setting<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Setting");
        dbg.field("name", &self.cell.name)
            .field("preview", &*self.cell.preview.borrow());
        match &*self.cell.state.borrow() {
            CommitState::Active(value) => dbg.field("value", value),
            CommitState::Inactive => dbg.field("value", &"<inactive>"),
        };
        dbg.finish()
    }
}
