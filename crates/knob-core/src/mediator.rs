//! Capability handle for applying or discarding a committed value's preview.
//!
//! A [`Mediator`] is only ever produced by
//! [`CommitSource::activate`](crate::CommitSource::activate), exactly once per
//! setting. Whoever holds it (normally a [`Manager`](crate::Manager)) is the
//! single owner of that setting's commit lifecycle.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Operations a mediator forwards to its setting. Implemented by the
/// setting's shared cell; never exposed outside the crate.
pub(crate) trait CommitTarget {
    fn target_name(&self) -> &str;

    /// Committed value. Only called on active targets.
    fn active_value(&self) -> Value;

    fn apply_preview(&self) -> bool;

    fn discard_preview(&self);
}

/// Exclusive apply/discard handle for one activated setting.
///
/// Not `Clone`. At most one mediator exists per setting.
pub struct Mediator {
    target: Rc<dyn CommitTarget>,
}

impl Mediator {
    pub(crate) fn new(target: Rc<dyn CommitTarget>) -> Self {
        Self { target }
    }

    /// External key of the mediated setting.
    #[must_use]
    pub fn name(&self) -> &str {
        self.target.target_name()
    }

    /// Current committed value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.target.active_value()
    }

    /// Copy the preview into the committed value.
    ///
    /// Returns whether the committed value changed, compared by value
    /// against the committed value *before* the copy.
    pub fn try_apply_preview(&self) -> bool {
        self.target.apply_preview()
    }

    /// Reset the preview to the committed value.
    pub fn discard_preview(&self) {
        self.target.discard_preview();
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}
