//! Synchronous change notification with RAII subscriptions.
//!
//! A [`Signal<A>`] keeps a list of subscriber callbacks and invokes them in
//! registration order on [`emit`](Signal::emit). Managers use a `Signal<()>`
//! (signal only, observers re-render), reporters and individual settings use
//! payload-carrying signals.
//!
//! # Architecture
//!
//! The signal stores `Weak` callbacks; the strong `Rc` lives in the
//! [`Subscription`] returned to the subscriber. Dropping the subscription
//! is therefore enough to unsubscribe, and dead entries are pruned lazily
//! on the next emission.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Delivery is synchronous: every live subscriber has run before
//!    `emit` returns.
//! 3. A subscription dropped before an emission never sees it.
//! 4. Callbacks may subscribe, unsubscribe or emit re-entrantly; the
//!    subscriber list is snapshotted before any callback runs.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<A> = dyn Fn(&A);

struct SignalInner<A> {
    subscribers: Vec<Weak<Callback<A>>>,
    emissions: u64,
}

/// A single-threaded, synchronous notification channel.
pub struct Signal<A> {
    inner: Rc<RefCell<SignalInner<A>>>,
}

impl<A> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Signal<A> {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                subscribers: Vec::new(),
                emissions: 0,
            })),
        }
    }

    /// Register `callback`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&A) + 'static) -> Subscription {
        let strong: Rc<Callback<A>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _callback: Box::new(strong),
        }
    }

    /// Deliver `payload` to every live subscriber.
    pub fn emit(&self, payload: &A) {
        let live: Vec<Rc<Callback<A>>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            inner.emissions += 1;
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in live {
            callback(payload);
        }
    }

    /// Number of subscribers whose subscription is still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Total number of emissions since creation.
    #[must_use]
    pub fn emissions(&self) -> u64 {
        self.inner.borrow().emissions
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("subscribers", &inner.subscribers.len())
            .field("emissions", &inner.emissions)
            .finish()
    }
}

/// RAII guard for a [`Signal`] subscription.
///
/// Holds the only strong reference to the callback; dropping it removes the
/// callback before the next emission.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
