// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small broadcast emitter for controller notifications.
//!
//! ```
//! use understory_roles::emitter::Emitter;
//!
//! let mut emitter: Emitter<u32> = Emitter::new();
//! let id = emitter.on(|n| assert!(*n > 0));
//! emitter.broadcast(&3);
//! assert!(emitter.off(id));
//! assert!(emitter.is_empty());
//! ```

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

/// Handle returned by [`Emitter::on`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Subscriber<E> = Box<dyn FnMut(&E)>;

/// Ordered list of subscribers to events of type `E`.
pub struct Emitter<E> {
    subscribers: Vec<(SubscriptionId, Subscriber<E>)>,
    next: u32,
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Emitter<E> {
    /// Create an emitter with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next: 0,
        }
    }

    /// Subscribe; subscribers run in subscription order.
    pub fn on(&mut self, subscriber: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next = self.next.wrapping_add(1);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Unsubscribe. Returns false if `id` was not subscribed.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(other, _)| *other != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber.
    pub fn broadcast(&mut self, event: &E) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }

    /// Drop every subscriber.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns true if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    #[test]
    fn delivers_in_order_and_unsubscribes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        let a = {
            let seen = seen.clone();
            emitter.on(move |n: &u32| seen.borrow_mut().push(('a', *n)))
        };
        {
            let seen = seen.clone();
            emitter.on(move |n: &u32| seen.borrow_mut().push(('b', *n)));
        }

        emitter.broadcast(&1);
        assert!(emitter.off(a));
        assert!(!emitter.off(a));
        emitter.broadcast(&2);

        assert_eq!(*seen.borrow(), [('a', 1), ('b', 1), ('b', 2)]);
        assert_eq!(emitter.len(), 1);
    }
}
