// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a dispatch sequence and honor stop outcomes.
//!
//! The dispatcher executes handlers for each step in a responder sequence and
//! applies simple propagation rules. It is deliberately minimal:
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - The return value from [`run`] reports where propagation stopped (if at all).
//! - Higher‑level semantics such as “default prevented” live on the event
//!   payload you pass to [`run`], not in [`Outcome`].
//!
//! Dispatch sequences are typically produced by
//! [`Router::dispatch_for`](crate::router::Router::dispatch_for). Handlers
//! usually look up the listeners registered on `d.node` in a
//! [`ListenerTable`](crate::listeners::ListenerTable) and invoke them.
//!
//! ## Minimal example
//!
//! ```
//! use understory_responder::dispatcher;
//! use understory_responder::types::{Dispatch, Outcome, Phase};
//!
//! let seq: Vec<Dispatch<u32>> = vec![
//!     Dispatch::capture(1),
//!     Dispatch::target(2),
//!     Dispatch::bubble(1),
//! ];
//!
//! let mut handled: Vec<(Phase, u32)> = Vec::new();
//! let stop_at = dispatcher::run(&seq, &mut (), |d, _| {
//!     handled.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//!
//! assert!(stop_at.is_none());
//! assert_eq!(handled, vec![(Phase::Capture, 1), (Phase::Target, 2), (Phase::Bubble, 1)]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// - [`Outcome::Continue`]: keep going.
/// - [`Outcome::Stop`]: abort propagation immediately (no later phases).
///
/// Returns `None` if the full sequence was visited, or the entry at which a
/// handler returned [`Outcome::Stop`].
///
/// ### Stop propagation in capture (no target/bubble)
///
/// ```
/// use understory_responder::dispatcher::run;
/// use understory_responder::types::{Dispatch, Outcome, Phase};
///
/// let seq: Vec<Dispatch<u32>> = vec![
///     Dispatch::capture(1),
///     Dispatch::capture(2),
///     Dispatch::target(3),
/// ];
///
/// let mut seen = Vec::new();
/// let stopped = run(&seq, &mut (), |d, _| {
///     seen.push(d.node);
///     if d.phase == Phase::Capture && d.node == 1 { Outcome::Stop } else { Outcome::Continue }
/// });
///
/// assert!(stopped.is_some());
/// assert_eq!(seen, vec![1]);
/// ```
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    // The router already emits dispatch entries in capture → target → bubble
    // order, grouped by phase. We simply walk them in sequence.
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use alloc::vec;
    use alloc::vec::Vec;

    fn mk_seq() -> Vec<Dispatch<u32>> {
        vec![
            Dispatch::capture(1),
            Dispatch::capture(2),
            Dispatch::target(3),
            Dispatch::bubble(2),
            Dispatch::bubble(1),
        ]
    }

    #[test]
    fn continue_through_all() {
        let seq = mk_seq();
        let mut count = 0;
        let stopped = run(&seq, &mut count, |_, n| {
            *n += 1;
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(count, seq.len());
    }

    #[test]
    fn default_prevention_lives_on_the_event() {
        #[derive(Default)]
        struct Ev {
            default_prevented: bool,
        }

        let seq = mk_seq();
        let mut ev = Ev::default();
        let stopped = run(&seq, &mut ev, |d, e| {
            if d.phase == Phase::Target {
                e.default_prevented = true;
            }
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert!(ev.default_prevented);
    }

    #[test]
    fn stop_in_bubble_aborts_remaining_bubble_entries() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            if d.phase == Phase::Bubble && d.node == 2 {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped, Some(&Dispatch::bubble(2)));
        assert_eq!(
            seen,
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
            ]
        );
    }
}
