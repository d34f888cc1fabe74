// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Activation recognition from raw pointer input.
//!
//! Role handlers listen for [`EventKind::Activate`](crate::types::EventKind::Activate),
//! not for pointer presses. [`ClickState`] turns a pointer down/up pair into
//! a single activation target:
//!
//! 1. Down and up on the same target: activation of that target.
//! 2. Different targets: activation of the *pressed* target only while the
//!    configured distance and time tolerances hold (and the pointer never
//!    strayed beyond the distance tolerance in between). This keeps a tab
//!    header activatable while it shifts under the pointer, for example
//!    when a close control next to it disappears.
//! 3. Mismatched button or no recorded press: nothing.
//!
//! ```
//! use kurbo::Point;
//! use understory_responder::click::{ClickResult, ClickState};
//!
//! let mut state: ClickState<u32> = ClickState::with_thresholds(Some(10.0), Some(500));
//! state.on_down(None, None, 42, Point::new(10.0, 20.0), 1000);
//! assert!(state.on_move(None, Point::new(15.0, 25.0)).is_none());
//!
//! // Released over another element, but close enough and soon enough.
//! let result = state.on_up(None, None, &99, Point::new(18.0, 26.0), 1200);
//! assert_eq!(result, ClickResult::Click(42));
//! ```

use alloc::collections::BTreeMap;
use core::num::NonZeroU64;

use kurbo::Point;

/// Pointer identifier for tracking multiple concurrent presses.
pub type PointerId = NonZeroU64;

/// Mouse button identifier.
pub type Button = u8;

/// Pointer used when the caller does not distinguish pointers.
pub const PRIMARY_POINTER: PointerId = NonZeroU64::MIN;

/// Button used when the caller does not distinguish buttons.
pub const PRIMARY_BUTTON: Button = 1;

/// State for an active pointer press.
#[derive(Clone, Debug)]
pub struct Press<K> {
    /// Target element where press occurred.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp when press occurred, in milliseconds.
    pub down_time: u64,
    /// Button that was pressed.
    pub button: Button,
    /// True once the pointer moved beyond the distance tolerance.
    pub distance_exceeded: bool,
}

/// Result of a pointer release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// Activate the given target.
    Click(K),
    /// No activation; carries the pressed target if there was one.
    Suppressed(Option<K>),
}

/// Press tracking per pointer.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    presses: BTreeMap<PointerId, Press<K>>,
    /// Distance tolerance for releases over a different target, or `None` for unlimited.
    pub total_pointer_moved_threshold: Option<f64>,
    /// Time tolerance (milliseconds) for releases over a different target, or `None` for unlimited.
    pub time_threshold: Option<u64>,
}

impl<K: PartialEq + Clone> Default for ClickState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Default tolerances: 5 pixels and 100 milliseconds.
    pub fn new() -> Self {
        Self::with_thresholds(Some(5.0), Some(100))
    }

    /// Custom tolerances. With both `None`, only same-target releases activate.
    pub fn with_thresholds(
        total_pointer_moved_threshold: Option<f64>,
        time_threshold: Option<u64>,
    ) -> Self {
        Self {
            presses: BTreeMap::new(),
            total_pointer_moved_threshold,
            time_threshold,
        }
    }

    /// Record a press. A second press of the same pointer replaces the first.
    pub fn on_down(
        &mut self,
        pointer_id: Option<PointerId>,
        button: Option<Button>,
        target: K,
        position: Point,
        timestamp: u64,
    ) {
        self.presses.insert(
            pointer_id.unwrap_or(PRIMARY_POINTER),
            Press {
                target,
                down_position: position,
                down_time: timestamp,
                button: button.unwrap_or(PRIMARY_BUTTON),
                distance_exceeded: false,
            },
        );
    }

    /// Track movement; returns the pressed target when the distance tolerance
    /// is exceeded for the first time.
    pub fn on_move(&mut self, pointer_id: Option<PointerId>, position: Point) -> Option<K> {
        let press = self.presses.get_mut(&pointer_id.unwrap_or(PRIMARY_POINTER))?;
        let threshold = self.total_pointer_moved_threshold?;
        if press.distance_exceeded || press.down_position.distance(position) <= threshold {
            return None;
        }
        press.distance_exceeded = true;
        Some(press.target.clone())
    }

    /// Resolve a release into an activation target.
    pub fn on_up(
        &mut self,
        pointer_id: Option<PointerId>,
        button: Option<Button>,
        current_target: &K,
        position: Point,
        timestamp: u64,
    ) -> ClickResult<K> {
        let Some(press) = self.presses.remove(&pointer_id.unwrap_or(PRIMARY_POINTER)) else {
            return ClickResult::Suppressed(None);
        };
        if press.button != button.unwrap_or(PRIMARY_BUTTON) {
            return ClickResult::Suppressed(Some(press.target));
        }
        if press.target == *current_target {
            return ClickResult::Click(press.target);
        }
        if (self.total_pointer_moved_threshold.is_none() && self.time_threshold.is_none())
            || press.distance_exceeded
        {
            return ClickResult::Suppressed(Some(press.target));
        }

        let distance_ok = self
            .total_pointer_moved_threshold
            .is_none_or(|t| press.down_position.distance(position) <= t);
        let time_ok = self
            .time_threshold
            .is_none_or(|t| timestamp.saturating_sub(press.down_time) <= t);

        if distance_ok && time_ok {
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Forget the press of a pointer; returns true if one was active.
    pub fn cancel(&mut self, pointer_id: Option<PointerId>) -> bool {
        self.presses
            .remove(&pointer_id.unwrap_or(PRIMARY_POINTER))
            .is_some()
    }

    /// Forget presses on `target`, for example when its element was removed.
    pub fn forget_target(&mut self, target: &K) {
        self.presses.retain(|_, press| press.target != *target);
    }

    /// Returns true if some pointer is currently pressed on `target`.
    pub fn has_active_press(&self, target: &K) -> bool {
        self.presses.values().any(|press| press.target == *target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_target_generates_click() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(None, None, 42, Point::new(10.0, 20.0), 1000);
        // Movement and time do not matter for the same target.
        let result = state.on_up(None, None, &42, Point::new(300.0, 20.0), 9000);
        assert_eq!(result, ClickResult::Click(42));
    }

    #[test]
    fn different_target_outside_tolerance_is_suppressed() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(None, None, 1, Point::new(0.0, 0.0), 0);
        let far = state.on_up(None, None, &2, Point::new(50.0, 0.0), 10);
        assert_eq!(far, ClickResult::Suppressed(Some(1)));

        state.on_down(None, None, 1, Point::new(0.0, 0.0), 0);
        let late = state.on_up(None, None, &2, Point::new(1.0, 0.0), 1000);
        assert_eq!(late, ClickResult::Suppressed(Some(1)));
    }

    #[test]
    fn wandering_pointer_is_remembered() {
        let mut state: ClickState<u32> = ClickState::new();
        state.on_down(None, None, 1, Point::new(0.0, 0.0), 0);
        assert_eq!(state.on_move(None, Point::new(40.0, 0.0)), Some(1));
        assert_eq!(state.on_move(None, Point::new(41.0, 0.0)), None);
        // Came back close to the origin, but the excursion already disqualified it.
        let result = state.on_up(None, None, &2, Point::new(1.0, 0.0), 10);
        assert_eq!(result, ClickResult::Suppressed(Some(1)));
    }

    #[test]
    fn button_mismatch_and_missing_press() {
        let mut state: ClickState<u32> = ClickState::new();
        assert_eq!(
            state.on_up(None, None, &1, Point::ZERO, 0),
            ClickResult::Suppressed(None)
        );
        state.on_down(None, Some(2), 1, Point::ZERO, 0);
        assert_eq!(
            state.on_up(None, Some(1), &1, Point::ZERO, 0),
            ClickResult::Suppressed(Some(1))
        );
    }

    #[test]
    fn pointers_are_independent() {
        let mut state: ClickState<u32> = ClickState::new();
        let second = NonZeroU64::new(2).unwrap();
        state.on_down(None, None, 1, Point::ZERO, 0);
        state.on_down(Some(second), None, 2, Point::ZERO, 0);
        assert!(state.has_active_press(&2));

        state.forget_target(&2);
        assert!(!state.has_active_press(&2));
        assert!(!state.cancel(Some(second)));
        assert_eq!(
            state.on_up(None, None, &1, Point::ZERO, 5),
            ClickResult::Click(1)
        );
    }
}
