//! Two-finger long-press "precision mode".
//!
//! `Inactive -> Armed` when the second pointer lands, `Armed -> Active` when the long-press
//! deadline passes with exactly two pointers still down, `Active -> Inactive` only when every
//! pointer has lifted. Any pointer-count change while armed cancels the deadline.

use crate::foundation::core::TimeMs;
use crate::gesture::config::GestureConfig;

/// Best-effort tactile feedback provided by the host.
pub trait HapticFeedback {
    /// Vibrate for `duration_ms`. Returns `false` when unsupported; never fails.
    fn pulse(&mut self, duration_ms: u64) -> bool;
}

/// Host without haptics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&mut self, _duration_ms: u64) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecisionState {
    Inactive,
    Armed { deadline: TimeMs },
    Active,
}

#[derive(Clone, Copy, Debug)]
pub struct PrecisionModeController {
    state: PrecisionState,
}

impl Default for PrecisionModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl PrecisionModeController {
    pub fn new() -> Self {
        Self {
            state: PrecisionState::Inactive,
        }
    }

    pub fn state(&self) -> PrecisionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PrecisionState::Active
    }

    /// Pending long-press deadline, if armed.
    pub fn deadline(&self) -> Option<TimeMs> {
        match self.state {
            PrecisionState::Armed { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Second pointer landed. Replaces any pending deadline; no-op while active.
    pub fn arm(&mut self, now: TimeMs, delay_ms: u64) {
        if self.is_active() {
            return;
        }
        self.state = PrecisionState::Armed {
            deadline: now.after(delay_ms),
        };
    }

    /// Pointer count changed while armed.
    pub fn cancel_pending(&mut self) {
        if matches!(self.state, PrecisionState::Armed { .. }) {
            self.state = PrecisionState::Inactive;
        }
    }

    /// Fire the long-press deadline if due. Returns `true` on entry into precision mode.
    pub fn poll(&mut self, now: TimeMs, pointer_count: usize) -> bool {
        let PrecisionState::Armed { deadline } = self.state else {
            return false;
        };
        if now < deadline {
            return false;
        }
        if pointer_count == 2 {
            self.state = PrecisionState::Active;
            true
        } else {
            self.state = PrecisionState::Inactive;
            false
        }
    }

    /// Every pointer lifted (or the engine was disabled). Returns `true` if precision mode was
    /// active and has now exited.
    pub fn release_all(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = PrecisionState::Inactive;
        was_active
    }

    /// Dampen a frame-to-frame pinch sample when active.
    ///
    /// `scale' = 1 + (scale - 1) * s_scale`, `rotation' = rotation * s_rot`.
    pub fn damp(&self, scale: f64, rotation: f64, config: &GestureConfig) -> (f64, f64) {
        if !self.is_active() {
            return (scale, rotation);
        }
        (
            1.0 + (scale - 1.0) * config.precision_scale_sensitivity,
            rotation * config.precision_rotation_sensitivity,
        )
    }

    /// Rotation magnitude at or below which a pinch sample carries no rotation.
    pub fn rotation_threshold(&self, config: &GestureConfig) -> f64 {
        if self.is_active() {
            config.precision_rotation_threshold
        } else {
            config.rotation_threshold
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/precision.rs"]
mod tests;
