use crate::foundation::error::{FramerError, FramerResult};

/// Tuning for gesture recognition.
///
/// Durations are milliseconds, distances CSS pixels, angles radians.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Pinch rotations at or below this magnitude are omitted in normal mode.
    pub rotation_threshold: f64,
    /// Same threshold while precision mode is active.
    pub precision_rotation_threshold: f64,
    /// Two-pointer hold time before precision mode engages.
    pub long_press_ms: u64,
    /// Scale sensitivity multiplier in precision mode.
    pub precision_scale_sensitivity: f64,
    /// Rotation sensitivity multiplier in precision mode.
    pub precision_rotation_sensitivity: f64,
    /// Haptic pulse length on precision-mode entry.
    pub precision_haptic_ms: u64,
    /// A press shorter than this may count as a tap.
    pub tap_max_duration_ms: u64,
    /// A press travelling this far or more is not a tap.
    pub tap_max_travel: f64,
    /// Window in which a second tap forms a double tap.
    pub double_tap_window_ms: u64,
    /// Scale step for wheel ticks scrolling away from the user.
    pub wheel_zoom_out_step: f64,
    /// Scale step for wheel ticks scrolling toward the user.
    pub wheel_zoom_in_step: f64,
    /// Quiet period after the last wheel tick before `TransformEnd`.
    pub wheel_end_debounce_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            rotation_threshold: 5f64.to_radians(),
            precision_rotation_threshold: 0.0,
            long_press_ms: 500,
            precision_scale_sensitivity: 0.3,
            precision_rotation_sensitivity: 0.2,
            precision_haptic_ms: 50,
            tap_max_duration_ms: 300,
            tap_max_travel: 10.0,
            double_tap_window_ms: 300,
            wheel_zoom_out_step: 0.9,
            wheel_zoom_in_step: 1.1,
            wheel_end_debounce_ms: 100,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> FramerResult<()> {
        fn finite_non_negative(name: &str, v: f64) -> FramerResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(FramerError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
            Ok(())
        }

        finite_non_negative("rotation_threshold", self.rotation_threshold)?;
        finite_non_negative(
            "precision_rotation_threshold",
            self.precision_rotation_threshold,
        )?;
        finite_non_negative("tap_max_travel", self.tap_max_travel)?;

        for (name, v) in [
            ("precision_scale_sensitivity", self.precision_scale_sensitivity),
            (
                "precision_rotation_sensitivity",
                self.precision_rotation_sensitivity,
            ),
        ] {
            if !v.is_finite() || v <= 0.0 || v > 1.0 {
                return Err(FramerError::validation(format!(
                    "{name} must be in (0, 1]"
                )));
            }
        }

        if !(self.wheel_zoom_out_step.is_finite()
            && self.wheel_zoom_out_step > 0.0
            && self.wheel_zoom_out_step < 1.0)
        {
            return Err(FramerError::validation(
                "wheel_zoom_out_step must be in (0, 1)",
            ));
        }
        if !(self.wheel_zoom_in_step.is_finite() && self.wheel_zoom_in_step > 1.0) {
            return Err(FramerError::validation("wheel_zoom_in_step must be > 1"));
        }
        if self.long_press_ms == 0 {
            return Err(FramerError::validation("long_press_ms must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/config.rs"]
mod tests;
