use crate::foundation::core::{Point, TimeMs};
use crate::foundation::error::FramerResult;
use crate::foundation::math::{angle_between, distance, wrap_angle_delta};
use crate::gesture::config::GestureConfig;
use crate::gesture::events::{
    EmittedEvents, GestureEvent, GestureEventKind, GestureListeners, ListenerId,
};
use crate::gesture::pointer::{PointerInput, PointerRecord, PointerSet, SurfaceMetrics, WheelInput};
use crate::gesture::precision::{HapticFeedback, NoHaptics, PrecisionModeController};
use crate::transform::TransformDelta;

/// What the active pointers are doing, derived from how many are down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Panning,
    Pinching,
}

/// Two-pointer sample: the previous frame's geometry for frame-to-frame pinch deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchReference {
    pub distance: f64,
    pub angle: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl PinchReference {
    fn sample(a: &PointerRecord, b: &PointerRecord) -> Self {
        Self {
            distance: distance(a.x, a.y, b.x, b.y),
            angle: angle_between(a.x, a.y, b.x, b.y),
            center_x: (a.x + b.x) / 2.0,
            center_y: (a.y + b.y) / 2.0,
        }
    }
}

/// Turns raw pointer and wheel input into transform deltas and discrete gesture events.
///
/// Every input carries a [`TimeMs`]; timers (precision long press, double-tap window, wheel
/// debounce) fire when an input or [`GestureEngine::advance_to`] reaches their deadline, before
/// the input itself is processed.
pub struct GestureEngine {
    config: GestureConfig,
    enabled: bool,
    metrics: SurfaceMetrics,

    pointers: PointerSet,
    session: SessionState,
    pinch: Option<PinchReference>,
    precision: PrecisionModeController,

    double_tap_deadline: Option<TimeMs>,
    wheel_end_deadline: Option<TimeMs>,

    listeners: GestureListeners,
    haptics: Box<dyn HapticFeedback>,
}

impl std::fmt::Debug for GestureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureEngine")
            .field("enabled", &self.enabled)
            .field("session", &self.session)
            .field("pointers", &self.pointers.len())
            .field("precision", &self.precision.state())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::with_config_unchecked(GestureConfig::default())
    }
}

impl GestureEngine {
    /// Create a disabled engine with a validated configuration.
    pub fn new(config: GestureConfig) -> FramerResult<Self> {
        config.validate()?;
        Ok(Self::with_config_unchecked(config))
    }

    fn with_config_unchecked(config: GestureConfig) -> Self {
        Self {
            config,
            enabled: false,
            metrics: SurfaceMetrics::default(),
            pointers: PointerSet::default(),
            session: SessionState::Idle,
            pinch: None,
            precision: PrecisionModeController::new(),
            double_tap_deadline: None,
            wheel_end_deadline: None,
            listeners: GestureListeners::new(),
            haptics: Box::new(NoHaptics),
        }
    }

    pub fn with_haptics(mut self, haptics: impl HapticFeedback + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_surface_metrics(&mut self, metrics: SurfaceMetrics) {
        self.metrics = metrics;
    }

    pub fn surface_metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop accepting input and drop every pointer, timer, and session.
    ///
    /// Listeners see the session close (`PrecisionModeExit`, `TransformEnd`) when one was open.
    pub fn disable(&mut self) -> EmittedEvents {
        let mut out = EmittedEvents::new();
        self.enabled = false;
        let was_open = self.session != SessionState::Idle || self.wheel_end_deadline.is_some();
        self.pointers.clear();
        self.session = SessionState::Idle;
        self.pinch = None;
        self.double_tap_deadline = None;
        self.wheel_end_deadline = None;
        if self.precision.release_all() {
            self.emit(&mut out, GestureEvent::PrecisionModeExit);
        }
        if was_open {
            self.emit(&mut out, GestureEvent::TransformEnd);
        }
        tracing::debug!("gesture engine disabled");
        out
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_precision_mode(&self) -> bool {
        self.precision.is_active()
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pinch_reference(&self) -> Option<PinchReference> {
        self.pinch
    }

    pub fn on(
        &mut self,
        kind: GestureEventKind,
        handler: impl FnMut(&GestureEvent) + 'static,
    ) -> ListenerId {
        self.listeners.on(kind, handler)
    }

    pub fn on_any(&mut self, handler: impl FnMut(&GestureEvent) + 'static) -> ListenerId {
        self.listeners.on_any(handler)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.off(id)
    }

    /// Earliest pending timer deadline, for hosts that schedule wake-ups.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        [
            self.precision.deadline(),
            self.double_tap_deadline,
            self.wheel_end_deadline,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fire every timer due at or before `now`.
    pub fn advance_to(&mut self, now: TimeMs) -> EmittedEvents {
        let mut out = EmittedEvents::new();
        self.fire_due(now, &mut out);
        out
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> EmittedEvents {
        let mut out = EmittedEvents::new();
        if !self.enabled {
            return out;
        }
        self.fire_due(input.time, &mut out);
        if self.pointers.contains(input.id) {
            tracing::trace!(id = input.id.0, "duplicate pointer down ignored");
            return out;
        }

        self.pointers.insert(PointerRecord::new(&input));
        match self.pointers.len() {
            1 => {
                self.session = SessionState::Panning;
                self.emit(&mut out, GestureEvent::TransformStart);
            }
            2 => {
                self.session = SessionState::Pinching;
                self.pinch = self.pointers.pair().map(|(a, b)| PinchReference::sample(&a, &b));
                self.precision.arm(input.time, self.config.long_press_ms);
            }
            _ => {
                // Three or more contacts: pinch samples pause until the count is back to two.
                self.precision.cancel_pending();
                self.pinch = None;
            }
        }
        tracing::trace!(
            id = input.id.0,
            pointers = self.pointers.len(),
            session = ?self.session,
            "pointer down"
        );
        out
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> EmittedEvents {
        let mut out = EmittedEvents::new();
        if !self.enabled || !self.pointers.contains(input.id) {
            return out;
        }
        self.fire_due(input.time, &mut out);
        if let Some(p) = self.pointers.get_mut(input.id) {
            p.x = input.client_x;
            p.y = input.client_y;
        }

        match (self.session, self.pointers.len()) {
            (SessionState::Panning, 1) => self.pan_move(&mut out),
            (SessionState::Pinching, 2) => self.pinch_move(&mut out),
            _ => {}
        }
        out
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> EmittedEvents {
        self.release(input)
    }

    pub fn pointer_cancel(&mut self, input: PointerInput) -> EmittedEvents {
        self.release(input)
    }

    pub fn wheel(&mut self, input: WheelInput) -> EmittedEvents {
        let mut out = EmittedEvents::new();
        if !self.enabled {
            return out;
        }
        self.fire_due(input.time, &mut out);

        let step = if input.delta_y > 0.0 {
            self.config.wheel_zoom_out_step
        } else {
            self.config.wheel_zoom_in_step
        };
        let (ox, oy) = self.metrics.offset_from_center(input.client_x, input.client_y);
        let (rx, ry) = self.metrics.ratio();
        let delta = TransformDelta {
            dx: ox * rx * (1.0 - step),
            dy: oy * ry * (1.0 - step),
            scale: Some(step),
            rotation: None,
        };

        self.emit(&mut out, GestureEvent::TransformStart);
        self.emit(&mut out, GestureEvent::TransformUpdate(delta));
        self.wheel_end_deadline = Some(input.time.after(self.config.wheel_end_debounce_ms));
        out
    }

    fn pan_move(&mut self, out: &mut EmittedEvents) {
        let (rx, ry) = self.metrics.ratio();
        let Some(p) = self.pointers.single_mut() else {
            return;
        };
        let dx = (p.x - p.last_x) * rx;
        let dy = (p.y - p.last_y) * ry;
        p.rebaseline();
        if dx != 0.0 || dy != 0.0 {
            self.emit(out, GestureEvent::TransformUpdate(TransformDelta::pan(dx, dy)));
        }
    }

    fn pinch_move(&mut self, out: &mut EmittedEvents) {
        let Some((a, b)) = self.pointers.pair() else {
            return;
        };
        let current = PinchReference::sample(&a, &b);
        let Some(prev) = self.pinch.replace(current) else {
            return;
        };

        let raw_scale = if prev.distance > f64::EPSILON {
            current.distance / prev.distance
        } else {
            1.0
        };
        let raw_rotation = wrap_angle_delta(current.angle - prev.angle);
        let (scale, rotation) = self.precision.damp(raw_scale, raw_rotation, &self.config);

        let (rx, ry) = self.metrics.ratio();
        let threshold = self.precision.rotation_threshold(&self.config);
        let delta = TransformDelta {
            dx: (current.center_x - prev.center_x) * rx,
            dy: (current.center_y - prev.center_y) * ry,
            scale: Some(scale),
            rotation: (rotation.abs() > threshold).then_some(rotation),
        };
        self.emit(out, GestureEvent::TransformUpdate(delta));
    }

    fn release(&mut self, input: PointerInput) -> EmittedEvents {
        let mut out = EmittedEvents::new();
        if !self.enabled || !self.pointers.contains(input.id) {
            return out;
        }
        self.fire_due(input.time, &mut out);

        let sole = self.pointers.len() == 1;
        if let Some(rec) = self.pointers.remove(input.id) {
            let held = input.time.since(rec.down_at);
            let travel = rec.travel_to(input.client_x, input.client_y);
            if sole && held < self.config.tap_max_duration_ms && travel < self.config.tap_max_travel
            {
                self.register_tap(Point::new(input.client_x, input.client_y), input.time, &mut out);
            }
        }

        match self.pointers.len() {
            0 => {
                self.session = SessionState::Idle;
                self.pinch = None;
                if self.precision.release_all() {
                    tracing::debug!("precision mode exit");
                    self.emit(&mut out, GestureEvent::PrecisionModeExit);
                }
                self.emit(&mut out, GestureEvent::TransformEnd);
            }
            1 => {
                self.session = SessionState::Panning;
                self.pinch = None;
                self.precision.cancel_pending();
                if let Some(p) = self.pointers.single_mut() {
                    p.rebaseline();
                }
            }
            2 => {
                // Back from three contacts: resample so the next pinch delta starts here.
                self.pinch = self.pointers.pair().map(|(a, b)| PinchReference::sample(&a, &b));
            }
            _ => {}
        }
        tracing::trace!(
            id = input.id.0,
            pointers = self.pointers.len(),
            session = ?self.session,
            "pointer released"
        );
        out
    }

    fn register_tap(&mut self, at: Point, now: TimeMs, out: &mut EmittedEvents) {
        if self.double_tap_deadline.take().is_some() {
            self.emit(out, GestureEvent::DoubleTap(at));
        } else {
            self.double_tap_deadline = Some(now.after(self.config.double_tap_window_ms));
        }
    }

    fn fire_due(&mut self, now: TimeMs, out: &mut EmittedEvents) {
        enum Timer {
            Precision,
            DoubleTap,
            WheelEnd,
        }

        loop {
            let next = [
                (self.precision.deadline(), Timer::Precision),
                (self.double_tap_deadline, Timer::DoubleTap),
                (self.wheel_end_deadline, Timer::WheelEnd),
            ]
            .into_iter()
            .filter_map(|(d, t)| d.filter(|d| *d <= now).map(|d| (d, t)))
            .min_by_key(|(d, _)| *d);

            let Some((_, timer)) = next else {
                break;
            };
            match timer {
                Timer::Precision => {
                    if self.precision.poll(now, self.pointers.len()) {
                        tracing::debug!("precision mode enter");
                        self.haptics.pulse(self.config.precision_haptic_ms);
                        self.emit(out, GestureEvent::PrecisionModeEnter);
                    }
                }
                Timer::DoubleTap => {
                    // Window lapsed: that was a single tap, which is not observable.
                    self.double_tap_deadline = None;
                }
                Timer::WheelEnd => {
                    self.wheel_end_deadline = None;
                    self.emit(out, GestureEvent::TransformEnd);
                }
            }
        }
    }

    fn emit(&mut self, out: &mut EmittedEvents, event: GestureEvent) {
        self.listeners.emit(&event);
        out.push(event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/engine.rs"]
mod tests;
