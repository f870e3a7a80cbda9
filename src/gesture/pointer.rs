use std::collections::HashMap;

use crate::foundation::core::TimeMs;
use crate::foundation::math::distance;

/// Host-assigned identifier of one contact point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i64);

/// Raw pointer event in client (CSS pixel) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub id: PointerId,
    pub client_x: f64,
    pub client_y: f64,
    pub time: TimeMs,
}

impl PointerInput {
    pub fn new(id: i64, client_x: f64, client_y: f64, time: TimeMs) -> Self {
        Self {
            id: PointerId(id),
            client_x,
            client_y,
            time,
        }
    }
}

/// Raw wheel event. Positive `delta_y` scrolls away from the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    pub delta_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub time: TimeMs,
}

/// Geometry of the pointing surface: on-screen box vs backing-store resolution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceMetrics {
    /// Left edge of the surface in client coordinates.
    pub left: f64,
    /// Top edge of the surface in client coordinates.
    pub top: f64,
    /// On-screen width in CSS pixels.
    pub css_width: f64,
    /// On-screen height in CSS pixels.
    pub css_height: f64,
    /// Backing-store width in device pixels.
    pub native_width: f64,
    /// Backing-store height in device pixels.
    pub native_height: f64,
}

impl SurfaceMetrics {
    /// Surface shown at its native size with the top-left corner at the client origin.
    pub fn unscaled(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            css_width: width,
            css_height: height,
            native_width: width,
            native_height: height,
        }
    }

    /// CSS to native pixel ratio per axis. A collapsed on-screen box maps 1:1.
    pub fn ratio(&self) -> (f64, f64) {
        fn axis(native: f64, css: f64) -> f64 {
            if css > 0.0 && css.is_finite() && native.is_finite() {
                native / css
            } else {
                1.0
            }
        }
        (
            axis(self.native_width, self.css_width),
            axis(self.native_height, self.css_height),
        )
    }

    /// Offset of a client point from the centre of the on-screen box, in CSS pixels.
    pub fn offset_from_center(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (
            client_x - self.left - self.css_width / 2.0,
            client_y - self.top - self.css_height / 2.0,
        )
    }
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self::unscaled(1080.0, 1080.0)
    }
}

/// Tracked state of one active contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerRecord {
    pub id: PointerId,
    pub x: f64,
    pub y: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// Position at the previous pan sample (the press position before the first move).
    pub last_x: f64,
    pub last_y: f64,
    pub down_at: TimeMs,
}

impl PointerRecord {
    pub(crate) fn new(input: &PointerInput) -> Self {
        Self {
            id: input.id,
            x: input.client_x,
            y: input.client_y,
            start_x: input.client_x,
            start_y: input.client_y,
            last_x: input.client_x,
            last_y: input.client_y,
            down_at: input.time,
        }
    }

    /// Straight-line distance from the press position to `(x, y)`.
    pub fn travel_to(&self, x: f64, y: f64) -> f64 {
        distance(self.start_x, self.start_y, x, y)
    }

    /// Make the current position the previous sample.
    pub(crate) fn rebaseline(&mut self) {
        self.last_x = self.x;
        self.last_y = self.y;
    }
}

/// Active pointers keyed by id.
///
/// Pair operations order the two contacts by id so distance/angle samples are stable across
/// frames regardless of hash order.
#[derive(Debug, Default, Clone)]
pub(crate) struct PointerSet {
    by_id: HashMap<PointerId, PointerRecord>,
}

impl PointerSet {
    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn contains(&self, id: PointerId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PointerId) -> Option<&mut PointerRecord> {
        self.by_id.get_mut(&id)
    }

    pub(crate) fn insert(&mut self, record: PointerRecord) {
        self.by_id.insert(record.id, record);
    }

    pub(crate) fn remove(&mut self, id: PointerId) -> Option<PointerRecord> {
        self.by_id.remove(&id)
    }

    pub(crate) fn clear(&mut self) {
        self.by_id.clear();
    }

    pub(crate) fn single_mut(&mut self) -> Option<&mut PointerRecord> {
        if self.by_id.len() != 1 {
            return None;
        }
        self.by_id.values_mut().next()
    }

    pub(crate) fn pair(&self) -> Option<(PointerRecord, PointerRecord)> {
        if self.by_id.len() != 2 {
            return None;
        }
        let mut it = self.by_id.values().copied();
        let a = it.next()?;
        let b = it.next()?;
        if a.id <= b.id { Some((a, b)) } else { Some((b, a)) }
    }
}
