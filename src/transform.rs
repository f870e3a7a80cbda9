//! Affine placement of the user's photo inside the output canvas.
//!
//! The transform is a value type. The application session is its only writer; the renderer and
//! the exporter receive copies.

use crate::foundation::core::{Affine, Canvas, Rect, Vec2};
use crate::foundation::math::normalize_angle;

/// Smallest allowed uniform scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed uniform scale.
pub const MAX_SCALE: f64 = 5.0;

fn clamp_scale(s: f64) -> f64 {
    s.clamp(MIN_SCALE, MAX_SCALE)
}

/// Relative change produced by a gesture.
///
/// `scale` is multiplicative and `rotation` additive (radians). `None` means "no change" and is
/// distinct from `Some(1.0)` / `Some(0.0)`: a pinch below the rotation threshold omits the
/// rotation entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformDelta {
    /// Horizontal translation in output pixels.
    pub dx: f64,
    /// Vertical translation in output pixels.
    pub dy: f64,
    /// Multiplicative scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Additive rotation in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl TransformDelta {
    /// Pure translation.
    pub fn pan(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            scale: None,
            rotation: None,
        }
    }

    /// Return `true` when applying the delta would leave a transform unchanged.
    pub fn is_identity(&self) -> bool {
        self.dx == 0.0
            && self.dy == 0.0
            && self.scale.is_none_or(|s| s == 1.0)
            && self.rotation.is_none_or(|r| r == 0.0)
    }
}

/// Photo placement: translation from the canvas centre, uniform scale, rotation in radians.
///
/// `scale` is always inside `[MIN_SCALE, MAX_SCALE]`. `rotation` is an unbounded accumulator;
/// use [`PhotoTransform::display_rotation`] for a normalized value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoTransform {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) scale: f64,
    pub(crate) rotation: f64,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PhotoTransform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    /// Construct a transform, clamping `scale`.
    pub fn new(x: f64, y: f64, scale: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            scale: clamp_scale(scale),
            rotation,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation normalized into `[0, 2π)`.
    pub fn display_rotation(&self) -> f64 {
        normalize_angle(self.rotation)
    }

    /// Rotation in whole degrees `[0, 360)`, for sliders and labels.
    pub fn display_rotation_degrees(&self) -> f64 {
        let deg = self.display_rotation().to_degrees().round();
        if deg >= 360.0 { 0.0 } else { deg }
    }

    /// `x += dx; y += dy; scale = clamp(scale * factor); rotation += delta`.
    pub fn apply_delta(
        &mut self,
        dx: f64,
        dy: f64,
        scale_factor: Option<f64>,
        rotation: Option<f64>,
    ) {
        self.x += dx;
        self.y += dy;
        if let Some(f) = scale_factor {
            self.scale = clamp_scale(self.scale * f);
        }
        if let Some(r) = rotation {
            self.rotation += r;
        }
    }

    pub fn apply(&mut self, delta: &TransformDelta) {
        self.apply_delta(delta.dx, delta.dy, delta.scale, delta.rotation);
    }

    pub fn set_absolute_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    pub fn set_absolute_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    /// Move the photo back to the canvas centre, keeping scale and rotation.
    pub fn recenter(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }

    /// Canonical fit: inscribe `content` inside `safe_area`, centred and unrotated.
    pub fn fit(content_width: f64, content_height: f64, safe_area: Rect) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: clamp_scale(fit_scale(content_width, content_height, safe_area)),
            rotation: 0.0,
        }
    }

    /// Replace `self` with the canonical fit for `content` in `safe_area`.
    pub fn reset_to_fit(&mut self, content_width: f64, content_height: f64, safe_area: Rect) {
        *self = Self::fit(content_width, content_height, safe_area);
    }

    /// Affine mapping photo pixel space onto the canvas.
    ///
    /// The photo's centre lands at `canvas_centre + (x, y)`; it is rotated, then scaled about that
    /// point, at native pixel size.
    pub fn to_affine(&self, canvas: Canvas, photo_width: u32, photo_height: u32) -> Affine {
        let c = canvas.center();
        Affine::translate(Vec2::new(c.x + self.x, c.y + self.y))
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(Vec2::new(
                -f64::from(photo_width) / 2.0,
                -f64::from(photo_height) / 2.0,
            ))
    }
}

/// Scale that inscribes `content` inside `safe_area`.
///
/// Width-bound when the content is relatively wider than the safe area, height-bound otherwise.
/// Degenerate sizes yield `1.0`.
pub fn fit_scale(content_width: f64, content_height: f64, safe_area: Rect) -> f64 {
    if content_width <= 0.0
        || content_height <= 0.0
        || safe_area.width() <= 0.0
        || safe_area.height() <= 0.0
    {
        return 1.0;
    }
    let content_aspect = content_width / content_height;
    let safe_aspect = safe_area.width() / safe_area.height();
    if content_aspect > safe_aspect {
        safe_area.width() / content_width
    } else {
        safe_area.height() / content_height
    }
}

#[cfg(test)]
#[path = "../tests/unit/transform.rs"]
mod tests;
