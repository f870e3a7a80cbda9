use std::sync::Arc;

use crate::assets::decode::RasterImage;
use crate::foundation::core::Rgba8;

/// User-added text and image layers, positioned in percentages of the output size.
///
/// The renderer only reads this state.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CustomOverlayState {
    pub text: Option<TextOverlay>,
    pub image: Option<ImageOverlay>,
}

impl CustomOverlayState {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image.is_none()
    }

    /// Text block that should be drawn, if any.
    pub fn drawable_text(&self) -> Option<&TextOverlay> {
        self.text
            .as_ref()
            .filter(|t| t.enabled && t.visible && !t.content.trim().is_empty())
    }

    /// Image block that should be drawn on the given side of the text, if any.
    pub fn drawable_image(&self, behind_text: bool) -> Option<(&ImageOverlay, &RasterImage)> {
        let img = self.image.as_ref()?;
        if !img.enabled || !img.visible || img.behind_text != behind_text {
            return None;
        }
        let raster = img.image.as_deref()?;
        Some((img, raster))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextOverlay {
    pub enabled: bool,
    pub visible: bool,
    /// Lines are split on `\n`.
    pub content: String,
    /// Font size in output pixels.
    pub font_size: f32,
    pub color: Rgba8,
    pub rotation_deg: f64,
    pub position_x_percent: f64,
    pub position_y_percent: f64,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            content: String::new(),
            font_size: 48.0,
            color: Rgba8::WHITE,
            rotation_deg: 0.0,
            position_x_percent: 50.0,
            position_y_percent: 85.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageOverlay {
    pub enabled: bool,
    pub visible: bool,
    /// Decoded overlay pixels. Not serialized.
    #[serde(skip)]
    pub image: Option<Arc<RasterImage>>,
    pub size_percent: f64,
    pub opacity_percent: f64,
    pub position_x_percent: f64,
    pub position_y_percent: f64,
    pub behind_text: bool,
}

impl Default for ImageOverlay {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            image: None,
            size_percent: 50.0,
            opacity_percent: 100.0,
            position_x_percent: 50.0,
            position_y_percent: 50.0,
            behind_text: true,
        }
    }
}

impl ImageOverlay {
    /// Uniform scale so the image's longer side fills `min(w, h) * base_fraction * size%`.
    pub fn scale_for(
        &self,
        raster: &RasterImage,
        out_w: u32,
        out_h: u32,
        base_fraction: f64,
    ) -> f64 {
        let longest = raster.width.max(raster.height);
        if longest == 0 {
            return 0.0;
        }
        let bound = f64::from(out_w.min(out_h)) * base_fraction * (self.size_percent / 100.0);
        bound / f64::from(longest)
    }

    pub fn opacity(&self) -> f32 {
        (self.opacity_percent / 100.0).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
