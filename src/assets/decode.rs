use std::sync::Arc;

use crate::foundation::error::{FramerError, FramerResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Take ownership of a straight-alpha buffer and premultiply it.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }

    /// Uniformly filled image with a straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_rgba_image(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(rgba),
        ))
    }

    pub fn byte_len(&self) -> usize {
        self.rgba8_premul.len()
    }
}

pub fn decode_image(bytes: &[u8]) -> FramerResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| FramerError::decode(format!("decode image from memory: {e}")))?;
    Ok(RasterImage::from_rgba_image(dyn_img.to_rgba8()))
}

pub fn parse_svg(bytes: &[u8]) -> FramerResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts).map_err(|e| FramerError::decode(format!("parse svg: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
