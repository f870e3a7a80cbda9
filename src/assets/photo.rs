use crate::assets::decode::RasterImage;
use crate::assets::exif::{Orientation, read_orientation};
use crate::foundation::core::TimeMs;
use crate::foundation::error::{FramerError, FramerResult};
use crate::session::resources::{ResourceKind, ResourceTracker};

/// Limits applied while turning uploaded bytes into a [`Photo`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhotoOpts {
    /// Longest side after downscaling.
    pub max_dimension: u32,
}

impl Default for PhotoOpts {
    fn default() -> Self {
        Self {
            max_dimension: 3000,
        }
    }
}

/// An upright, size-limited photo ready to composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    pub raster: RasterImage,
    /// Orientation that was corrected during processing.
    pub orientation: Orientation,
    /// Decoded size before orientation correction and downscaling.
    pub source_width: u32,
    pub source_height: u32,
}

impl Photo {
    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }

    pub fn from_raster(raster: RasterImage) -> Self {
        Self {
            source_width: raster.width,
            source_height: raster.height,
            raster,
            orientation: Orientation::Normal,
        }
    }
}

/// Size that fits `max_dim` on the longer side, aspect preserved and rounded.
pub fn downscaled_size(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dim {
        return (width, height);
    }
    let scale = f64::from(max_dim) / f64::from(longest);
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Read orientation, decode, correct, and downscale uploaded image bytes.
pub fn process_photo(bytes: &[u8], opts: &PhotoOpts) -> FramerResult<Photo> {
    process_photo_tracked(bytes, opts, &mut ResourceTracker::default(), TimeMs(0))
}

/// [`process_photo`] with the upload and every intermediate buffer registered in `tracker`.
///
/// Each pass holds a scoped handle that is released when the pass ends, on error too.
#[tracing::instrument(skip(bytes, tracker), fields(len = bytes.len()))]
pub fn process_photo_tracked(
    bytes: &[u8],
    opts: &PhotoOpts,
    tracker: &mut ResourceTracker,
    now: TimeMs,
) -> FramerResult<Photo> {
    if opts.max_dimension == 0 {
        return Err(FramerError::validation("max_dimension must be > 0"));
    }
    let orientation = read_orientation(bytes);

    let decoded = {
        let _upload = tracker.scoped(ResourceKind::Blob, bytes.len() as u64, "photo upload", now);
        image::load_from_memory(bytes)
            .map_err(|e| FramerError::decode(format!("decode photo: {e}")))?
    };
    let (source_width, source_height) = (decoded.width(), decoded.height());
    if source_width == 0 || source_height == 0 {
        return Err(FramerError::decode("photo has zero size"));
    }

    let upright = if orientation == Orientation::Normal {
        decoded
    } else {
        let size = surface_bytes(source_width, source_height);
        let _pass = tracker.scoped(ResourceKind::Surface, size, "orientation pass", now);
        orientation.apply(decoded)
    };

    let (w, h) = downscaled_size(upright.width(), upright.height(), opts.max_dimension);
    let sized = if (w, h) == (upright.width(), upright.height()) {
        upright
    } else {
        tracing::debug!(w, h, "downscaling photo");
        let _pass = tracker.scoped(ResourceKind::Surface, surface_bytes(w, h), "resize pass", now);
        upright.resize_exact(w, h, image::imageops::FilterType::Lanczos3)
    };

    if sized.width() > u32::from(u16::MAX) || sized.height() > u32::from(u16::MAX) {
        return Err(FramerError::surface(
            sized.width(),
            sized.height(),
            "photo exceeds the raster surface limit",
        ));
    }

    Ok(Photo {
        raster: RasterImage::from_rgba_image(sized.to_rgba8()),
        orientation,
        source_width,
        source_height,
    })
}

fn surface_bytes(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * 4
}

#[cfg(test)]
#[path = "../../tests/unit/assets/photo.rs"]
mod tests;
