use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{RasterImage, decode_image, parse_svg};
use crate::foundation::error::{FramerError, FramerResult};
use crate::render::format::OutputFormat;

/// Which decorative frame family is in use. Kept across output-format switches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSelection {
    pub theme: String,
    pub style: String,
}

impl FrameSelection {
    pub fn new(theme: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            style: style.into(),
        }
    }
}

/// Pre-authored frame images on disk, laid out as
/// `frames/{theme}/{style}/frame_{key}_{w}x{h}.{png,svg}` with a per-width fallback
/// `frames/{theme}/{style}/frame_{w}.{png,svg}`.
#[derive(Clone, Debug)]
pub struct FrameLibrary {
    root: PathBuf,
}

impl FrameLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative lookup paths for `format`, most specific first.
    pub fn candidates(
        &self,
        selection: &FrameSelection,
        format: &OutputFormat,
    ) -> FramerResult<Vec<String>> {
        let dir = normalize_rel_path(&format!(
            "frames/{}/{}",
            selection.theme, selection.style
        ))?;
        let (key, w, h) = (format.key, format.width, format.height);
        Ok(vec![
            format!("{dir}/frame_{key}_{w}x{h}.png"),
            format!("{dir}/frame_{key}_{w}x{h}.svg"),
            format!("{dir}/frame_{w}.png"),
            format!("{dir}/frame_{w}.svg"),
        ])
    }

    /// Load the best available frame for `format`, rasterized at the output size when it is an
    /// SVG. `Ok(None)` when no candidate exists.
    pub fn load(
        &self,
        selection: &FrameSelection,
        format: &OutputFormat,
    ) -> FramerResult<Option<Arc<RasterImage>>> {
        for rel in self.candidates(selection, format)? {
            let path = self.root.join(&rel);
            if !path.is_file() {
                continue;
            }
            tracing::debug!(path = %path.display(), "loading frame");
            let frame = load_frame_file(&path, format.width, format.height)?;
            return Ok(Some(Arc::new(frame)));
        }
        tracing::warn!(
            theme = %selection.theme,
            style = %selection.style,
            format = format.key,
            "no frame image found, continuing without a frame"
        );
        Ok(None)
    }
}

/// Read a PNG/JPEG or SVG frame. SVGs are rasterized to `width` x `height`.
pub fn load_frame_file(path: &Path, width: u32, height: u32) -> FramerResult<RasterImage> {
    let bytes = std::fs::read(path)?;
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let tree = parse_svg(&bytes)?;
        rasterize_svg(&tree, width, height)
    } else {
        decode_image(&bytes)
    }
}

/// Rasterize `tree` stretched to exactly `width` x `height`.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> FramerResult<RasterImage> {
    let size = tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(FramerError::decode("svg has invalid width/height"));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FramerError::surface(width, height, "failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(RasterImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

/// Normalize a relative asset path: `/` separators, no `.` segments, no absolute paths or `..`.
pub(crate) fn normalize_rel_path(source: &str) -> FramerResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FramerError::validation("frame paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FramerError::validation("frame paths must not contain '..'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(FramerError::validation("frame path must be non-empty"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
