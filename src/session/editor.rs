use std::sync::Arc;

use crate::assets::decode::RasterImage;
use crate::assets::frames::{FrameLibrary, FrameSelection};
use crate::assets::photo::{Photo, PhotoOpts, process_photo_tracked};
use crate::config::FramerConfig;
use crate::foundation::core::TimeMs;
use crate::foundation::error::{FramerError, FramerResult};
use crate::gesture::engine::GestureEngine;
use crate::gesture::events::GestureEvent;
use crate::render::compositor::{CompositeInputs, CompositeRenderer, FrameRGBA};
use crate::render::format::{self, OutputFormat};
use crate::render::overlay::CustomOverlayState;
use crate::session::pacing::RenderPacer;
use crate::session::resources::{
    MemoryProbe, ResourceHandle, ResourceKind, ResourceStats, ResourceTracker,
};
use crate::share::{SharePayload, ShareTarget, share_text, share_with_fallback};
use crate::transform::PhotoTransform;

/// Fraction of the safe area used by [`FramingSession::fit_for_instagram`].
const INSTAGRAM_FIT_FACTOR: f64 = 0.95;

/// PNG produced by an export, with its conventional file name.
///
/// The bytes are tracked as a blob until shared, released, or reclaimed by the age sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub handle: ResourceHandle,
}

/// `framed-photo-{format}-{style}-{w}x{h}.png`
pub fn export_filename(format: &OutputFormat, frame_style: &str) -> String {
    format!(
        "framed-photo-{}-{}-{}x{}.png",
        format.key, frame_style, format.width, format.height
    )
}

/// Application state owner: the only writer of the photo transform.
///
/// Gesture events are merged here; the renderer and exporter only ever see copies.
#[derive(Debug)]
pub struct FramingSession {
    renderer: CompositeRenderer,
    gestures: GestureEngine,
    pacer: RenderPacer,
    resources: ResourceTracker,
    photo_opts: PhotoOpts,

    photo: Option<Arc<Photo>>,
    transform: PhotoTransform,
    frame: Option<Arc<RasterImage>>,
    selection: FrameSelection,
    overlays: CustomOverlayState,
}

impl FramingSession {
    pub fn new(config: &FramerConfig, selection: FrameSelection) -> FramerResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer: CompositeRenderer::new(config.render.clone())?,
            gestures: GestureEngine::new(config.gesture.clone())?,
            pacer: RenderPacer::new(config.pacing.clone()),
            resources: ResourceTracker::new(config.resources.clone()),
            photo_opts: config.photo.clone(),
            photo: None,
            transform: PhotoTransform::default(),
            frame: None,
            selection,
            overlays: CustomOverlayState::default(),
        })
    }

    pub fn renderer_mut(&mut self) -> &mut CompositeRenderer {
        &mut self.renderer
    }

    /// Gesture engine to feed raw input into; pass what it emits to
    /// [`FramingSession::handle_events`].
    pub fn gestures(&mut self) -> &mut GestureEngine {
        &mut self.gestures
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_deref()
    }

    pub fn transform(&self) -> PhotoTransform {
        self.transform
    }

    pub fn output_format(&self) -> OutputFormat {
        self.renderer.output_format()
    }

    pub fn frame_selection(&self) -> &FrameSelection {
        &self.selection
    }

    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn overlays(&self) -> &CustomOverlayState {
        &self.overlays
    }

    pub fn is_interacting(&self) -> bool {
        self.pacer.is_interacting()
    }

    pub fn resource_stats(&self) -> ResourceStats {
        self.resources.stats()
    }

    /// Decode and install a new photo, fitted to the safe area. On error the previous photo and
    /// transform are left untouched.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_photo(&mut self, bytes: &[u8], now: TimeMs) -> FramerResult<()> {
        let photo = process_photo_tracked(bytes, &self.photo_opts, &mut self.resources, now)?;
        self.install_photo(photo);
        Ok(())
    }

    /// Install an already decoded photo.
    pub fn set_photo(&mut self, photo: Photo) {
        self.install_photo(photo);
    }

    fn install_photo(&mut self, photo: Photo) {
        tracing::debug!(w = photo.width(), h = photo.height(), "photo installed");
        self.photo = Some(Arc::new(photo));
        self.reset_transform();
        self.gestures.enable();
    }

    /// Merge emitted gesture events into the transform and render pacing. Returns `true` when the
    /// transform changed. Ignored without a photo.
    pub fn handle_events(&mut self, events: &[GestureEvent], now: TimeMs) -> bool {
        if self.photo.is_none() {
            return false;
        }
        let before = self.transform;
        for event in events {
            match event {
                GestureEvent::TransformStart => self.pacer.interaction_started(),
                GestureEvent::TransformUpdate(delta) => self.transform.apply(delta),
                GestureEvent::TransformEnd => self.pacer.interaction_ended(now),
                GestureEvent::DoubleTap(_) => self.center_photo(),
                GestureEvent::PrecisionModeEnter | GestureEvent::PrecisionModeExit => {
                    tracing::trace!(?event, "precision mode change");
                }
            }
        }
        self.transform != before
    }

    /// Drive timers for one display refresh and render the preview when due.
    ///
    /// Returns `true` when the preview was redrawn.
    pub fn on_refresh(
        &mut self,
        now: TimeMs,
        probe: Option<&dyn MemoryProbe>,
    ) -> FramerResult<bool> {
        let fired = self.gestures.advance_to(now);
        self.handle_events(&fired, now);
        self.resources.tick(now, probe);
        if !self.pacer.on_refresh(now) {
            return Ok(false);
        }
        self.render_preview()?;
        Ok(true)
    }

    /// Canonical fit for the current photo and format.
    pub fn reset_transform(&mut self) {
        if let Some(photo) = &self.photo {
            self.transform.reset_to_fit(
                f64::from(photo.width()),
                f64::from(photo.height()),
                self.renderer.safe_area(),
            );
        }
        self.pacer.request_render();
    }

    /// Move the photo back to the canvas centre (the double-tap action).
    pub fn center_photo(&mut self) {
        self.transform.recenter();
        self.pacer.request_render();
    }

    pub fn set_absolute_scale(&mut self, scale: f64) {
        self.transform.set_absolute_scale(scale);
        self.pacer.request_render();
    }

    pub fn set_absolute_rotation(&mut self, radians: f64) {
        self.transform.set_absolute_rotation(radians);
        self.pacer.request_render();
    }

    /// Square format, photo fitted by its own aspect and shrunk slightly.
    pub fn fit_for_instagram(&mut self, frames: Option<&FrameLibrary>) {
        if self.photo.is_none() {
            return;
        }
        if self.renderer.output_format().key != format::SQUARE.key {
            self.set_output_format(format::SQUARE.key, frames);
        }
        let Some(photo) = &self.photo else {
            return;
        };
        let safe = self.renderer.safe_area();
        let (w, h) = (f64::from(photo.width()), f64::from(photo.height()));
        let scale = if w / h > 1.0 {
            safe.width() / w
        } else {
            safe.height() / h
        };
        self.transform = PhotoTransform::new(0.0, 0.0, scale * INSTAGRAM_FIT_FACTOR, 0.0);
        self.pacer.request_render();
    }

    /// Switch output format, reload the frame under the same style, and refit the photo.
    /// `false` (and no change) for unknown keys.
    pub fn set_output_format(&mut self, key: &str, frames: Option<&FrameLibrary>) -> bool {
        if !self.renderer.set_output_format(key) {
            return false;
        }
        self.reload_frame(frames);
        self.reset_transform();
        true
    }

    /// Change frame style within the current theme and reload the frame.
    pub fn set_frame_style(&mut self, style: impl Into<String>, frames: Option<&FrameLibrary>) {
        self.selection.style = style.into();
        self.reload_frame(frames);
        self.pacer.request_render();
    }

    /// Install a frame directly, bypassing the library.
    pub fn set_frame_image(&mut self, frame: Option<Arc<RasterImage>>) {
        self.frame = frame;
        self.pacer.request_render();
    }

    pub fn set_overlays(&mut self, overlays: CustomOverlayState) {
        self.overlays = overlays;
        self.pacer.request_render();
    }

    pub fn reload_frame(&mut self, frames: Option<&FrameLibrary>) {
        let Some(frames) = frames else {
            return;
        };
        let format = self.renderer.output_format();
        self.frame = match frames.load(&self.selection, &format) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "could not load frame image");
                None
            }
        };
    }

    pub fn render_preview(&mut self) -> FramerResult<FrameRGBA> {
        let inputs = CompositeInputs {
            photo: self.photo.as_deref().map(|p| &p.raster),
            transform: self.transform,
            frame: self.frame.as_deref(),
            overlays: Some(&self.overlays),
        };
        self.renderer.render(&inputs)?;
        Ok(self.renderer.preview())
    }

    /// Full-resolution PNG of the current composite.
    pub fn export_png(&mut self, now: TimeMs) -> FramerResult<ExportedImage> {
        let Some(photo) = self.photo.clone() else {
            return Err(FramerError::validation("no photo loaded"));
        };
        let format = self.renderer.output_format();
        let inputs = CompositeInputs {
            photo: Some(&photo.raster),
            transform: self.transform,
            frame: self.frame.as_deref(),
            overlays: Some(&self.overlays),
        };
        let surface_bytes = u64::from(format.width) * u64::from(format.height) * 4;
        let bytes = {
            let _surface = self
                .resources
                .scoped(ResourceKind::Surface, surface_bytes, "export", now);
            self.renderer.export_png(&inputs)?
        };
        let handle = self
            .resources
            .acquire(ResourceKind::Blob, bytes.len() as u64, "export png", now);
        Ok(ExportedImage {
            bytes,
            filename: export_filename(&format, &self.selection.style),
            width: format.width,
            height: format.height,
            handle,
        })
    }

    /// Hand an export to the share chain, then release its blob whatever the outcome.
    pub fn share_export(
        &mut self,
        exported: &ExportedImage,
        theme_message: Option<&str>,
        targets: &mut [&mut dyn ShareTarget],
    ) -> FramerResult<String> {
        let payload = SharePayload {
            png: exported.bytes.clone(),
            filename: exported.filename.clone(),
            text: share_text(&self.renderer.output_format(), theme_message),
        };
        let shared = share_with_fallback(targets, &payload);
        self.release_export(exported);
        shared
    }

    /// Release an export's blob. `false` if it was already released or swept.
    pub fn release_export(&mut self, exported: &ExportedImage) -> bool {
        self.resources.release(exported.handle)
    }

    /// Drop the photo, disable gestures, and release every tracked resource.
    pub fn teardown(&mut self) {
        self.gestures.disable();
        self.photo = None;
        self.frame = None;
        self.resources.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
