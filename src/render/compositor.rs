use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::decode::RasterImage;
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8, Vec2};
use crate::foundation::error::{FramerError, FramerResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::format::{self, OutputFormat};
use crate::render::overlay::CustomOverlayState;
use crate::render::text::{TextBrush, TextLayoutEngine, fill_layout};
use crate::transform::PhotoTransform;

const PLACEHOLDER_TITLE: &str = "Safe Area";
const PLACEHOLDER_SUBTITLE: &str = "Your photo will be positioned here";

/// Renderer appearance settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Safe-area inset per side, as a fraction of the output size.
    pub safe_area_margin: f64,
    pub background: Rgba8,
    pub placeholder_stroke: Rgba8,
    pub placeholder_text: Rgba8,
    pub placeholder_line_width: f64,
    /// Dash and gap lengths of the placeholder outline.
    pub placeholder_dash: [f64; 2],
    /// Line advance of overlay text as a multiple of its font size.
    pub line_height_factor: f32,
    /// Overlay image bounding box as a fraction of the shorter output side, before `size%`.
    pub overlay_base_fraction: f64,
    pub text_shadow: Rgba8,
    pub text_shadow_offset: f64,
    /// Font used for overlay and placeholder text. Text is skipped without one.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            safe_area_margin: 0.05,
            background: Rgba8::WHITE,
            placeholder_stroke: Rgba8::black_alpha(0.2),
            placeholder_text: Rgba8::black_alpha(0.4),
            placeholder_line_width: 2.0,
            placeholder_dash: [10.0, 5.0],
            line_height_factor: 1.2,
            overlay_base_fraction: 0.6,
            text_shadow: Rgba8::black_alpha(0.5),
            text_shadow_offset: 2.0,
            font_path: None,
        }
    }
}

impl RenderOpts {
    pub fn validate(&self) -> FramerResult<()> {
        if !(0.0..0.5).contains(&self.safe_area_margin) {
            return Err(FramerError::validation("safe_area_margin must be in [0, 0.5)"));
        }
        if !(self.line_height_factor.is_finite() && self.line_height_factor > 0.0) {
            return Err(FramerError::validation("line_height_factor must be > 0"));
        }
        if !(self.overlay_base_fraction.is_finite() && self.overlay_base_fraction > 0.0) {
            return Err(FramerError::validation("overlay_base_fraction must be > 0"));
        }
        let [dash, gap] = self.placeholder_dash;
        if !(dash > 0.0 && gap >= 0.0) {
            return Err(FramerError::validation("placeholder_dash must be [> 0, >= 0]"));
        }
        Ok(())
    }
}

/// Rendered pixels read back from a surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Everything one composite needs. The renderer never mutates any of it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeInputs<'a> {
    pub photo: Option<&'a RasterImage>,
    pub transform: PhotoTransform,
    pub frame: Option<&'a RasterImage>,
    pub overlays: Option<&'a CustomOverlayState>,
}

struct CachedPaint {
    // Holds the source alive so its address stays a unique key.
    _source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

const PAINT_CACHE_CAPACITY: usize = 8;

/// Fixed-order CPU compositor for one output format.
///
/// Draw order: background, photo (or preview placeholder), behind-text overlay image, overlay
/// text, front overlay image, frame.
pub struct CompositeRenderer {
    opts: RenderOpts,
    format: OutputFormat,
    width: u16,
    height: u16,
    preview: vello_cpu::Pixmap,
    text: TextLayoutEngine,
    paints: HashMap<usize, CachedPaint>,
}

impl std::fmt::Debug for CompositeRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRenderer")
            .field("format", &self.format.key)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_font", &self.text.has_font())
            .field("cached_paints", &self.paints.len())
            .finish()
    }
}

impl CompositeRenderer {
    /// Square output. Loads `opts.font_path` when set.
    pub fn new(opts: RenderOpts) -> FramerResult<Self> {
        opts.validate()?;
        let format = format::SQUARE;
        let (width, height) = surface_dims(format.width, format.height)?;
        let mut renderer = Self {
            opts,
            format,
            width,
            height,
            preview: vello_cpu::Pixmap::new(width, height),
            text: TextLayoutEngine::new(),
            paints: HashMap::new(),
        };
        if let Some(path) = renderer.opts.font_path.clone() {
            let bytes = std::fs::read(&path)?;
            renderer.set_font_bytes(bytes)?;
        }
        Ok(renderer)
    }

    pub fn set_font_bytes(&mut self, bytes: Vec<u8>) -> FramerResult<()> {
        self.text.set_font(bytes)
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    pub fn canvas(&self) -> Canvas {
        self.format.canvas()
    }

    /// Switch formats and resize the preview surface. `false` for unknown keys.
    pub fn set_output_format(&mut self, key: &str) -> bool {
        let Some(format) = format::by_key(key) else {
            tracing::debug!(key, "unknown output format");
            return false;
        };
        let Ok((width, height)) = surface_dims(format.width, format.height) else {
            return false;
        };
        self.format = format;
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.preview = vello_cpu::Pixmap::new(width, height);
        }
        true
    }

    /// Output rect inset by the safe-area margin on each side.
    pub fn safe_area(&self) -> Rect {
        let w = f64::from(self.format.width);
        let h = f64::from(self.format.height);
        let m = self.opts.safe_area_margin;
        Rect::new(w * m, h * m, w * (1.0 - m), h * (1.0 - m))
    }

    /// Composite into the preview surface. Without a photo a dashed safe-area outline is drawn.
    pub fn render(&mut self, inputs: &CompositeInputs<'_>) -> FramerResult<()> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.draw(&mut ctx, inputs, true)?;
        ctx.flush();
        ctx.render_to_pixmap(&mut self.preview);
        Ok(())
    }

    /// Last preview composite.
    pub fn preview(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.preview.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Composite onto a fresh full-resolution surface and return straight-alpha pixels.
    pub fn export_rgba(&mut self, inputs: &CompositeInputs<'_>) -> FramerResult<FrameRGBA> {
        let mut surface = vello_cpu::Pixmap::new(self.width, self.height);
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.draw(&mut ctx, inputs, false)?;
        ctx.flush();
        ctx.render_to_pixmap(&mut surface);

        let mut data = surface.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: false,
        })
    }

    /// Same draw sequence as [`CompositeRenderer::render`], encoded as PNG.
    #[tracing::instrument(skip(self, inputs), fields(format = self.format.key))]
    pub fn export_png(&mut self, inputs: &CompositeInputs<'_>) -> FramerResult<Vec<u8>> {
        let frame = self.export_rgba(inputs)?;
        encode_png(frame)
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        inputs: &CompositeInputs<'_>,
        preview: bool,
    ) -> FramerResult<()> {
        let canvas = self.canvas();
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(self.opts.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        match inputs.photo {
            Some(photo) => {
                let xf = inputs.transform.to_affine(canvas, photo.width, photo.height);
                self.draw_image(ctx, photo, xf, 1.0)?;
            }
            None if preview => self.draw_placeholder(ctx),
            None => {}
        }

        if let Some(overlays) = inputs.overlays {
            self.draw_overlay_image(ctx, overlays, true)?;
            self.draw_overlay_text(ctx, overlays);
            self.draw_overlay_image(ctx, overlays, false)?;
        }

        // Frames are pre-authored per format and always stretched full-bleed.
        if let Some(frame) = inputs.frame
            && frame.width > 0
            && frame.height > 0
        {
            let xf =
                Affine::scale_non_uniform(w / f64::from(frame.width), h / f64::from(frame.height));
            self.draw_image(ctx, frame, xf, 1.0)?;
        }
        Ok(())
    }

    fn draw_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        img: &RasterImage,
        transform: Affine,
        opacity: f32,
    ) -> FramerResult<()> {
        if opacity <= 0.0 {
            return Ok(());
        }
        let paint = self.paint_for(img)?;
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.width),
            f64::from(img.height),
        ));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn draw_overlay_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        overlays: &CustomOverlayState,
        behind_text: bool,
    ) -> FramerResult<()> {
        let Some((overlay, raster)) = overlays.drawable_image(behind_text) else {
            return Ok(());
        };
        let canvas = self.canvas();
        let s = overlay.scale_for(
            raster,
            canvas.width,
            canvas.height,
            self.opts.overlay_base_fraction,
        );
        if s <= 0.0 {
            return Ok(());
        }
        let cx = overlay.position_x_percent / 100.0 * f64::from(canvas.width);
        let cy = overlay.position_y_percent / 100.0 * f64::from(canvas.height);
        let xf = Affine::translate(Vec2::new(cx, cy))
            * Affine::scale(s)
            * Affine::translate(Vec2::new(
                -f64::from(raster.width) / 2.0,
                -f64::from(raster.height) / 2.0,
            ));
        self.draw_image(ctx, raster, xf, overlay.opacity())
    }

    fn draw_overlay_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        overlays: &CustomOverlayState,
    ) {
        let Some(text) = overlays.drawable_text() else {
            return;
        };
        let canvas = self.canvas();
        let cx = text.position_x_percent / 100.0 * f64::from(canvas.width);
        let cy = text.position_y_percent / 100.0 * f64::from(canvas.height);
        let line_height = f64::from(text.font_size * self.opts.line_height_factor);
        let lines: Vec<&str> = text.content.split('\n').collect();
        let first = -(lines.len() as f64 - 1.0) / 2.0 * line_height;

        let anchor = Affine::translate(Vec2::new(cx, cy))
            * Affine::rotate(text.rotation_deg.to_radians());
        for (i, line) in lines.iter().enumerate() {
            let at = anchor * Affine::translate(Vec2::new(0.0, first + i as f64 * line_height));
            self.draw_centered_line(ctx, line, text.font_size, text.color, at, true);
        }
    }

    fn draw_placeholder(&mut self, ctx: &mut vello_cpu::RenderContext) {
        let area = self.safe_area();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(self.opts.placeholder_stroke));
        for dash in dashed_outline(
            area,
            self.opts.placeholder_line_width,
            self.opts.placeholder_dash,
        ) {
            ctx.fill_rect(&rect_to_cpu(dash));
        }

        let c = self.canvas().center();
        let ink = self.opts.placeholder_text;
        for (text, size, dy) in [
            (PLACEHOLDER_TITLE, 24.0, 100.0),
            (PLACEHOLDER_SUBTITLE, 16.0, 130.0),
        ] {
            let at = Affine::translate(Vec2::new(c.x, c.y + dy));
            self.draw_centered_line(ctx, text, size, ink, at, false);
        }
    }

    /// Draw one line centered horizontally and vertically on the origin of `at`.
    fn draw_centered_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        line: &str,
        size_px: f32,
        ink: Rgba8,
        at: Affine,
        shadow: bool,
    ) {
        if line.trim().is_empty() {
            return;
        }
        let layout = match self.text.layout_line(line, size_px, TextBrush::from(ink)) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(error = %e, "skipping text");
                return;
            }
        };
        let Some(font) = self.text.font() else {
            return;
        };
        let origin = at
            * Affine::translate(Vec2::new(
                -f64::from(layout.width()) / 2.0,
                -f64::from(layout.height()) / 2.0,
            ));
        if shadow {
            let off = self.opts.text_shadow_offset;
            let shadow_xf = Affine::translate(Vec2::new(off, off)) * origin;
            ctx.set_transform(affine_to_cpu(shadow_xf));
            fill_layout(ctx, &layout, font, Some(TextBrush::from(self.opts.text_shadow)));
        }
        ctx.set_transform(affine_to_cpu(origin));
        fill_layout(ctx, &layout, font, None);
    }

    fn paint_for(&mut self, img: &RasterImage) -> FramerResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&img.rgba8_premul) as usize;
        if let Some(cached) = self.paints.get(&key) {
            return Ok(cached.paint.clone());
        }

        let pixmap = premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        if self.paints.len() >= PAINT_CACHE_CAPACITY {
            self.paints.clear();
        }
        self.paints.insert(
            key,
            CachedPaint {
                _source: Arc::clone(&img.rgba8_premul),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }
}

/// Encode straight-alpha RGBA8 as PNG.
pub fn encode_png(frame: FrameRGBA) -> FramerResult<Vec<u8>> {
    let (w, h) = (frame.width, frame.height);
    let img = image::RgbaImage::from_raw(w, h, frame.data)
        .ok_or_else(|| FramerError::encode(format!("pixel buffer does not match {w}x{h}")))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| FramerError::encode(format!("png encode: {e}")))?;
    if out.is_empty() {
        return Err(FramerError::encode("png encoder produced no bytes"));
    }
    Ok(out)
}

/// Dash rectangles tracing the border of `area`, centered on its edges.
pub(crate) fn dashed_outline(area: Rect, line_width: f64, [dash, gap]: [f64; 2]) -> Vec<Rect> {
    let half = line_width / 2.0;
    let mut out = Vec::new();
    let mut run = |from: f64, to: f64, mk: &dyn Fn(f64, f64) -> Rect| {
        let mut t = from;
        while t < to {
            let end = (t + dash).min(to);
            out.push(mk(t, end));
            t = end + gap;
        }
    };
    run(area.x0, area.x1, &|a, b| Rect::new(a, area.y0 - half, b, area.y0 + half));
    run(area.y0, area.y1, &|a, b| Rect::new(area.x1 - half, a, area.x1 + half, b));
    run(area.x0, area.x1, &|a, b| Rect::new(a, area.y1 - half, b, area.y1 + half));
    run(area.y0, area.y1, &|a, b| Rect::new(area.x0 - half, a, area.x0 + half, b));
    out
}

fn surface_dims(width: u32, height: u32) -> FramerResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FramerError::surface(width, height, "width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FramerError::surface(width, height, "height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(FramerError::surface(width, height, "empty surface"));
    }
    Ok((w, h))
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> FramerResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(FramerError::surface(width, height, "image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
