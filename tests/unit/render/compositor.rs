use super::*;
use crate::render::overlay::{ImageOverlay, TextOverlay};

fn renderer() -> CompositeRenderer {
    CompositeRenderer::new(RenderOpts::default()).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

#[test]
fn safe_area_is_inset_five_percent() {
    let r = renderer();
    assert_eq!(r.safe_area(), Rect::new(54.0, 54.0, 1026.0, 1026.0));
}

#[test]
fn unknown_format_keeps_current_surface() {
    let mut r = renderer();
    assert!(!r.set_output_format("landscape"));
    assert_eq!(r.output_format().key, "square");

    assert!(r.set_output_format("story"));
    let f = r.preview();
    assert_eq!((f.width, f.height), (1080, 1920));
    assert_eq!(r.safe_area(), Rect::new(54.0, 96.0, 1026.0, 1824.0));
}

#[test]
fn empty_preview_shows_placeholder_but_export_does_not() {
    let mut r = renderer();
    let inputs = CompositeInputs::default();
    r.render(&inputs).unwrap();
    let preview = r.preview();
    assert!(close(preview.pixel(2, 2).unwrap(), [255, 255, 255, 255], 0));
    assert!(close(preview.pixel(58, 54).unwrap(), [204, 204, 204, 255], 2));

    let export = r.export_rgba(&inputs).unwrap();
    assert!(!export.premultiplied);
    assert!(close(export.pixel(58, 54).unwrap(), [255, 255, 255, 255], 0));
}

#[test]
fn photo_is_centered_at_native_size() {
    let mut r = renderer();
    let photo = RasterImage::solid(100, 100, [255, 0, 0, 255]);
    let inputs = CompositeInputs {
        photo: Some(&photo),
        ..CompositeInputs::default()
    };
    r.render(&inputs).unwrap();
    let f = r.preview();
    assert!(close(f.pixel(540, 540).unwrap(), [255, 0, 0, 255], 0));
    assert!(close(f.pixel(520, 520).unwrap(), [255, 0, 0, 255], 0));
    assert!(close(f.pixel(600, 540).unwrap(), [255, 255, 255, 255], 0));
}

#[test]
fn transform_translates_photo() {
    let mut r = renderer();
    let photo = RasterImage::solid(20, 20, [0, 0, 255, 255]);
    let inputs = CompositeInputs {
        photo: Some(&photo),
        transform: PhotoTransform::new(200.0, -100.0, 2.0, 0.0),
        ..CompositeInputs::default()
    };
    r.render(&inputs).unwrap();
    let f = r.preview();
    assert!(close(f.pixel(740, 440).unwrap(), [0, 0, 255, 255], 0));
    assert!(close(f.pixel(540, 540).unwrap(), [255, 255, 255, 255], 0));
}

#[test]
fn frame_is_stretched_full_bleed_on_top() {
    let mut r = renderer();
    let mut px = image::RgbaImage::new(4, 4);
    px.put_pixel(0, 0, image::Rgba([0, 0, 255, 255]));
    let frame = RasterImage::from_rgba_image(px);
    let photo = RasterImage::solid(1080, 1080, [0, 255, 0, 255]);
    let inputs = CompositeInputs {
        photo: Some(&photo),
        frame: Some(&frame),
        ..CompositeInputs::default()
    };
    r.render(&inputs).unwrap();
    let f = r.preview();
    assert!(close(f.pixel(10, 10).unwrap(), [0, 0, 255, 255], 0));
    assert!(close(f.pixel(800, 800).unwrap(), [0, 255, 0, 255], 0));
}

#[test]
fn overlay_image_sits_above_photo_with_opacity() {
    let mut r = renderer();
    let overlays = CustomOverlayState {
        text: None,
        image: Some(ImageOverlay {
            image: Some(Arc::new(RasterImage::solid(10, 10, [255, 0, 0, 255]))),
            opacity_percent: 50.0,
            ..ImageOverlay::default()
        }),
    };
    let inputs = CompositeInputs {
        overlays: Some(&overlays),
        ..CompositeInputs::default()
    };
    let f = r.export_rgba(&inputs).unwrap();
    assert!(close(f.pixel(540, 540).unwrap(), [255, 128, 128, 255], 2));
    // 1080 * 0.6 * 0.5 = 324 px box.
    assert!(close(f.pixel(540 + 150, 540).unwrap(), [255, 128, 128, 255], 2));
    assert!(close(f.pixel(540 + 175, 540).unwrap(), [255, 255, 255, 255], 0));
}

#[test]
fn png_export_decodes_to_output_size() {
    let mut r = renderer();
    assert!(r.set_output_format("portrait"));
    let png = r.export_png(&CompositeInputs::default()).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1080, 1350));
}

#[test]
fn mismatched_buffer_is_an_encode_error() {
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 3],
        premultiplied: false,
    };
    assert!(matches!(encode_png(frame), Err(FramerError::Encode(_))));
}

#[test]
fn dashes_follow_each_edge() {
    let dashes = dashed_outline(Rect::new(0.0, 0.0, 30.0, 15.0), 2.0, [10.0, 5.0]);
    assert_eq!(dashes.len(), 6);
    assert_eq!(dashes[0], Rect::new(0.0, -1.0, 10.0, 1.0));
    assert!(dashes.iter().all(|d| d.width() <= 10.0 && d.height() <= 10.0));
}

#[test]
fn invalid_opts_and_missing_font_fail() {
    let bad = RenderOpts {
        safe_area_margin: 0.6,
        ..RenderOpts::default()
    };
    assert!(matches!(
        CompositeRenderer::new(bad),
        Err(FramerError::Validation(_))
    ));

    let missing = RenderOpts {
        font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
        ..RenderOpts::default()
    };
    assert!(matches!(
        CompositeRenderer::new(missing),
        Err(FramerError::Io(_))
    ));
}

#[test]
fn surface_limits_carry_dimensions() {
    let err = surface_dims(70_000, 10).unwrap_err();
    assert_eq!(
        err.to_string(),
        "surface error (70000x10): width exceeds u16"
    );
}

const DEJAVU: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

fn renderer_with_font() -> CompositeRenderer {
    let mut r = renderer();
    r.set_font_bytes(DEJAVU.to_vec()).unwrap();
    r
}

fn red_text(content: &str) -> TextOverlay {
    TextOverlay {
        content: content.to_owned(),
        font_size: 60.0,
        color: Rgba8::rgb(255, 0, 0),
        position_x_percent: 50.0,
        position_y_percent: 50.0,
        ..TextOverlay::default()
    }
}

fn is_red(px: [u8; 4]) -> bool {
    px[0] > 180 && px[1] < 80 && px[2] < 80
}

/// Bounding box `(x0, y0, x1, y1)` of pixels matching `pred`, inclusive.
fn ink_bounds(f: &FrameRGBA, pred: impl Fn([u8; 4]) -> bool) -> Option<(u32, u32, u32, u32)> {
    let mut b: Option<(u32, u32, u32, u32)> = None;
    for y in 0..f.height {
        for x in 0..f.width {
            if pred(f.pixel(x, y).unwrap()) {
                b = Some(match b {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
    }
    b
}

/// Rows containing red ink, grouped into contiguous bands `(first, last)`.
fn red_row_bands(f: &FrameRGBA) -> Vec<(u32, u32)> {
    let mut bands: Vec<(u32, u32)> = Vec::new();
    for y in 0..f.height {
        if !(0..f.width).any(|x| is_red(f.pixel(x, y).unwrap())) {
            continue;
        }
        match bands.last_mut() {
            Some((_, last)) if *last + 1 == y => *last = y,
            _ => bands.push((y, y)),
        }
    }
    bands
}

fn export_text(r: &mut CompositeRenderer, overlays: &CustomOverlayState) -> FrameRGBA {
    r.export_rgba(&CompositeInputs {
        overlays: Some(overlays),
        ..CompositeInputs::default()
    })
    .unwrap()
}

#[test]
fn text_line_spans_its_advance_centred_on_position() {
    let mut r = renderer_with_font();
    let overlays = CustomOverlayState {
        text: Some(red_text("WWWWWWWWWW")),
        image: None,
    };
    let f = export_text(&mut r, &overlays);
    let (x0, y0, x1, y1) = ink_bounds(&f, is_red).unwrap();

    // Ten W glyphs at 60 px are roughly 590 px wide.
    let width = x1 - x0;
    assert!((500..650).contains(&width), "ink x {x0}..{x1}");
    let cx = f64::from(x0 + x1) / 2.0;
    assert!((cx - 540.0).abs() < 15.0, "ink centre x {cx}");
    let cy = f64::from(y0 + y1) / 2.0;
    assert!((cy - 540.0).abs() < 25.0, "ink centre y {cy}");
}

#[test]
fn lines_stack_around_position_with_line_height_pitch() {
    let mut r = renderer_with_font();
    let overlays = CustomOverlayState {
        text: Some(red_text("HHHH\nHHHH\nHHHH")),
        image: None,
    };
    let f = export_text(&mut r, &overlays);
    let bands = red_row_bands(&f);
    assert_eq!(bands.len(), 3, "{bands:?}");

    let centres: Vec<f64> = bands
        .iter()
        .map(|(a, b)| f64::from(a + b) / 2.0)
        .collect();
    // 60 px * 1.2
    for pair in centres.windows(2) {
        assert!((pair[1] - pair[0] - 72.0).abs() <= 2.0, "{centres:?}");
    }
    assert!((centres[1] - 540.0).abs() < 25.0, "{centres:?}");
}

#[test]
fn text_casts_a_grey_shadow() {
    let mut r = renderer_with_font();
    let overlays = CustomOverlayState {
        text: Some(red_text("HHHH")),
        image: None,
    };
    let f = export_text(&mut r, &overlays);
    let (x0, y0, x1, y1) = ink_bounds(&f, is_red).unwrap();
    let grey = |px: [u8; 4]| {
        px[0] < 180 && px[0].abs_diff(px[1]) < 12 && px[1].abs_diff(px[2]) < 12
    };
    let shadow = (y0..=y1 + 4).any(|y| (x0..=x1 + 4).any(|x| grey(f.pixel(x, y).unwrap())));
    assert!(shadow);

    let plain = RenderOpts {
        text_shadow: Rgba8::rgba(0, 0, 0, 0),
        ..RenderOpts::default()
    };
    let mut r = CompositeRenderer::new(plain).unwrap();
    r.set_font_bytes(DEJAVU.to_vec()).unwrap();
    let f = export_text(&mut r, &overlays);
    let shadow = (y0..=y1 + 4).any(|y| (x0..=x1 + 4).any(|x| grey(f.pixel(x, y).unwrap())));
    assert!(!shadow);
}

#[test]
fn front_overlay_image_covers_text_but_behind_one_does_not() {
    let overlay = |behind_text: bool| ImageOverlay {
        image: Some(Arc::new(RasterImage::solid(10, 10, [0, 200, 0, 255]))),
        behind_text,
        ..ImageOverlay::default()
    };

    let mut r = renderer_with_font();
    let front = CustomOverlayState {
        text: Some(red_text("HH")),
        image: Some(overlay(false)),
    };
    let f = export_text(&mut r, &front);
    assert!(ink_bounds(&f, is_red).is_none());
    assert!(close(f.pixel(540, 540).unwrap(), [0, 200, 0, 255], 0));

    let behind = CustomOverlayState {
        text: Some(red_text("HH")),
        image: Some(overlay(true)),
    };
    let f = export_text(&mut r, &behind);
    let (x0, _, x1, _) = ink_bounds(&f, is_red).unwrap();
    // 324 px box centred at 540; the text sits inside it.
    assert!(x0 > 378 && x1 < 702, "ink x {x0}..{x1}");
}

#[test]
fn placeholder_hint_text_only_in_preview() {
    let mut r = renderer_with_font();
    let inputs = CompositeInputs::default();
    r.render(&inputs).unwrap();
    let preview = r.preview();
    let export = r.export_rgba(&inputs).unwrap();

    let dark = |px: [u8; 4]| px[0] < 220;
    let in_hint_rows = |f: &FrameRGBA| {
        (600..690).any(|y| (300..780).any(|x| dark(f.pixel(x, y).unwrap())))
    };
    assert!(in_hint_rows(&preview));
    assert!(!in_hint_rows(&export));
}
