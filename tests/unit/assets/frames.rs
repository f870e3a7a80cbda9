use super::*;
use crate::render::format::{PORTRAIT, SQUARE};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("photo-framer-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const RED_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
<rect width="10" height="10" fill="#ff0000"/></svg>"##;

#[test]
fn candidates_are_most_specific_first() {
    let lib = FrameLibrary::new("/srv");
    let sel = FrameSelection::new("christmas", "polaroid");
    let c = lib.candidates(&sel, &PORTRAIT).unwrap();
    assert_eq!(
        c,
        vec![
            "frames/christmas/polaroid/frame_portrait_1080x1350.png",
            "frames/christmas/polaroid/frame_portrait_1080x1350.svg",
            "frames/christmas/polaroid/frame_1080.png",
            "frames/christmas/polaroid/frame_1080.svg",
        ]
    );
}

#[test]
fn traversal_in_selection_is_rejected() {
    let lib = FrameLibrary::new(".");
    let sel = FrameSelection::new("..", "x");
    assert!(lib.candidates(&sel, &SQUARE).is_err());
    assert_eq!(normalize_rel_path("a/./b//c").unwrap(), "a/b/c");
    assert!(normalize_rel_path("/abs").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn missing_frame_is_none() {
    let dir = scratch_dir("missing");
    let lib = FrameLibrary::new(&dir);
    let got = lib.load(&FrameSelection::new("t", "s"), &SQUARE).unwrap();
    assert!(got.is_none());
}

#[test]
fn svg_fallback_is_rasterized_at_output_size() {
    let dir = scratch_dir("svg");
    let style_dir = dir.join("frames/t/s");
    std::fs::create_dir_all(&style_dir).unwrap();
    std::fs::write(style_dir.join("frame_1080.svg"), RED_SVG).unwrap();

    let lib = FrameLibrary::new(&dir);
    let frame = lib
        .load(&FrameSelection::new("t", "s"), &PORTRAIT)
        .unwrap()
        .unwrap();
    assert_eq!((frame.width, frame.height), (1080, 1350));
    let mid = ((675 * 1080 + 540) * 4) as usize;
    assert_eq!(&frame.rgba8_premul[mid..mid + 4], &[255, 0, 0, 255]);
}

#[test]
fn specific_png_wins_over_fallback() {
    let dir = scratch_dir("png");
    let style_dir = dir.join("frames/t/s");
    std::fs::create_dir_all(&style_dir).unwrap();
    std::fs::write(style_dir.join("frame_1080.svg"), RED_SVG).unwrap();
    image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]))
        .save(style_dir.join("frame_square_1080x1080.png"))
        .unwrap();

    let lib = FrameLibrary::new(&dir);
    let frame = lib
        .load(&FrameSelection::new("t", "s"), &SQUARE)
        .unwrap()
        .unwrap();
    assert_eq!((frame.width, frame.height), (4, 4));
}
