use super::*;

fn raster(w: u32, h: u32) -> Arc<RasterImage> {
    Arc::new(RasterImage::solid(w, h, [255, 0, 0, 255]))
}

#[test]
fn overlay_box_follows_shorter_output_side() {
    let overlay = ImageOverlay {
        size_percent: 50.0,
        ..ImageOverlay::default()
    };
    let img = raster(400, 200);
    // min(1080, 1920) * 0.6 * 0.5 = 324, over the longest side 400.
    let s = overlay.scale_for(&img, 1080, 1920, 0.6);
    assert!((s - 0.81).abs() < 1e-12);
}

#[test]
fn hidden_or_disabled_layers_are_not_drawable() {
    let mut state = CustomOverlayState {
        text: Some(TextOverlay {
            content: "hello".into(),
            ..TextOverlay::default()
        }),
        image: Some(ImageOverlay {
            image: Some(raster(10, 10)),
            ..ImageOverlay::default()
        }),
    };
    assert!(state.drawable_text().is_some());
    assert!(state.drawable_image(true).is_some());
    assert!(state.drawable_image(false).is_none());

    if let Some(t) = state.text.as_mut() {
        t.visible = false;
    }
    if let Some(i) = state.image.as_mut() {
        i.enabled = false;
    }
    assert!(state.drawable_text().is_none());
    assert!(state.drawable_image(true).is_none());
}

#[test]
fn blank_text_is_not_drawable() {
    let state = CustomOverlayState {
        text: Some(TextOverlay {
            content: " \n ".into(),
            ..TextOverlay::default()
        }),
        image: None,
    };
    assert!(state.drawable_text().is_none());
}

#[test]
fn json_skips_pixels() {
    let state = CustomOverlayState {
        text: None,
        image: Some(ImageOverlay {
            image: Some(raster(1, 1)),
            ..ImageOverlay::default()
        }),
    };
    let json = serde_json::to_string(&state).unwrap();
    let back: CustomOverlayState = serde_json::from_str(&json).unwrap();
    assert!(back.image.unwrap().image.is_none());
}
