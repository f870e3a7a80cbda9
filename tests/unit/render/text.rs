use super::*;

#[test]
fn layout_without_font_is_an_error() {
    let mut engine = TextLayoutEngine::new();
    assert!(!engine.has_font());
    let Err(err) = engine.layout_line("hi", 24.0, TextBrush::default()) else {
        panic!("layout without a font should fail");
    };
    assert!(err.to_string().contains("no font registered"), "{err}");
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.set_font(b"definitely not a font".to_vec()).is_err());
    assert!(engine.font().is_none());
}

#[test]
fn brush_from_color() {
    let b = TextBrush::from(Rgba8::rgba(1, 2, 3, 4));
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 4));
}

const DEJAVU: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[test]
fn glyphs_advance_along_the_line() {
    let mut engine = TextLayoutEngine::new();
    engine.set_font(DEJAVU.to_vec()).unwrap();
    let layout = engine.layout_line("WWWW", 60.0, TextBrush::default()).unwrap();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                for g in run.positioned_glyphs() {
                    xs.push(g.x);
                    ys.push(g.y);
                }
            }
        }
    }
    assert_eq!(xs.len(), 4);
    assert!(xs.windows(2).all(|w| w[1] - w[0] > 50.0), "{xs:?}");
    // Baseline sits below the top of the line box.
    assert!(ys.iter().all(|y| *y > 40.0 && *y < layout.height()), "{ys:?}");
    assert!(layout.width() > 200.0);
}
