use super::*;

#[test]
fn time_after_and_since_saturate() {
    let t = TimeMs(100);
    assert_eq!(t.after(50), TimeMs(150));
    assert_eq!(TimeMs(150).since(t), 50);
    assert_eq!(t.since(TimeMs(150)), 0);
    assert_eq!(TimeMs(u64::MAX).after(1), TimeMs(u64::MAX));
}

#[test]
fn hex_colors_parse_with_and_without_alpha() {
    assert_eq!(Rgba8::from_hex("#ffffff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::from_hex("FF336680").unwrap(),
        Rgba8::rgba(0xff, 0x33, 0x66, 0x80)
    );
    assert!(Rgba8::from_hex("#fff").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
}

#[test]
fn hex_colors_survive_serde() {
    let c: Rgba8 = serde_json::from_str("\"#1a2b3c\"").unwrap();
    assert_eq!(c, Rgba8::rgb(0x1a, 0x2b, 0x3c));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#1a2b3c\"");
    assert!(serde_json::from_str::<Rgba8>("\"nope\"").is_err());
}

#[test]
fn black_alpha_rounds_fraction() {
    assert_eq!(Rgba8::black_alpha(0.2).a, 51);
    assert_eq!(Rgba8::black_alpha(2.0).a, 255);
}

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas {
        width: 1080,
        height: 1350,
    };
    assert_eq!(c.center(), Point::new(540.0, 675.0));
}
