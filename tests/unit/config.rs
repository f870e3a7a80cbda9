use super::*;

#[test]
fn empty_json_is_all_defaults() {
    let cfg = FramerConfig::from_json("{}").unwrap();
    assert_eq!(cfg, FramerConfig::default());
    assert_eq!(cfg.pacing.settle_ms, 200);
    assert_eq!(cfg.resources.memory_warning_bytes, 50 * 1024 * 1024);
    assert_eq!(cfg.photo.max_dimension, 3000);
}

#[test]
fn nested_overrides() {
    let cfg = FramerConfig::from_json(
        r##"{"gesture": {"long_press_ms": 700}, "render": {"background": "#000000"}}"##,
    )
    .unwrap();
    assert_eq!(cfg.gesture.long_press_ms, 700);
    assert_eq!(cfg.gesture.tap_max_duration_ms, 300);
    assert_eq!(cfg.render.background.to_hex(), "#000000");
}

#[test]
fn invalid_values_fail_validation() {
    let err = FramerConfig::from_json(r#"{"gesture": {"precision_scale_sensitivity": 2.0}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("precision_scale_sensitivity"), "{err}");

    let err = FramerConfig::from_json("[1, 2]").unwrap_err();
    assert!(err.to_string().starts_with("validation error: config json"), "{err}");
}

#[test]
fn missing_file_is_io() {
    let err = FramerConfig::from_path(Path::new("/nonexistent/photo-framer.json")).unwrap_err();
    assert!(matches!(err, FramerError::Io(_)));
}
