use super::*;

#[test]
fn catalogue_dimensions() {
    let dims: Vec<_> = all().iter().map(|f| (f.key, f.width, f.height)).collect();
    assert_eq!(
        dims,
        vec![
            ("square", 1080, 1080),
            ("portrait", 1080, 1350),
            ("story", 1080, 1920)
        ]
    );
}

#[test]
fn lookup_by_key() {
    assert_eq!(by_key("story"), Some(STORY));
    assert_eq!(by_key("landscape"), None);
    assert_eq!(OutputFormat::default().key, "square");
}

#[test]
fn portrait_aspect() {
    assert!((PORTRAIT.aspect() - 0.8).abs() < 1e-12);
}
