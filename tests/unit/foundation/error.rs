use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FramerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FramerError::decode("x").to_string().contains("decode error:"));
    assert!(FramerError::encode("x").to_string().contains("encode error:"));
    assert!(FramerError::share("x").to_string().contains("share error:"));
}

#[test]
fn surface_error_reports_offending_dimensions() {
    let err = FramerError::surface(70_000, 12, "exceeds raster limit");
    let msg = err.to_string();
    assert!(msg.contains("70000x12"));
    assert!(msg.contains("exceeds raster limit"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FramerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn io_converts_via_question_mark() {
    fn open_missing() -> FramerResult<Vec<u8>> {
        Ok(std::fs::read("/definitely/not/here/photo.jpg")?)
    }
    assert!(matches!(open_missing(), Err(FramerError::Io(_))));
}
