use super::*;

#[test]
fn renders_every_refresh_while_interacting() {
    let mut p = RenderPacer::default();
    assert!(!p.on_refresh(TimeMs(0)));
    p.interaction_started();
    assert!(p.on_refresh(TimeMs(16)));
    assert!(p.on_refresh(TimeMs(32)));
}

#[test]
fn one_settle_render_after_end() {
    let mut p = RenderPacer::default();
    p.interaction_started();
    p.interaction_ended(TimeMs(100));
    assert!(!p.on_refresh(TimeMs(116)));
    assert!(!p.on_refresh(TimeMs(299)));
    assert!(p.on_refresh(TimeMs(300)));
    assert!(!p.on_refresh(TimeMs(316)));
}

#[test]
fn newer_end_replaces_settle_deadline() {
    let mut p = RenderPacer::new(PacingConfig { settle_ms: 200 });
    p.interaction_ended(TimeMs(0));
    p.interaction_ended(TimeMs(150));
    assert_eq!(p.settle_deadline(), Some(TimeMs(350)));
    assert!(!p.on_refresh(TimeMs(200)));
    assert!(p.on_refresh(TimeMs(350)));
}

#[test]
fn restart_cancels_settle() {
    let mut p = RenderPacer::default();
    p.interaction_ended(TimeMs(0));
    p.interaction_started();
    assert_eq!(p.settle_deadline(), None);
}

#[test]
fn requested_render_fires_once() {
    let mut p = RenderPacer::default();
    p.request_render();
    assert!(p.on_refresh(TimeMs(0)));
    assert!(!p.on_refresh(TimeMs(16)));
}
