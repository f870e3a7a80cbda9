use super::*;

#[test]
fn arms_then_activates_with_two_pointers() {
    let mut p = PrecisionModeController::new();
    p.arm(TimeMs(1_000), 500);
    assert_eq!(p.deadline(), Some(TimeMs(1_500)));
    assert!(!p.poll(TimeMs(1_499), 2));
    assert!(p.poll(TimeMs(1_500), 2));
    assert!(p.is_active());
    assert_eq!(p.deadline(), None);
}

#[test]
fn deadline_with_wrong_pointer_count_disarms() {
    let mut p = PrecisionModeController::new();
    p.arm(TimeMs(0), 500);
    assert!(!p.poll(TimeMs(600), 1));
    assert_eq!(p.state(), PrecisionState::Inactive);
}

#[test]
fn cancel_only_affects_armed_state() {
    let mut p = PrecisionModeController::new();
    p.arm(TimeMs(0), 500);
    p.cancel_pending();
    assert_eq!(p.state(), PrecisionState::Inactive);

    p.arm(TimeMs(0), 500);
    p.poll(TimeMs(500), 2);
    p.cancel_pending();
    assert!(p.is_active());
}

#[test]
fn rearming_replaces_deadline_and_is_ignored_while_active() {
    let mut p = PrecisionModeController::new();
    p.arm(TimeMs(0), 500);
    p.arm(TimeMs(200), 500);
    assert_eq!(p.deadline(), Some(TimeMs(700)));
    assert!(p.poll(TimeMs(700), 2));
    p.arm(TimeMs(800), 500);
    assert!(p.is_active());
}

#[test]
fn release_all_reports_exit_only_when_active() {
    let mut p = PrecisionModeController::new();
    assert!(!p.release_all());
    p.arm(TimeMs(0), 500);
    assert!(!p.release_all());
    p.arm(TimeMs(0), 500);
    p.poll(TimeMs(500), 2);
    assert!(p.release_all());
    assert!(!p.is_active());
}

#[test]
fn damping_matches_sensitivities() {
    let cfg = GestureConfig::default();
    let mut p = PrecisionModeController::new();
    assert_eq!(p.damp(1.2, 0.3, &cfg), (1.2, 0.3));

    p.arm(TimeMs(0), 500);
    p.poll(TimeMs(500), 2);
    let (s, r) = p.damp(1.2, 0.3, &cfg);
    assert!((s - 1.06).abs() < 1e-12);
    assert!((r - 0.06).abs() < 1e-12);
    assert_eq!(p.rotation_threshold(&cfg), 0.0);
}

#[test]
fn no_haptics_reports_unsupported() {
    assert!(!NoHaptics.pulse(50));
}
