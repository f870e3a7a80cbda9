use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "photo-framer-prefs-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("onboarding.json")
}

#[test]
fn missing_file_is_not_seen() {
    let flag = OnboardingFlag::load(scratch("missing"));
    assert!(!flag.is_seen());
}

#[test]
fn mark_seen_persists_and_reset_clears() {
    let path = scratch("persist");
    let mut flag = OnboardingFlag::load(&path);
    flag.mark_seen().unwrap();
    assert!(OnboardingFlag::load(&path).is_seen());

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["gesture_hints_shown"], serde_json::Value::Bool(true));

    flag.reset().unwrap();
    assert!(!OnboardingFlag::load(&path).is_seen());
    flag.reset().unwrap();
}

#[test]
fn corrupt_file_is_not_seen() {
    let path = scratch("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"{not json").unwrap();
    assert!(!OnboardingFlag::load(&path).is_seen());
}
