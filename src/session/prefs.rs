use std::path::{Path, PathBuf};

use crate::foundation::error::FramerResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct OnboardingFile {
    #[serde(default)]
    gesture_hints_shown: bool,
}

/// The one persisted value: whether gesture hints were already shown.
#[derive(Clone, Debug)]
pub struct OnboardingFlag {
    path: PathBuf,
    shown: bool,
}

impl OnboardingFlag {
    /// Read the flag. A missing or unreadable file means "not shown yet".
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let shown = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<OnboardingFile>(&bytes) {
                Ok(f) => f.gesture_hints_shown,
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "ignoring bad onboarding file"
                    );
                    false
                }
            },
            Err(_) => false,
        };
        Self { path, shown }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_seen(&self) -> bool {
        self.shown
    }

    pub fn mark_seen(&mut self) -> FramerResult<()> {
        self.shown = true;
        self.write()
    }

    /// Forget the flag so hints show again.
    pub fn reset(&mut self) -> FramerResult<()> {
        self.shown = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self) -> FramerResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(&OnboardingFile {
            gesture_hints_shown: self.shown,
        })
        .map_err(anyhow::Error::from)?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/prefs.rs"]
mod tests;
