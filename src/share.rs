//! Hand-off of an exported PNG to whatever sharing mechanisms the host offers.
//!
//! Strategies are tried in order; a failure falls through to the next one and only the last
//! failure is surfaced.

use std::path::{Path, PathBuf};

use crate::foundation::error::{FramerError, FramerResult};
use crate::render::format::OutputFormat;

const DEFAULT_TAG: &str = "#PhotoFrame";

/// What is handed to a share strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    pub png: Vec<u8>,
    pub filename: String,
    pub text: String,
}

/// One way of getting the image off the device: native share sheet, clipboard, download...
pub trait ShareTarget {
    fn name(&self) -> &str;

    fn share(&mut self, payload: &SharePayload) -> FramerResult<()>;
}

/// Try each target in order. Returns the name of the one that succeeded.
pub fn share_with_fallback(
    targets: &mut [&mut dyn ShareTarget],
    payload: &SharePayload,
) -> FramerResult<String> {
    if targets.is_empty() {
        return Err(FramerError::share("no share targets configured"));
    }
    let mut last_error = None;
    for target in targets.iter_mut() {
        match target.share(payload) {
            Ok(()) => {
                tracing::debug!(target = target.name(), file = %payload.filename, "shared");
                return Ok(target.name().to_owned());
            }
            Err(e) => {
                tracing::warn!(target = target.name(), error = %e, "share strategy failed");
                last_error = Some(format!("{}: {e}", target.name()));
            }
        }
    }
    Err(FramerError::share(format!(
        "all {} strategies failed, last: {}",
        targets.len(),
        last_error.unwrap_or_default()
    )))
}

/// Platforms a format is typically posted to.
pub fn platform_recommendations(format_key: &str) -> &'static [&'static str] {
    match format_key {
        "square" => &["Instagram post", "Facebook post", "Twitter post"],
        "portrait" => &["Instagram portrait post", "Facebook post"],
        "story" => &["Instagram story", "TikTok", "Facebook story"],
        _ => &["social media"],
    }
}

/// Caption offered alongside the image.
pub fn share_text(format: &OutputFormat, theme_message: Option<&str>) -> String {
    let platforms = platform_recommendations(format.key).join(", ");
    let tag = theme_message.unwrap_or(DEFAULT_TAG);
    format!("My {} framed photo! Made for {platforms} {tag}", format.display_name)
}

/// Plain download: writes the PNG into a directory under the payload's filename.
#[derive(Clone, Debug)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination for `filename`; rejects names that would escape the directory.
    pub fn target_path(&self, filename: &str) -> FramerResult<PathBuf> {
        let name = Path::new(filename);
        let plain = name.file_name().is_some_and(|f| f == name.as_os_str());
        if filename.is_empty() || !plain {
            return Err(FramerError::validation(format!(
                "download filename must be a bare file name, got '{filename}'"
            )));
        }
        Ok(self.dir.join(name))
    }
}

impl ShareTarget for DirectoryDownload {
    fn name(&self) -> &str {
        "download"
    }

    fn share(&mut self, payload: &SharePayload) -> FramerResult<()> {
        if payload.png.is_empty() {
            return Err(FramerError::encode("empty image payload"));
        }
        let path = self.target_path(&payload.filename)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, &payload.png)?;
        tracing::debug!(path = %path.display(), bytes = payload.png.len(), "image written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/share.rs"]
mod tests;
