use std::path::Path;

use crate::assets::photo::PhotoOpts;
use crate::foundation::error::{FramerError, FramerResult};
use crate::gesture::config::GestureConfig;
use crate::render::compositor::RenderOpts;
use crate::session::pacing::PacingConfig;
use crate::session::resources::ResourceConfig;

/// All tunables of a framing session. Every section and field is optional in JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    pub gesture: GestureConfig,
    pub render: RenderOpts,
    pub photo: PhotoOpts,
    pub pacing: PacingConfig,
    pub resources: ResourceConfig,
}

impl FramerConfig {
    pub fn from_json(s: &str) -> FramerResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| FramerError::validation(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> FramerResult<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json(&s)
    }

    pub fn validate(&self) -> FramerResult<()> {
        self.gesture.validate()?;
        self.render.validate()?;
        if self.photo.max_dimension == 0 {
            return Err(FramerError::validation("photo.max_dimension must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
