use crate::foundation::core::TimeMs;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay of the trailing render after an interaction ends.
    pub settle_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { settle_ms: 200 }
    }
}

/// Decides, per display refresh, whether the preview should be redrawn.
///
/// Continuous while interacting, then a single settle render after the interaction ends. At most
/// one settle deadline is outstanding.
#[derive(Clone, Debug, Default)]
pub struct RenderPacer {
    config: PacingConfig,
    interacting: bool,
    pending: bool,
    settle_at: Option<TimeMs>,
}

impl RenderPacer {
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn settle_deadline(&self) -> Option<TimeMs> {
        self.settle_at
    }

    pub fn interaction_started(&mut self) {
        self.interacting = true;
        self.settle_at = None;
    }

    pub fn interaction_ended(&mut self, now: TimeMs) {
        self.interacting = false;
        self.settle_at = Some(now.after(self.config.settle_ms));
    }

    /// One-shot redraw on the next refresh. Supersedes a pending settle render.
    pub fn request_render(&mut self) {
        self.pending = true;
        self.settle_at = None;
    }

    /// Called on every display refresh. Returns `true` when a render is due.
    pub fn on_refresh(&mut self, now: TimeMs) -> bool {
        if self.interacting {
            self.pending = false;
            return true;
        }
        let settled = self.settle_at.is_some_and(|t| now >= t);
        if settled {
            self.settle_at = None;
        }
        std::mem::take(&mut self.pending) || settled
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/pacing.rs"]
mod tests;
