//! Application-side state: the framing session that owns the transform, refresh pacing,
//! scoped resource tracking, and the persisted onboarding flag.

pub mod editor;
pub mod pacing;
pub mod prefs;
pub mod resources;

pub use editor::{ExportedImage, FramingSession, export_filename};
pub use pacing::{PacingConfig, RenderPacer};
pub use prefs::OnboardingFlag;
pub use resources::{
    MemoryProbe, ResourceConfig, ResourceHandle, ResourceKind, ResourceStats, ResourceTracker,
    ScopedResource,
};
