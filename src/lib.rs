//! Photo framing core.
//!
//! Raw pointer and wheel input goes into a [`GestureEngine`], which emits transform deltas. A
//! [`FramingSession`] owns the single [`PhotoTransform`], merges those deltas, and drives a
//! [`CompositeRenderer`] that draws the photo, custom overlays, and a decorative frame identically
//! for the on-screen preview and the exported PNG.
//!
//! Time is supplied by the host (`TimeMs` on every input, plus
//! [`GestureEngine::advance_to`]), so all timer behaviour is deterministic.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod config;
pub mod gesture;
pub mod logging;
pub mod render;
pub mod session;
pub mod share;
pub mod transform;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, TimeMs, Vec2};
pub use crate::foundation::error::{FramerError, FramerResult};

pub use crate::assets::{
    FrameLibrary, FrameSelection, Photo, PhotoOpts, RasterImage, process_photo,
};
pub use crate::config::FramerConfig;
pub use crate::gesture::{GestureConfig, GestureEngine, GestureEvent, PointerInput, WheelInput};
pub use crate::render::{
    CompositeInputs, CompositeRenderer, CustomOverlayState, FrameRGBA, OutputFormat, RenderOpts,
};
pub use crate::session::{ExportedImage, FramingSession};
pub use crate::share::{ShareTarget, SharePayload, share_with_fallback};
pub use crate::transform::{MAX_SCALE, MIN_SCALE, PhotoTransform, TransformDelta};
