//! CPU compositing of photo, overlays, and frame into the output format.
//!
//! Preview and export share one draw sequence; only the target surface differs.

pub mod compositor;
pub mod format;
pub mod overlay;
pub(crate) mod text;

pub use compositor::{CompositeInputs, CompositeRenderer, FrameRGBA, RenderOpts, encode_png};
pub use format::OutputFormat;
pub use overlay::{CustomOverlayState, ImageOverlay, TextOverlay};
