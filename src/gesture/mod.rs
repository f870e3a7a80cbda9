//! Pointer and wheel gesture recognition.
//!
//! One pointer pans, two pointers pinch (scale, rotation, and centre translation measured
//! frame-to-frame), a quick double tap resets, and a two-finger long press enters precision mode
//! with damped sensitivity. The wheel zooms around the cursor.

pub mod config;
pub mod engine;
pub mod events;
pub mod pointer;
pub mod precision;

pub use config::GestureConfig;
pub use engine::{GestureEngine, PinchReference, SessionState};
pub use events::{EmittedEvents, GestureEvent, GestureEventKind, GestureListeners, ListenerId};
pub use pointer::{PointerId, PointerInput, PointerRecord, SurfaceMetrics, WheelInput};
pub use precision::{HapticFeedback, NoHaptics, PrecisionModeController, PrecisionState};
