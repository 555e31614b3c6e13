//! Pointer and touch input normalisation.
//!
//! Platform events are queued as [`RawInputEvent`]s and drained once per
//! frame into [`InputState`], which keeps a viewport-local
//! [`PointerSnapshot`] and emits [`PointerGesture`]s for the camera.
//!
//! ## Touch mapping
//!
//! ```text
//! one finger   -> primary button, cursor follows the finger
//! two fingers  -> middle button (pan), cursor at the midpoint, pinch zoom
//! any lift     -> all simulated buttons released
//! ```

/// Bevy event collection into the per-frame input queue.
pub mod input_queue;

/// Pointer snapshot, button mask and gesture derivation.
pub mod pointer_state;

pub use input_queue::{InputQueue, collect_input_events, seed_viewport, sync_viewport_rect};
pub use pointer_state::{
    ButtonMask, InputState, PointerButton, PointerGesture, PointerSnapshot, RawInputEvent,
};
