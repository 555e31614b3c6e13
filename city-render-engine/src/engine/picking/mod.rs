//! Cursor picking against the city scene.
//!
//! A ray from the orbit camera through the cursor is tested against the
//! oriented boxes of every pickable node on the city render layer. The
//! nearest hit is mapped to its simulation object through [`RenderIndex`].
//!
//! Ghost previews live on a separate render layer and are never offered as
//! candidates, so they cannot occlude the cells under them.

/// Nearest-hit picking and NDC conversion.
pub mod picker;

/// Ray intersection utilities for oriented bounding boxes.
///
/// Slab method raycast against transformed AABBs in node-local space.
pub mod ray;

/// Render node to simulation object lookup.
pub mod render_index;

pub use picker::{PickBounds, PickCandidate, Picker, cursor_to_ndc};
pub use render_index::RenderIndex;
