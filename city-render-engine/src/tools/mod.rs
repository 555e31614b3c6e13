//! Interaction tools: select, bulldoze and build with a ghost preview.
//!
//! ## Tool Activation Flow
//!
//! ```text
//! Keyboard/RPC Input
//!   └─> ToolSelectionEvent
//!       └─> ToolController::set_tool()
//!           ├─> Build(B) after Build(A): rebuild ghost
//!           ├─> Select/Bulldoze: drop ghost
//!           └─> tool_state_changed notification
//! ```
//!
//! ## Per-frame Flow
//!
//! 1. `update_focus` moves the focus flag to the picked object.
//! 2. `update_ghost` keeps the ghost on the focused cell and tints it.
//! 3. `tick_deferred` re-shows a ghost hidden by an earlier placement,
//!    unless that ghost has been replaced in the meantime.
//! 4. `activate` runs when the primary button is pressed, or is held while
//!    focus moves to a cell not yet used during that press.
//!
//! City model rejections (occupied cell, nothing to bulldoze) are reported
//! back to the caller and logged; the controller never retries.

/// Ghost preview data and the cancellable restore timer.
pub mod ghost;

/// Focus, selection and ghost state machine.
pub mod tool_controller;

/// Tool identifiers, selection events and native shortcuts.
pub mod tool_manager;

pub use ghost::{DeferredRestore, GhostPreview, GhostValidity};
pub use tool_controller::{Activation, ToolController, placement_validity};
pub use tool_manager::{
    TogglePauseEvent, ToolSelectionEvent, ToolSelectionSource, ToolState,
    handle_tool_keyboard_shortcuts,
};
