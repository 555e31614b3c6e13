//! Frame and clock systems tying the interaction components together.
//!
//! ## Frame Ordering
//!
//! ```text
//! InputQueue ──drain──> InputState ──gestures──> OrbitCamera
//!                            │
//!                            └──cursor──> Picker ──> ToolController
//!                                                        │
//!                                  ghost restore <───────┤
//!                                  City <──commands──────┘
//! SimulationDriver ──tick──> City ──summary──> PresentationSink
//! ```
//!
//! All of it runs inside one `Update` system, so input is always captured
//! before the camera and picker read it, and picking finishes before the
//! tools consume the result.

/// Native text overlay for the title bar, tool and info panel.
pub mod hud;

/// Per-frame orchestration of input, camera, picking and tools.
pub mod orchestrator;

/// Presentation sink trait, title bar content and the overlay sink.
pub mod presentation;

/// Fixed-period simulation tick driver.
pub mod simulation;

pub use orchestrator::{FrameOutcome, Orchestrator, pick_candidates, run_city_frame};
pub use presentation::{HudPresentation, PresentationSink, TitleBar, simulation_date};
pub use simulation::SimulationDriver;
