//! Interactive runtime for a grid-based city builder.
//!
//! Input is normalised into a pointer snapshot, the orbit camera and picker
//! consume it, and the tool controller turns picks into focus, selection,
//! ghost previews and city commands. A separate clock advances the city
//! simulation and pushes summaries to the presentation layer.

pub mod city;
pub mod engine;
pub mod rpc;
pub mod tools;

pub use engine::core::app_setup::create_app;
