pub mod camera;
pub mod core;
pub mod input;
pub mod picking;
pub mod scene;
pub mod systems;
