//! City model boundary and the reference grid implementation.
//!
//! The interaction layer never owns simulation objects. It talks to the city
//! through [`CityModel`] and holds only generational [`SimObjectId`] handles,
//! so a handle to a bulldozed building simply stops resolving.

/// Generational arena backing every simulation object.
pub mod arena;

/// Building catalogue with stable string identifiers.
pub mod building;

/// Grid-based reference city used by the binary and integration tests.
pub mod grid;

/// The `CityModel` trait consumed by tools and the simulation driver.
pub mod model;

/// Pickable simulation object capability and its concrete variants.
pub mod sim_object;

pub use arena::{Arena, SimObjectId};
pub use building::BuildingType;
pub use grid::City;
pub use model::{CityError, CityModel, CitySummary, TileRef};
pub use sim_object::{Building, Decoration, DisplayFragment, FragmentRow, SimEntity, SimObject, Tile};
