use serde::Serialize;
use thiserror::Error;

use super::arena::SimObjectId;
use super::building::BuildingType;
use super::sim_object::SimObject;

/// Rejections from the city model. Local failures, never process-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityError {
    #[error("tile ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: u32 },
    #[error("tile ({x}, {y}) already holds a {existing}")]
    Occupied {
        x: i32,
        y: i32,
        existing: &'static str,
    },
    #[error("tile ({x}, {y}) has nothing to remove")]
    NothingToRemove { x: i32, y: i32 },
}

/// Read-only view of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRef {
    pub id: SimObjectId,
    pub x: i32,
    pub y: i32,
    pub building: Option<BuildingType>,
}

/// Fields the title bar shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitySummary {
    pub name: String,
    pub population: u32,
    pub sim_time: u64,
    pub size: u32,
}

/// Everything the interaction layer needs from the city simulation.
pub trait CityModel {
    fn tile(&self, x: i32, y: i32) -> Option<TileRef>;

    fn place_building(&mut self, x: i32, y: i32, kind: BuildingType) -> Result<(), CityError>;

    fn bulldoze(&mut self, x: i32, y: i32) -> Result<(), CityError>;

    /// Advance the simulation by `ticks` discrete steps.
    fn simulate(&mut self, ticks: u32);

    fn summary(&self) -> CitySummary;

    fn object(&self, id: SimObjectId) -> Option<&dyn SimObject>;

    fn object_mut(&mut self, id: SimObjectId) -> Option<&mut dyn SimObject>;
}
