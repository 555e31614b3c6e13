use std::time::Duration;

use bevy::prelude::*;

use crate::city::BuildingType;

/// Whether the previewed cell can take the building. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostValidity {
    Valid,
    Invalid,
}

/// Visual proxy for the building about to be placed. Never written into the
/// city grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostPreview {
    pub building_type: BuildingType,
    /// Grid cell `(x, y)` the ghost sits on.
    pub position: (i32, i32),
    pub validity: GhostValidity,
    pub visible: bool,
    token: u64,
}

impl GhostPreview {
    pub(crate) fn new(building_type: BuildingType, token: u64) -> Self {
        Self {
            building_type,
            position: (0, 0),
            validity: GhostValidity::Valid,
            visible: false,
            token,
        }
    }

    /// Identity of this ghost instance. A rebuilt ghost gets a fresh token.
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// One-shot timer that re-shows the ghost after a placement, provided the
/// ghost it was scheduled for still exists.
#[derive(Debug, Clone)]
pub struct DeferredRestore {
    timer: Timer,
    token: u64,
}

impl DeferredRestore {
    pub fn new(delay: Duration, token: u64) -> Self {
        Self {
            timer: Timer::new(delay, TimerMode::Once),
            token,
        }
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    /// Advance the timer, returning true once it has elapsed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.timer.tick(delta).finished()
    }
}
