use std::time::Duration;

use bevy::prelude::*;
use constants::simulation::SIMULATION_TICK_MS;

use super::presentation::{PresentationSink, TitleBar};
use crate::city::{CityModel, SimObjectId};

/// Advances the city on a wall-clock period, independent of frame rate.
/// The only caller of `CityModel::simulate`.
#[derive(Resource, Debug, Clone)]
pub struct SimulationDriver {
    timer: Timer,
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(SIMULATION_TICK_MS))
    }
}

impl SimulationDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            timer: Timer::new(period, TimerMode::Repeating),
        }
    }

    pub fn period(&self) -> Duration {
        self.timer.duration()
    }

    pub fn set_period(&mut self, period: Duration) {
        if period != self.timer.duration() {
            self.timer.set_duration(period);
            self.timer.reset();
        }
    }

    /// Run every tick that fell due during `delta`, one step each, then push
    /// the title bar and the selected object's fragment. Due ticks are
    /// dropped while paused. Returns the number of steps simulated.
    pub fn advance(
        &mut self,
        delta: Duration,
        paused: bool,
        model: &mut dyn CityModel,
        selected: Option<SimObjectId>,
        sink: &mut dyn PresentationSink,
    ) -> u32 {
        self.timer.tick(delta);
        let due = self.timer.times_finished_this_tick();
        if paused || due == 0 {
            return 0;
        }

        for _ in 0..due {
            model.simulate(1);
        }

        sink.update_title_bar(&TitleBar::from_summary(&model.summary()));
        let fragment = match selected {
            Some(id) => model.object(id).map(|object| object.to_display_fragment()),
            None => None,
        };
        sink.update_info_panel(fragment.as_ref());
        due
    }
}
