use bevy::prelude::*;
use chrono::{Days, NaiveDate};
use constants::simulation::SIMULATION_EPOCH;
use serde::Serialize;

use crate::city::{CitySummary, DisplayFragment};
use crate::tools::ToolState;

/// Calendar date for a number of elapsed simulation days.
pub fn simulation_date(sim_time: u64) -> Option<NaiveDate> {
    let (year, month, day) = SIMULATION_EPOCH;
    NaiveDate::from_ymd_opt(year, month, day)?.checked_add_days(Days::new(sim_time))
}

/// Title bar content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleBar {
    pub name: String,
    pub population: u32,
    /// `month/day/year`, e.g. `1/2/2023`.
    pub date: String,
}

impl TitleBar {
    pub fn from_summary(summary: &CitySummary) -> Self {
        let date = simulation_date(summary.sim_time)
            .map(|date| date.format("%-m/%-d/%Y").to_string())
            .unwrap_or_default();
        Self {
            name: summary.name.clone(),
            population: summary.population,
            date,
        }
    }
}

/// Where the core pushes display updates. Implementations render or forward
/// them; the core never reads anything back.
pub trait PresentationSink {
    fn update_title_bar(&mut self, title: &TitleBar);

    /// `None` hides the panel.
    fn update_info_panel(&mut self, fragment: Option<&DisplayFragment>);

    fn tool_changed(&mut self, tool: ToolState);
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn update_title_bar(&mut self, title: &TitleBar) {
        (**self).update_title_bar(title);
    }

    fn update_info_panel(&mut self, fragment: Option<&DisplayFragment>) {
        (**self).update_info_panel(fragment);
    }

    fn tool_changed(&mut self, tool: ToolState) {
        (**self).tool_changed(tool);
    }
}

/// Fan out to two sinks.
impl<A: PresentationSink, B: PresentationSink> PresentationSink for (A, B) {
    fn update_title_bar(&mut self, title: &TitleBar) {
        self.0.update_title_bar(title);
        self.1.update_title_bar(title);
    }

    fn update_info_panel(&mut self, fragment: Option<&DisplayFragment>) {
        self.0.update_info_panel(fragment);
        self.1.update_info_panel(fragment);
    }

    fn tool_changed(&mut self, tool: ToolState) {
        self.0.tool_changed(tool);
        self.1.tool_changed(tool);
    }
}

/// Latest presentation state, read by the native overlay.
#[derive(Resource, Debug, Clone, Default)]
pub struct HudPresentation {
    pub title: Option<TitleBar>,
    pub info: Option<DisplayFragment>,
    pub tool: ToolState,
}

impl PresentationSink for HudPresentation {
    fn update_title_bar(&mut self, title: &TitleBar) {
        self.title = Some(title.clone());
    }

    fn update_info_panel(&mut self, fragment: Option<&DisplayFragment>) {
        self.info = fragment.cloned();
    }

    fn tool_changed(&mut self, tool: ToolState) {
        self.tool = tool;
    }
}
