use std::time::Duration;

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::PICKABLE_RENDER_LAYER;

use super::presentation::{HudPresentation, PresentationSink};
use super::simulation::SimulationDriver;
use crate::city::{City, CityError, CityModel};
use crate::engine::camera::OrbitCamera;
use crate::engine::core::app_state::UiState;
use crate::engine::input::{ButtonMask, InputQueue, InputState, RawInputEvent};
use crate::engine::picking::{PickBounds, PickCandidate, Picker, RenderIndex};
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::{Activation, ToolController, ToolSelectionEvent, ToolState};

/// Result of one interaction frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    pub focus_changed: bool,
    /// Present when the tool was used this frame.
    pub activation: Option<Result<Activation, CityError>>,
}

/// Borrows every interaction component for one update. Nothing here reaches
/// for global state; the caller hands in each collaborator.
pub struct Orchestrator<'a> {
    pub input: &'a mut InputState,
    pub camera: &'a mut OrbitCamera,
    pub tools: &'a mut ToolController,
    pub simulation: &'a mut SimulationDriver,
    pub model: &'a mut dyn CityModel,
}

impl Orchestrator<'_> {
    /// Apply a tool selection and tell the frontend if it changed anything.
    pub fn select_tool(&mut self, tool: ToolState, sink: &mut dyn PresentationSink) -> bool {
        let changed = self.tools.set_tool(tool);
        if changed {
            sink.tool_changed(tool);
        }
        changed
    }

    /// One render frame: drain input, move the camera, pick, advance the
    /// deferred ghost restore, then use the tool.
    pub fn frame(
        &mut self,
        events: impl IntoIterator<Item = RawInputEvent>,
        candidates: impl IntoIterator<Item = PickCandidate>,
        index: &RenderIndex,
        delta: Duration,
        sink: &mut dyn PresentationSink,
    ) -> FrameOutcome {
        let mut gestures = Vec::new();
        for event in events {
            self.input.handle(&event, &mut gestures);
        }

        let orbit_enabled = self.tools.tool().allows_orbit();
        for gesture in &gestures {
            self.camera.apply_gesture(gesture, orbit_enabled);
        }

        let snapshot = self.input.snapshot();
        let pick = Picker::pick(
            snapshot.cursor,
            self.input.viewport_size(),
            self.camera,
            candidates,
            index,
        );

        let focus_changed = self.tools.update_focus(self.model, pick);
        self.tools.update_ghost(self.model);

        // A restore scheduled below only starts counting next frame.
        self.tools.tick_deferred(delta);

        let pressed = self.input.take_primary_press();
        let held = snapshot.buttons.contains(ButtonMask::PRIMARY);
        let activation = if self.tools.wants_activation(self.model, pressed, held) {
            Some(self.activate(sink))
        } else {
            None
        };

        FrameOutcome {
            focus_changed,
            activation,
        }
    }

    /// Advance the simulation clock.
    pub fn tick_simulation(
        &mut self,
        delta: Duration,
        paused: bool,
        sink: &mut dyn PresentationSink,
    ) -> u32 {
        let selected = self.tools.selected();
        self.simulation
            .advance(delta, paused, self.model, selected, sink)
    }

    fn activate(&mut self, sink: &mut dyn PresentationSink) -> Result<Activation, CityError> {
        let result = self.tools.activate(self.model);
        match &result {
            Ok(Activation::Selected(_)) => {
                let fragment = self.tools.selected_fragment(self.model);
                sink.update_info_panel(fragment.as_ref());
            }
            Ok(Activation::Ignored) => {}
            Ok(activation) => debug!("Tool used: {:?}", activation),
            Err(err) => warn!("{} rejected: {}", self.tools.tool().id(), err),
        }
        result
    }
}

/// Pickable nodes on the pickable layer. Nodes without explicit layers sit
/// on the default layer.
pub fn pick_candidates<'a>(
    pickables: impl IntoIterator<Item = (Entity, &'a GlobalTransform, &'a PickBounds, Option<&'a RenderLayers>)>,
) -> Vec<PickCandidate> {
    let pickable_layer = RenderLayers::layer(PICKABLE_RENDER_LAYER);
    pickables
        .into_iter()
        .filter(|(_, _, _, layers)| layers.is_none_or(|layers| layers.intersects(&pickable_layer)))
        .map(|(node, transform, bounds, _)| PickCandidate {
            node,
            world: transform.compute_matrix(),
            size: bounds.0,
        })
        .collect()
}

/// Per-frame driver: tool changes, interaction frame, then simulation tick.
#[allow(clippy::too_many_arguments)]
pub fn run_city_frame(
    time: Res<Time>,
    ui: Res<UiState>,
    index: Res<RenderIndex>,
    mut tool_events: EventReader<ToolSelectionEvent>,
    mut queue: ResMut<InputQueue>,
    mut input: ResMut<InputState>,
    mut camera: ResMut<OrbitCamera>,
    mut tools: ResMut<ToolController>,
    mut simulation: ResMut<SimulationDriver>,
    mut city: ResMut<City>,
    mut rpc: ResMut<WebRpcInterface>,
    mut hud: ResMut<HudPresentation>,
    pickables: Query<(Entity, &GlobalTransform, &PickBounds, Option<&RenderLayers>)>,
) {
    let mut sink = (rpc.as_mut(), hud.as_mut());
    let mut orchestrator = Orchestrator {
        input: input.as_mut(),
        camera: camera.as_mut(),
        tools: tools.as_mut(),
        simulation: simulation.as_mut(),
        model: city.as_mut(),
    };

    for event in tool_events.read() {
        info!("Tool selection {:?} via {:?}", event.tool, event.source);
        orchestrator.select_tool(event.tool, &mut sink);
    }

    let candidates = pick_candidates(&pickables);
    orchestrator.frame(queue.drain(), candidates, &index, time.delta(), &mut sink);
    orchestrator.tick_simulation(time.delta(), ui.paused, &mut sink);
}
