mod common;

use std::time::Duration;

use bevy::prelude::*;
use city_render_engine::city::{BuildingType, CityError, CityModel, SimObject};
use city_render_engine::engine::camera::OrbitCamera;
use city_render_engine::engine::core::settings::CameraSettings;
use city_render_engine::engine::input::{ButtonMask, InputState, PointerButton, RawInputEvent};
use city_render_engine::engine::picking::{PickCandidate, RenderIndex};
use city_render_engine::engine::systems::{FrameOutcome, Orchestrator, SimulationDriver};
use city_render_engine::tools::{Activation, GhostValidity, ToolController, ToolState};
use common::{CountingCity, Presented, RecordingSink, city_scene, cursor_over_tile};

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
const FRAME: Duration = Duration::from_millis(16);

/// Cells near the default camera target with no building and no tree.
const OPEN: (i32, i32) = (8, 9);
const OPEN_EAST: (i32, i32) = (9, 8);
const CENTRE: (i32, i32) = (8, 8);
/// Seeded with a tree in every fresh city.
const TREE: (i32, i32) = (10, 9);

struct Harness {
    input: InputState,
    camera: OrbitCamera,
    tools: ToolController,
    simulation: SimulationDriver,
    city: CountingCity,
    candidates: Vec<PickCandidate>,
    index: RenderIndex,
    scene_revision: u64,
    sink: RecordingSink,
}

impl Harness {
    fn new() -> Self {
        let city = CountingCity::new(16);
        let (candidates, index) = city_scene(&city.inner);
        let scene_revision = city.inner.revision();
        Self {
            input: InputState::new(VIEWPORT),
            camera: OrbitCamera::new(CameraSettings::default(), VIEWPORT.x / VIEWPORT.y),
            tools: ToolController::default(),
            simulation: SimulationDriver::default(),
            city,
            candidates,
            index,
            scene_revision,
            sink: RecordingSink::default(),
        }
    }

    /// Rebuild pickable structures when the city changed, as the scene sync
    /// does right after the frame system.
    fn sync_scene(&mut self) {
        if self.city.inner.revision() == self.scene_revision {
            return;
        }
        let (candidates, index) = city_scene(&self.city.inner);
        self.candidates = candidates;
        self.index = index;
        self.scene_revision = self.city.inner.revision();
    }

    fn cursor(&self, (x, y): (i32, i32)) -> Vec2 {
        cursor_over_tile(&self.camera, VIEWPORT, x, y)
    }

    fn select_tool(&mut self, tool: ToolState) -> bool {
        let mut orchestrator = Orchestrator {
            input: &mut self.input,
            camera: &mut self.camera,
            tools: &mut self.tools,
            simulation: &mut self.simulation,
            model: &mut self.city,
        };
        orchestrator.select_tool(tool, &mut self.sink)
    }

    fn frame_with(
        &mut self,
        events: Vec<RawInputEvent>,
        candidates: Vec<PickCandidate>,
        delta: Duration,
    ) -> FrameOutcome {
        let mut orchestrator = Orchestrator {
            input: &mut self.input,
            camera: &mut self.camera,
            tools: &mut self.tools,
            simulation: &mut self.simulation,
            model: &mut self.city,
        };
        let outcome = orchestrator.frame(events, candidates, &self.index, delta, &mut self.sink);
        self.sync_scene();
        outcome
    }

    fn frame_for(&mut self, events: Vec<RawInputEvent>, delta: Duration) -> FrameOutcome {
        let candidates = self.candidates.clone();
        self.frame_with(events, candidates, delta)
    }

    fn frame(&mut self, events: Vec<RawInputEvent>) -> FrameOutcome {
        self.frame_for(events, FRAME)
    }

    fn hover(&mut self, cell: (i32, i32)) -> FrameOutcome {
        let position = self.cursor(cell);
        self.frame(vec![RawInputEvent::PointerMove {
            position,
            delta: Vec2::ZERO,
            buttons: ButtonMask::NONE,
        }])
    }

    fn press(&mut self, cell: (i32, i32), delta: Duration) -> FrameOutcome {
        let position = self.cursor(cell);
        self.frame_for(
            vec![
                RawInputEvent::PointerMove {
                    position,
                    delta: Vec2::ZERO,
                    buttons: ButtonMask::NONE,
                },
                RawInputEvent::PointerDown {
                    button: PointerButton::Primary,
                    position,
                },
            ],
            delta,
        )
    }

    fn release(&mut self, cell: (i32, i32)) -> FrameOutcome {
        let position = self.cursor(cell);
        self.frame(vec![RawInputEvent::PointerUp {
            button: PointerButton::Primary,
            position,
        }])
    }

    fn click(&mut self, cell: (i32, i32)) -> FrameOutcome {
        let outcome = self.press(cell, FRAME);
        self.release(cell);
        outcome
    }

    fn place(&mut self, (x, y): (i32, i32), kind: BuildingType) {
        self.city.inner.place_building(x, y, kind).unwrap();
        self.sync_scene();
    }
}

#[test]
fn horizontal_drag_rotates_from_default_pose() {
    let mut h = Harness::new();
    let start = Vec2::new(400.0, 300.0);
    h.frame(vec![
        RawInputEvent::PointerDown {
            button: PointerButton::Primary,
            position: start,
        },
        RawInputEvent::PointerMove {
            position: start + Vec2::new(100.0, 0.0),
            delta: Vec2::new(100.0, 0.0),
            buttons: ButtonMask::PRIMARY,
        },
    ]);

    assert!((h.camera.azimuth - 205.0).abs() < 1e-4);
    assert_eq!(h.camera.elevation, 45.0);
}

#[test]
fn primary_drag_does_not_orbit_while_bulldozing() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Bulldoze);
    h.frame(vec![RawInputEvent::PointerMove {
        position: Vec2::new(500.0, 300.0),
        delta: Vec2::new(100.0, 0.0),
        buttons: ButtonMask::PRIMARY,
    }]);

    assert_eq!(h.camera.azimuth, 225.0);
}

#[test]
fn pinch_out_zooms_in() {
    let mut h = Harness::new();
    let before = h.camera.radius;
    h.frame(vec![
        RawInputEvent::TouchStart {
            id: 1,
            position: Vec2::new(380.0, 300.0),
        },
        RawInputEvent::TouchStart {
            id: 2,
            position: Vec2::new(420.0, 300.0),
        },
    ]);
    assert_eq!(h.input.previous_pinch_distance(), Some(40.0));

    h.frame(vec![
        RawInputEvent::TouchMove {
            id: 1,
            position: Vec2::new(360.0, 300.0),
        },
        RawInputEvent::TouchMove {
            id: 2,
            position: Vec2::new(440.0, 300.0),
        },
    ]);

    assert!(h.camera.radius > before);
    assert_eq!(h.input.previous_pinch_distance(), Some(80.0));
    assert_eq!(h.camera.target, Vec3::new(8.0, 0.0, 8.0));
}

#[test]
fn bulldoze_without_focus_never_reaches_the_city() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Bulldoze);

    let outcome = h.frame_with(
        vec![RawInputEvent::PointerDown {
            button: PointerButton::Primary,
            position: Vec2::new(400.0, 300.0),
        }],
        Vec::new(),
        FRAME,
    );

    assert_eq!(outcome.activation, Some(Ok(Activation::Ignored)));
    assert!(h.city.bulldoze_calls.is_empty());
    assert!(h.tools.focused().is_none());
}

#[test]
fn structure_is_picked_ahead_of_its_tile() {
    let mut h = Harness::new();
    h.place(OPEN, BuildingType::Residential);
    let building = h.city.building_id(OPEN.0, OPEN.1);
    assert!(building.is_some());

    h.hover(OPEN);
    assert_eq!(h.tools.focused(), building);

    h.hover(TREE);
    assert_eq!(h.tools.focused(), h.city.decoration_id(TREE.0, TREE.1));

    h.hover(CENTRE);
    assert_eq!(h.tools.focused(), Some(h.city.tile_id(CENTRE.0, CENTRE.1)));
}

#[test]
fn ghost_follows_the_cell_under_a_focused_structure() {
    let mut h = Harness::new();
    h.place(OPEN, BuildingType::Commercial);
    h.select_tool(ToolState::Build(BuildingType::Road));

    h.hover(OPEN);
    let ghost = h.tools.ghost().unwrap();
    assert_eq!(ghost.position, OPEN);
    assert_eq!(ghost.validity, GhostValidity::Invalid);

    // Trees never block a placement.
    h.hover(TREE);
    let ghost = h.tools.ghost().unwrap();
    assert_eq!(ghost.position, TREE);
    assert_eq!(ghost.validity, GhostValidity::Valid);
}

#[test]
fn selecting_a_building_shows_its_fragment() {
    let mut h = Harness::new();
    h.place(OPEN, BuildingType::Residential);

    let outcome = h.click(OPEN);

    let building = h.city.building_id(OPEN.0, OPEN.1);
    assert_eq!(outcome.activation, Some(Ok(Activation::Selected(building))));
    assert!(h.sink.calls.iter().any(|call| matches!(
        call,
        Presented::Info(Some(fragment)) if fragment.title == "Residential Zone"
    )));
}

#[test]
fn bulldoze_through_a_focused_building_issues_one_command() {
    let mut h = Harness::new();
    h.place(OPEN, BuildingType::Commercial);
    h.select_tool(ToolState::Bulldoze);

    let outcome = h.click(OPEN);

    assert_eq!(
        outcome.activation,
        Some(Ok(Activation::Bulldozed { x: OPEN.0, y: OPEN.1 }))
    );
    assert_eq!(h.city.bulldoze_calls, vec![OPEN]);
    assert!(h.city.tile(OPEN.0, OPEN.1).unwrap().building.is_none());
}

#[test]
fn holding_after_a_placement_does_not_place_again() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Build(BuildingType::Residential));

    h.press(OPEN, FRAME);
    assert_eq!(h.city.place_calls, vec![(OPEN.0, OPEN.1, BuildingType::Residential)]);

    // The new building now sits in front of the tile and takes the focus.
    let held = h.frame(Vec::new());
    assert!(held.focus_changed);
    assert_eq!(h.tools.focused(), h.city.building_id(OPEN.0, OPEN.1));
    assert!(held.activation.is_none());

    h.frame(Vec::new());
    h.release(OPEN);
    assert_eq!(h.city.place_calls.len(), 1);
}

#[test]
fn holding_after_a_bulldoze_does_not_bulldoze_again() {
    let mut h = Harness::new();
    h.place(OPEN, BuildingType::Industrial);
    h.select_tool(ToolState::Bulldoze);

    h.press(OPEN, FRAME);
    let held = h.frame(Vec::new());

    assert!(held.focus_changed, "focus drops back to the bare tile");
    assert_eq!(h.tools.focused(), Some(h.city.tile_id(OPEN.0, OPEN.1)));
    assert!(held.activation.is_none());
    assert_eq!(h.city.bulldoze_calls, vec![OPEN]);
}

#[test]
fn selection_survives_focus_moving_elsewhere() {
    let mut h = Harness::new();
    let a = h.city.tile_id(CENTRE.0, CENTRE.1);
    let b = h.city.tile_id(OPEN_EAST.0, OPEN_EAST.1);

    let outcome = h.click(CENTRE);
    assert_eq!(outcome.activation, Some(Ok(Activation::Selected(Some(a)))));
    assert!(h.sink.calls.iter().any(|call| matches!(
        call,
        Presented::Info(Some(fragment)) if fragment.title == "Tile"
    )));

    let outcome = h.hover(OPEN_EAST);
    assert!(outcome.focus_changed);
    assert!(outcome.activation.is_none());
    assert_eq!(h.tools.focused(), Some(b));
    assert_eq!(h.tools.selected(), Some(a));

    let object_a = h.city.object(a).unwrap();
    let object_b = h.city.object(b).unwrap();
    assert!(object_a.is_selected() && !object_a.is_focused());
    assert!(object_b.is_focused() && !object_b.is_selected());
}

#[test]
fn repeated_frames_over_same_cell_keep_focus_stable() {
    let mut h = Harness::new();
    let first = h.hover(CENTRE);
    let focused = h.tools.focused();
    let second = h.hover(CENTRE);

    assert!(first.focus_changed);
    assert!(!second.focus_changed);
    assert_eq!(h.tools.focused(), focused);
    assert_eq!(focused, Some(h.city.tile_id(CENTRE.0, CENTRE.1)));
}

#[test]
fn switching_build_type_replaces_the_ghost() {
    let mut h = Harness::new();
    assert!(h.select_tool(ToolState::Build(BuildingType::Residential)));
    let first = h.tools.ghost().unwrap().token();

    assert!(h.select_tool(ToolState::Build(BuildingType::Industrial)));
    let ghost = h.tools.ghost().unwrap();
    assert_ne!(ghost.token(), first);
    assert_eq!(ghost.building_type, BuildingType::Industrial);

    assert!(h.sink.calls.contains(&Presented::Tool(ToolState::Build(
        BuildingType::Industrial
    ))));
}

#[test]
fn leaving_build_mode_drops_the_ghost() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Build(BuildingType::Road));
    h.hover(CENTRE);
    assert!(h.tools.ghost().unwrap().visible);

    h.select_tool(ToolState::Select);
    assert!(h.tools.ghost().is_none());
}

#[test]
fn reselecting_the_current_tool_is_silent() {
    let mut h = Harness::new();
    assert!(!h.select_tool(ToolState::Select));
    assert!(h.sink.calls.is_empty());
}

#[test]
fn placement_hides_ghost_until_restore_delay_elapses() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Build(BuildingType::Residential));

    let outcome = h.click(OPEN);
    assert_eq!(
        outcome.activation,
        Some(Ok(Activation::Placed {
            x: OPEN.0,
            y: OPEN.1,
            kind: BuildingType::Residential
        }))
    );

    // Only the release frame has counted against the delay so far.
    assert!(h.tools.restore_pending());
    assert!(!h.tools.ghost().unwrap().visible);
    h.frame_for(Vec::new(), Duration::from_millis(40));
    h.hover(OPEN);

    let ghost = h.tools.ghost().unwrap();
    assert!(!h.tools.restore_pending());
    assert!(ghost.visible);
    assert_eq!(ghost.validity, GhostValidity::Invalid);
}

#[test]
fn slow_placement_frame_still_hides_the_ghost() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Build(BuildingType::Road));
    h.hover(OPEN);
    assert!(h.tools.ghost().unwrap().visible);

    h.press(OPEN, Duration::from_millis(60));
    assert!(!h.tools.ghost().unwrap().visible);
    assert!(h.tools.restore_pending());

    h.frame_for(Vec::new(), Duration::from_millis(60));
    assert!(h.tools.ghost().unwrap().visible);
    assert!(!h.tools.restore_pending());
}

#[test]
fn restore_scheduled_for_a_replaced_ghost_does_nothing() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Build(BuildingType::Residential));
    h.click(OPEN);
    assert!(h.tools.restore_pending());

    h.select_tool(ToolState::Build(BuildingType::Commercial));
    let token = h.tools.ghost().unwrap().token();
    h.frame_for(Vec::new(), Duration::from_millis(100));

    let ghost = h.tools.ghost().unwrap();
    assert_eq!(ghost.token(), token);
    assert_eq!(ghost.building_type, BuildingType::Commercial);
}

#[test]
fn occupied_cell_rejects_placement_once_without_retry() {
    let mut h = Harness::new();
    h.place(OPEN, BuildingType::Road);
    h.select_tool(ToolState::Build(BuildingType::Residential));

    let outcome = h.click(OPEN);

    assert!(matches!(
        outcome.activation,
        Some(Err(CityError::Occupied { .. }))
    ));
    assert_eq!(h.city.place_calls.len(), 1);
}

#[test]
fn held_drag_paints_each_newly_focused_cell_once() {
    let mut h = Harness::new();
    h.select_tool(ToolState::Build(BuildingType::Road));

    let a = h.cursor(CENTRE);
    let b = h.cursor(OPEN_EAST);
    h.press(CENTRE, FRAME);
    h.frame(vec![RawInputEvent::PointerMove {
        position: b,
        delta: b - a,
        buttons: ButtonMask::PRIMARY,
    }]);
    // The road just placed under the cursor takes the focus; same cell.
    h.frame(vec![RawInputEvent::PointerMove {
        position: b,
        delta: Vec2::ZERO,
        buttons: ButtonMask::PRIMARY,
    }]);

    assert_eq!(h.tools.focused(), h.city.building_id(OPEN_EAST.0, OPEN_EAST.1));
    assert_eq!(
        h.city.place_calls,
        vec![
            (CENTRE.0, CENTRE.1, BuildingType::Road),
            (OPEN_EAST.0, OPEN_EAST.1, BuildingType::Road)
        ]
    );
}

#[test]
fn simulation_ticks_follow_wall_clock_and_respect_pause() {
    let mut h = Harness::new();
    let mut orchestrator = Orchestrator {
        input: &mut h.input,
        camera: &mut h.camera,
        tools: &mut h.tools,
        simulation: &mut h.simulation,
        model: &mut h.city,
    };

    assert_eq!(orchestrator.tick_simulation(Duration::from_millis(2500), false, &mut h.sink), 2);
    assert_eq!(orchestrator.tick_simulation(Duration::from_millis(2000), true, &mut h.sink), 0);
    assert_eq!(h.city.simulate_calls, 2);
    assert!(h.sink.calls.iter().any(|call| matches!(call, Presented::Title(_))));
}
