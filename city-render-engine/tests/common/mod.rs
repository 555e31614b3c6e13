#![allow(dead_code)]

use bevy::prelude::*;
use city_render_engine::city::{
    BuildingType, City, CityError, CityModel, CitySummary, DisplayFragment, SimEntity, SimObject,
    SimObjectId, TileRef,
};
use city_render_engine::engine::camera::OrbitCamera;
use city_render_engine::engine::picking::{PickCandidate, RenderIndex};
use city_render_engine::engine::scene::{cell_transform, structure_box};
use city_render_engine::engine::systems::{PresentationSink, TitleBar};
use city_render_engine::tools::ToolState;

/// Real city that counts the commands it receives.
pub struct CountingCity {
    pub inner: City,
    pub bulldoze_calls: Vec<(i32, i32)>,
    pub place_calls: Vec<(i32, i32, BuildingType)>,
    pub simulate_calls: u32,
}

impl CountingCity {
    pub fn new(size: u32) -> Self {
        Self {
            inner: City::new(size, "Testburg"),
            bulldoze_calls: Vec::new(),
            place_calls: Vec::new(),
            simulate_calls: 0,
        }
    }

    pub fn tile_id(&self, x: i32, y: i32) -> SimObjectId {
        self.inner.tile(x, y).expect("tile in range").id
    }

    /// Building standing on `(x, y)`, if any.
    pub fn building_id(&self, x: i32, y: i32) -> Option<SimObjectId> {
        match self.inner.entity(self.tile_id(x, y)) {
            Some(SimEntity::Tile(tile)) => tile.building,
            _ => None,
        }
    }

    /// Tree or other scenery on `(x, y)`, if any.
    pub fn decoration_id(&self, x: i32, y: i32) -> Option<SimObjectId> {
        match self.inner.entity(self.tile_id(x, y)) {
            Some(SimEntity::Tile(tile)) => tile.decoration,
            _ => None,
        }
    }
}

impl CityModel for CountingCity {
    fn tile(&self, x: i32, y: i32) -> Option<TileRef> {
        self.inner.tile(x, y)
    }

    fn place_building(&mut self, x: i32, y: i32, kind: BuildingType) -> Result<(), CityError> {
        self.place_calls.push((x, y, kind));
        self.inner.place_building(x, y, kind)
    }

    fn bulldoze(&mut self, x: i32, y: i32) -> Result<(), CityError> {
        self.bulldoze_calls.push((x, y));
        self.inner.bulldoze(x, y)
    }

    fn simulate(&mut self, ticks: u32) {
        self.simulate_calls += ticks;
        self.inner.simulate(ticks);
    }

    fn summary(&self) -> CitySummary {
        self.inner.summary()
    }

    fn object(&self, id: SimObjectId) -> Option<&dyn SimObject> {
        self.inner.object(id)
    }

    fn object_mut(&mut self, id: SimObjectId) -> Option<&mut dyn SimObject> {
        self.inner.object_mut(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presented {
    Title(TitleBar),
    Info(Option<DisplayFragment>),
    Tool(ToolState),
}

/// Sink that records every call in order.
#[derive(Default)]
pub struct RecordingSink {
    pub calls: Vec<Presented>,
}

impl PresentationSink for RecordingSink {
    fn update_title_bar(&mut self, title: &TitleBar) {
        self.calls.push(Presented::Title(title.clone()));
    }

    fn update_info_panel(&mut self, fragment: Option<&DisplayFragment>) {
        self.calls.push(Presented::Info(fragment.cloned()));
    }

    fn tool_changed(&mut self, tool: ToolState) {
        self.calls.push(Presented::Tool(tool));
    }
}

/// One pickable slab per tile, registered in a fresh index.
pub fn tile_scene(city: &City) -> (Vec<PickCandidate>, RenderIndex) {
    let mut index = RenderIndex::default();
    let mut candidates = Vec::new();
    let size = city.size() as i32;
    for y in 0..size {
        for x in 0..size {
            let Some(tile) = city.tile(x, y) else {
                continue;
            };
            let node = Entity::from_raw((y * size + x) as u32);
            index.insert(node, tile.id);
            candidates.push(PickCandidate {
                node,
                world: Mat4::from_translation(Vec3::new(x as f32, -0.05, y as f32)),
                size: Vec3::new(1.0, 0.1, 1.0),
            });
        }
    }
    (candidates, index)
}

/// Tiles plus a box for every building and tree, laid out the way the scene
/// sync draws them.
pub fn city_scene(city: &City) -> (Vec<PickCandidate>, RenderIndex) {
    let (mut candidates, mut index) = tile_scene(city);
    let mut next = city.size() * city.size();
    for (id, entity) in city.objects() {
        let Some(structure) = structure_box(entity) else {
            continue;
        };
        let node = Entity::from_raw(next);
        next += 1;
        index.insert(node, id);
        candidates.push(PickCandidate {
            node,
            world: cell_transform(structure.x, structure.y, structure.size).compute_matrix(),
            size: structure.size,
        });
    }
    (candidates, index)
}

/// Viewport pixel that looks at the top centre of tile `(x, y)`.
pub fn cursor_over_tile(camera: &OrbitCamera, viewport: Vec2, x: i32, y: i32) -> Vec2 {
    let ndc = camera
        .view_projection()
        .project_point3(Vec3::new(x as f32, 0.0, y as f32));
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}
