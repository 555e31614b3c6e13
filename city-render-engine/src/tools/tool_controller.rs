use std::time::Duration;

use bevy::prelude::*;

use super::ghost::{DeferredRestore, GhostPreview, GhostValidity};
use super::tool_manager::ToolState;
use crate::city::{BuildingType, CityError, CityModel, DisplayFragment, SimObjectId};

/// What a "use tool" activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Bulldoze or build with nothing focused.
    Ignored,
    Selected(Option<SimObjectId>),
    Bulldozed { x: i32, y: i32 },
    Placed { x: i32, y: i32, kind: BuildingType },
}

/// Ghost validity for a cell: valid only when the cell exists and holds no
/// building.
pub fn placement_validity(model: &dyn CityModel, x: i32, y: i32) -> GhostValidity {
    match model.tile(x, y) {
        Some(tile) if tile.building.is_none() => GhostValidity::Valid,
        _ => GhostValidity::Invalid,
    }
}

/// Tool state machine. Owns the focused/selected handles and the ghost
/// preview; the objects themselves stay in the city model.
#[derive(Resource, Debug, Clone)]
pub struct ToolController {
    tool: ToolState,
    focused: Option<SimObjectId>,
    selected: Option<SimObjectId>,
    ghost: Option<GhostPreview>,
    next_token: u64,
    restore: Option<DeferredRestore>,
    restore_delay: Duration,
    /// Cell the tool was last used on during the current press.
    last_used_cell: Option<(i32, i32)>,
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            constants::render_settings::GHOST_RESTORE_DELAY_MS,
        ))
    }
}

impl ToolController {
    pub fn new(restore_delay: Duration) -> Self {
        Self {
            tool: ToolState::Select,
            focused: None,
            selected: None,
            ghost: None,
            next_token: 0,
            restore: None,
            restore_delay,
            last_used_cell: None,
        }
    }

    pub fn tool(&self) -> ToolState {
        self.tool
    }

    pub fn focused(&self) -> Option<SimObjectId> {
        self.focused
    }

    pub fn selected(&self) -> Option<SimObjectId> {
        self.selected
    }

    pub fn ghost(&self) -> Option<&GhostPreview> {
        self.ghost.as_ref()
    }

    pub fn restore_pending(&self) -> bool {
        self.restore.is_some()
    }

    pub fn set_restore_delay(&mut self, delay: Duration) {
        self.restore_delay = delay;
    }

    /// Switch tools. Leaving `Build` drops the ghost; entering `Build` with a
    /// different type builds a fresh one. Returns false if nothing changed.
    pub fn set_tool(&mut self, tool: ToolState) -> bool {
        if self.tool == tool {
            return false;
        }

        let previous = self.tool;
        self.tool = tool;
        self.last_used_cell = None;
        match tool {
            ToolState::Build(kind) => {
                if self.ghost.as_ref().is_none_or(|g| g.building_type != kind) {
                    self.ghost = Some(self.fresh_ghost(kind));
                }
            }
            ToolState::Select | ToolState::Bulldoze => self.ghost = None,
        }

        info!("Tool changed: {} -> {}", previous.id(), tool.id());
        true
    }

    /// Move the focus flag to the picked object. Returns true when the
    /// focused object changed.
    pub fn update_focus(&mut self, model: &mut dyn CityModel, pick: Option<SimObjectId>) -> bool {
        if let Some(id) = self.focused {
            if let Some(object) = model.object_mut(id) {
                object.set_focused(false);
            }
        }

        let changed = pick != self.focused;
        if changed {
            self.focused = pick;
        }

        if let Some(id) = self.focused {
            match model.object_mut(id) {
                Some(object) => object.set_focused(true),
                None => self.focused = None,
            }
        }
        changed
    }

    /// Keep the ghost on the focused cell while building, drop it otherwise.
    pub fn update_ghost(&mut self, model: &dyn CityModel) {
        let ToolState::Build(kind) = self.tool else {
            self.ghost = None;
            return;
        };

        if self.ghost.as_ref().is_none_or(|g| g.building_type != kind) {
            self.ghost = Some(self.fresh_ghost(kind));
        }

        let cell = self.focused_cell(model);
        let restoring = self.restore.as_ref().map(DeferredRestore::token);
        let Some(ghost) = self.ghost.as_mut() else {
            return;
        };

        match cell {
            Some((x, y)) => {
                ghost.position = (x, y);
                ghost.validity = placement_validity(model, x, y);
                ghost.visible = restoring != Some(ghost.token());
            }
            None => ghost.visible = false,
        }
    }

    /// Fire once when the primary button goes down, and again while it is
    /// held each time focus lands on a cell not yet used during this press.
    /// Focus moving between objects on one cell never repeats the command.
    pub fn wants_activation(&self, model: &dyn CityModel, pressed: bool, held: bool) -> bool {
        if pressed {
            return true;
        }
        held && self
            .focused_cell(model)
            .is_some_and(|cell| self.last_used_cell != Some(cell))
    }

    /// Use the active tool on the focused object. Model rejections are
    /// returned as-is and never retried.
    pub fn activate(&mut self, model: &mut dyn CityModel) -> Result<Activation, CityError> {
        self.last_used_cell = self.focused_cell(model);
        match self.tool {
            ToolState::Select => {
                if let Some(previous) = self.selected.take() {
                    if let Some(object) = model.object_mut(previous) {
                        object.set_selected(false);
                    }
                }
                self.selected = self.focused;
                if let Some(id) = self.selected {
                    if let Some(object) = model.object_mut(id) {
                        object.set_selected(true);
                    }
                }
                Ok(Activation::Selected(self.selected))
            }
            ToolState::Bulldoze => {
                let Some((x, y)) = self.focused_cell(model) else {
                    return Ok(Activation::Ignored);
                };
                model.bulldoze(x, y)?;
                Ok(Activation::Bulldozed { x, y })
            }
            ToolState::Build(kind) => {
                let Some((x, y)) = self.focused_cell(model) else {
                    return Ok(Activation::Ignored);
                };
                if let Some(ghost) = self.ghost.as_mut().filter(|g| g.visible) {
                    ghost.visible = false;
                    self.restore = Some(DeferredRestore::new(self.restore_delay, ghost.token()));
                }
                model.place_building(x, y, kind)?;
                Ok(Activation::Placed { x, y, kind })
            }
        }
    }

    /// Advance the pending ghost restore. A restore scheduled for a ghost
    /// that has since been dropped or rebuilt does nothing.
    pub fn tick_deferred(&mut self, delta: Duration) -> bool {
        let Some(restore) = self.restore.as_mut() else {
            return false;
        };
        if !restore.tick(delta) {
            return false;
        }

        let token = restore.token();
        self.restore = None;
        match self.ghost.as_mut() {
            Some(ghost) if ghost.token() == token => {
                ghost.visible = self.focused.is_some();
                true
            }
            _ => {
                debug!("Discarding stale ghost restore {}", token);
                false
            }
        }
    }

    /// Info panel content for the selected object, if it still exists.
    pub fn selected_fragment(&self, model: &dyn CityModel) -> Option<DisplayFragment> {
        self.selected
            .and_then(|id| model.object(id))
            .map(|object| object.to_display_fragment())
    }

    /// Forget every handle into the previous city. The active tool is kept.
    pub fn reset(&mut self) {
        self.focused = None;
        self.selected = None;
        self.ghost = self.tool.building_type().map(|kind| self.fresh_ghost(kind));
        self.restore = None;
        self.last_used_cell = None;
    }

    fn focused_cell(&self, model: &dyn CityModel) -> Option<(i32, i32)> {
        self.focused
            .and_then(|id| model.object(id))
            .map(|object| object.grid_position())
    }

    fn fresh_ghost(&mut self, kind: BuildingType) -> GhostPreview {
        self.next_token += 1;
        GhostPreview::new(kind, self.next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{City, SimEntity};

    fn tile_id(city: &City, x: i32, y: i32) -> SimObjectId {
        city.tile(x, y).unwrap().id
    }

    #[test]
    fn focus_follows_pick_and_flags_move() {
        let mut city = City::new(4, "Test");
        let mut tools = ToolController::default();
        let a = tile_id(&city, 1, 1);
        let b = tile_id(&city, 2, 1);

        assert!(tools.update_focus(&mut city, Some(a)));
        assert!(city.object(a).unwrap().is_focused());

        assert!(!tools.update_focus(&mut city, Some(a)));
        assert!(city.object(a).unwrap().is_focused());

        assert!(tools.update_focus(&mut city, Some(b)));
        assert!(!city.object(a).unwrap().is_focused());
        assert!(city.object(b).unwrap().is_focused());

        assert!(tools.update_focus(&mut city, None));
        assert!(!city.object(b).unwrap().is_focused());
        assert_eq!(tools.focused(), None);
    }

    #[test]
    fn ghost_tracks_focus_and_validity() {
        let mut city = City::new(4, "Test");
        city.place_building(2, 2, BuildingType::Road).unwrap();
        let mut tools = ToolController::default();
        tools.set_tool(ToolState::Build(BuildingType::Residential));

        tools.update_ghost(&city);
        let ghost = tools.ghost().unwrap();
        assert!(!ghost.visible, "no focus keeps the ghost hidden");

        let focus = tile_id(&city, 1, 2);
        tools.update_focus(&mut city, Some(focus));
        tools.update_ghost(&city);
        let ghost = tools.ghost().unwrap();
        assert!(ghost.visible);
        assert_eq!(ghost.position, (1, 2));
        assert_eq!(ghost.validity, GhostValidity::Valid);

        let focus = tile_id(&city, 2, 2);
        tools.update_focus(&mut city, Some(focus));
        tools.update_ghost(&city);
        assert_eq!(tools.ghost().unwrap().validity, GhostValidity::Invalid);

        let token = tools.ghost().unwrap().token();
        tools.update_focus(&mut city, None);
        tools.update_ghost(&city);
        let ghost = tools.ghost().unwrap();
        assert!(!ghost.visible);
        assert_eq!(ghost.token(), token, "losing focus hides, never destroys");
    }

    #[test]
    fn build_hides_ghost_until_restore() {
        let mut city = City::new(4, "Test");
        let mut tools = ToolController::new(Duration::from_millis(50));
        tools.set_tool(ToolState::Build(BuildingType::Road));
        let focus = tile_id(&city, 1, 0);
        tools.update_focus(&mut city, Some(focus));
        tools.update_ghost(&city);

        let outcome = tools.activate(&mut city).unwrap();
        assert_eq!(
            outcome,
            Activation::Placed {
                x: 1,
                y: 0,
                kind: BuildingType::Road
            }
        );
        assert!(!tools.ghost().unwrap().visible);

        tools.update_ghost(&city);
        assert!(!tools.ghost().unwrap().visible, "stays hidden while pending");

        assert!(!tools.tick_deferred(Duration::from_millis(20)));
        assert!(tools.tick_deferred(Duration::from_millis(40)));
        assert!(tools.ghost().unwrap().visible);
        assert!(!tools.restore_pending());
    }

    #[test]
    fn restore_after_tool_change_is_a_no_op() {
        let mut city = City::new(4, "Test");
        let mut tools = ToolController::new(Duration::from_millis(50));
        tools.set_tool(ToolState::Build(BuildingType::Road));
        let focus = tile_id(&city, 0, 0);
        tools.update_focus(&mut city, Some(focus));
        tools.update_ghost(&city);
        tools.activate(&mut city).unwrap();

        tools.set_tool(ToolState::Select);
        assert!(tools.ghost().is_none());
        assert!(!tools.tick_deferred(Duration::from_millis(100)));
        assert!(tools.ghost().is_none(), "a removed ghost is never revived");
    }

    #[test]
    fn occupied_placement_error_is_reported_once() {
        let mut city = City::new(4, "Test");
        city.place_building(3, 3, BuildingType::Industrial).unwrap();
        let mut tools = ToolController::default();
        tools.set_tool(ToolState::Build(BuildingType::Road));
        let focus = tile_id(&city, 3, 3);
        tools.update_focus(&mut city, Some(focus));
        tools.update_ghost(&city);

        let err = tools.activate(&mut city).unwrap_err();
        assert!(matches!(err, CityError::Occupied { x: 3, y: 3, .. }));
    }

    #[test]
    fn activation_edges() {
        let mut city = City::new(4, "Test");
        let mut tools = ToolController::default();
        assert!(tools.wants_activation(&city, true, true));
        assert!(!tools.wants_activation(&city, false, true), "nothing focused");

        let focus = tile_id(&city, 0, 1);
        tools.update_focus(&mut city, Some(focus));
        assert!(tools.wants_activation(&city, false, true));
        assert!(!tools.wants_activation(&city, false, false));

        tools.activate(&mut city).unwrap();
        assert!(!tools.wants_activation(&city, false, true), "cell already used");
        assert!(tools.wants_activation(&city, true, true), "a new press always fires");

        let focus = tile_id(&city, 1, 1);
        tools.update_focus(&mut city, Some(focus));
        assert!(tools.wants_activation(&city, false, true));
    }

    #[test]
    fn focus_moving_to_the_new_building_does_not_repeat_placement() {
        let mut city = City::new(4, "Test");
        let mut tools = ToolController::default();
        tools.set_tool(ToolState::Build(BuildingType::Residential));
        let focus = tile_id(&city, 2, 1);
        tools.update_focus(&mut city, Some(focus));
        tools.activate(&mut city).unwrap();

        let Some(SimEntity::Tile(tile)) = city.entity(tile_id(&city, 2, 1)) else {
            panic!("tile handle resolves to a tile");
        };
        let building = tile.building.unwrap();
        assert!(tools.update_focus(&mut city, Some(building)));
        assert!(!tools.wants_activation(&city, false, true));
    }

    #[test]
    fn reset_forgets_handles_but_keeps_tool() {
        let mut city = City::new(4, "Test");
        let mut tools = ToolController::default();
        let focus = tile_id(&city, 0, 0);
        tools.update_focus(&mut city, Some(focus));
        tools.activate(&mut city).unwrap();
        tools.set_tool(ToolState::Build(BuildingType::Commercial));

        tools.reset();
        assert_eq!(tools.focused(), None);
        assert_eq!(tools.selected(), None);
        assert_eq!(tools.tool(), ToolState::Build(BuildingType::Commercial));
        assert!(tools.ghost().is_some());
    }
}
