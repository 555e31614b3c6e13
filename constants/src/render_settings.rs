/// Delay before the ghost preview reappears after a placement
pub const GHOST_RESTORE_DELAY_MS: u64 = 50;

/// Render layer holding the ghost preview. The picker never queries it.
pub const GHOST_RENDER_LAYER: usize = 1;

/// Render layer holding pickable city geometry
pub const PICKABLE_RENDER_LAYER: usize = 0;

pub const GHOST_OPACITY: f32 = 0.7;

/// sRGB tints for ghost placement validity
pub const GHOST_VALID_COLOUR: [f32; 3] = [0.0, 1.0, 0.0];
pub const GHOST_INVALID_COLOUR: [f32; 3] = [1.0, 0.0, 0.0];

/// sRGB tile colours
pub const TILE_BASE_COLOUR: [f32; 3] = [0.33, 0.55, 0.27];
pub const TILE_FOCUSED_COLOUR: [f32; 3] = [0.55, 0.75, 0.45];
pub const TILE_SELECTED_COLOUR: [f32; 3] = [0.95, 0.85, 0.3];

/// Tile slab thickness
pub const TILE_HEIGHT: f32 = 0.1;
