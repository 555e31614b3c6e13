/// Wall-clock period between simulation ticks
pub const SIMULATION_TICK_MS: u64 = 1000;

/// Grid dimension of a freshly started city
pub const DEFAULT_CITY_SIZE: u32 = 16;

/// City name used by native builds that skip the naming prompt
pub const DEFAULT_CITY_NAME: &str = "New City";

/// Calendar date of tick zero, as (year, month, day)
pub const SIMULATION_EPOCH: (i32, u32, u32) = (2023, 1, 1);

/// Residents a single zoned building can hold
pub const MAX_RESIDENTS_PER_BUILDING: u32 = 4;
