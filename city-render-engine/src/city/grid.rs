use bevy::prelude::*;
use constants::simulation::MAX_RESIDENTS_PER_BUILDING;

use super::arena::{Arena, SimObjectId};
use super::building::BuildingType;
use super::model::{CityError, CityModel, CitySummary, TileRef};
use super::sim_object::{Building, Decoration, SimEntity, SimObject, Tile};

/// Square grid city. Tiles, buildings and decorations share one arena so the
/// scene can map any rendered node to a single handle type.
#[derive(Resource, Debug)]
pub struct City {
    name: String,
    size: u32,
    sim_time: u64,
    objects: Arena<SimEntity>,
    /// Row-major tile handles, `y * size + x`.
    tiles: Vec<SimObjectId>,
    /// Bumped whenever buildings or decorations change.
    revision: u64,
}

impl City {
    pub fn new(size: u32, name: impl Into<String>) -> Self {
        let mut objects = Arena::default();
        let mut tiles = Vec::with_capacity((size * size) as usize);
        for y in 0..size as i32 {
            for x in 0..size as i32 {
                tiles.push(objects.insert(SimEntity::Tile(Tile::new(x, y))));
            }
        }

        let mut city = Self {
            name: name.into(),
            size,
            sim_time: 0,
            objects,
            tiles,
            revision: 0,
        };
        city.scatter_trees();
        city
    }

    /// Deterministic scenery so fresh cities are not a flat lawn.
    fn scatter_trees(&mut self) {
        let size = self.size as i32;
        for y in 0..size {
            for x in 0..size {
                if (x * 7 + y * 13) % 11 != 0 {
                    continue;
                }
                let Some(tile_id) = self.tile_id(x, y) else {
                    continue;
                };
                let tree = self
                    .objects
                    .insert(SimEntity::Decoration(Decoration::new("Tree", x, y)));
                if let Some(SimEntity::Tile(tile)) = self.objects.get_mut(tile_id) {
                    tile.decoration = Some(tree);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn objects(&self) -> impl Iterator<Item = (SimObjectId, &SimEntity)> {
        self.objects.iter()
    }

    pub fn entity(&self, id: SimObjectId) -> Option<&SimEntity> {
        self.objects.get(id)
    }

    pub fn population(&self) -> u32 {
        self.objects
            .iter()
            .filter_map(|(_, entity)| match entity {
                SimEntity::Building(building) => Some(building.residents),
                _ => None,
            })
            .sum()
    }

    fn tile_id(&self, x: i32, y: i32) -> Option<SimObjectId> {
        if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
            return None;
        }
        self.tiles.get((y * self.size as i32 + x) as usize).copied()
    }

    fn tile_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile, CityError> {
        let size = self.size;
        let id = self.tile_id(x, y).ok_or(CityError::OutOfBounds { x, y, size })?;
        match self.objects.get_mut(id) {
            Some(SimEntity::Tile(tile)) => Ok(tile),
            _ => Err(CityError::OutOfBounds { x, y, size }),
        }
    }
}

impl CityModel for City {
    fn tile(&self, x: i32, y: i32) -> Option<TileRef> {
        let id = self.tile_id(x, y)?;
        let SimEntity::Tile(tile) = self.objects.get(id)? else {
            return None;
        };
        let building = tile
            .building
            .and_then(|building_id| match self.objects.get(building_id) {
                Some(SimEntity::Building(building)) => Some(building.kind),
                _ => None,
            });
        Some(TileRef {
            id,
            x: tile.x,
            y: tile.y,
            building,
        })
    }

    fn place_building(&mut self, x: i32, y: i32, kind: BuildingType) -> Result<(), CityError> {
        if let Some(existing) = self.tile(x, y).and_then(|tile| tile.building) {
            return Err(CityError::Occupied {
                x,
                y,
                existing: existing.as_str(),
            });
        }

        let decoration = self.tile_mut(x, y)?.decoration.take();
        if let Some(decoration) = decoration {
            self.objects.remove(decoration);
        }

        let building = self
            .objects
            .insert(SimEntity::Building(Building::new(kind, x, y)));
        self.tile_mut(x, y)?.building = Some(building);
        self.revision += 1;
        debug!("Placed {} at ({}, {})", kind.as_str(), x, y);
        Ok(())
    }

    fn bulldoze(&mut self, x: i32, y: i32) -> Result<(), CityError> {
        let tile = self.tile_mut(x, y)?;
        let removed = tile.building.take().or_else(|| tile.decoration.take());
        let Some(removed) = removed else {
            return Err(CityError::NothingToRemove { x, y });
        };
        self.objects.remove(removed);
        self.revision += 1;
        debug!("Bulldozed ({}, {})", x, y);
        Ok(())
    }

    fn simulate(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.sim_time += 1;
            for (_, entity) in self.objects.iter_mut() {
                if let SimEntity::Building(building) = entity {
                    if building.kind.is_zone() && building.residents < MAX_RESIDENTS_PER_BUILDING {
                        building.residents += 1;
                    }
                }
            }
        }
    }

    fn summary(&self) -> CitySummary {
        CitySummary {
            name: self.name.clone(),
            population: self.population(),
            sim_time: self.sim_time,
            size: self.size,
        }
    }

    fn object(&self, id: SimObjectId) -> Option<&dyn SimObject> {
        self.objects.get(id).map(SimEntity::as_object)
    }

    fn object_mut(&mut self, id: SimObjectId) -> Option<&mut dyn SimObject> {
        self.objects.get_mut(id).map(SimEntity::as_object_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_tile(city: &City) -> (i32, i32) {
        city.objects()
            .find_map(|(_, entity)| match entity {
                SimEntity::Tile(tile) if tile.building.is_none() && tile.decoration.is_none() => {
                    Some((tile.x, tile.y))
                }
                _ => None,
            })
            .expect("an empty tile")
    }

    #[test]
    fn placement_marks_tile_occupied_and_rejects_second_building() {
        let mut city = City::new(8, "Testville");
        let (x, y) = empty_tile(&city);

        city.place_building(x, y, BuildingType::Road).unwrap();
        assert_eq!(city.tile(x, y).unwrap().building, Some(BuildingType::Road));

        let err = city.place_building(x, y, BuildingType::Residential).unwrap_err();
        assert_eq!(
            err,
            CityError::Occupied {
                x,
                y,
                existing: "road"
            }
        );
    }

    #[test]
    fn bulldoze_invalidates_building_handle() {
        let mut city = City::new(8, "Testville");
        let (x, y) = empty_tile(&city);
        city.place_building(x, y, BuildingType::Residential).unwrap();
        let tile_id = city.tile(x, y).unwrap().id;
        let Some(SimEntity::Tile(tile)) = city.entity(tile_id) else {
            panic!("tile handle resolves to a tile");
        };
        let building_id = tile.building.unwrap();

        city.bulldoze(x, y).unwrap();
        assert!(city.object(building_id).is_none());
        assert_eq!(city.tile(x, y).unwrap().building, None);
        assert_eq!(city.bulldoze(x, y), Err(CityError::NothingToRemove { x, y }));
    }

    #[test]
    fn out_of_range_commands_fail_locally() {
        let mut city = City::new(4, "Tiny");
        assert!(city.tile(-1, 0).is_none());
        assert!(city.tile(4, 0).is_none());
        assert!(matches!(
            city.place_building(9, 9, BuildingType::Road),
            Err(CityError::OutOfBounds { .. })
        ));
        assert!(matches!(city.bulldoze(-3, 2), Err(CityError::OutOfBounds { .. })));
    }

    #[test]
    fn zones_grow_population_up_to_capacity() {
        let mut city = City::new(8, "Testville");
        let (x, y) = empty_tile(&city);
        city.place_building(x, y, BuildingType::Residential).unwrap();

        city.simulate(10);
        let summary = city.summary();
        assert_eq!(summary.sim_time, 10);
        assert_eq!(summary.population, MAX_RESIDENTS_PER_BUILDING);
    }

    #[test]
    fn placing_over_a_tree_clears_it() {
        let mut city = City::new(16, "Leafy");
        let (tree_id, x, y) = city
            .objects()
            .find_map(|(id, entity)| match entity {
                SimEntity::Decoration(tree) => Some((id, tree.x, tree.y)),
                _ => None,
            })
            .expect("fresh cities have trees");

        city.place_building(x, y, BuildingType::Commercial).unwrap();
        assert!(city.object(tree_id).is_none());
    }
}
