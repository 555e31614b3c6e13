use std::collections::HashMap;

use bevy::prelude::*;

use crate::city::SimObjectId;

/// Maps rendered nodes back to the simulation objects they draw. Nodes
/// without an entry (ground slab, scenery helpers) pick as nothing.
#[derive(Resource, Default, Debug)]
pub struct RenderIndex {
    nodes: HashMap<Entity, SimObjectId>,
}

impl RenderIndex {
    pub fn insert(&mut self, node: Entity, object: SimObjectId) {
        self.nodes.insert(node, object);
    }

    pub fn get(&self, node: Entity) -> Option<SimObjectId> {
        self.nodes.get(&node).copied()
    }

    /// Drop every node whose object matches `predicate`, returning the nodes.
    pub fn take_where(&mut self, mut predicate: impl FnMut(SimObjectId) -> bool) -> Vec<Entity> {
        let removed: Vec<Entity> = self
            .nodes
            .iter()
            .filter(|(_, object)| predicate(**object))
            .map(|(node, _)| *node)
            .collect();
        for node in &removed {
            self.nodes.remove(node);
        }
        removed
    }
}
