use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnType {
    /// Navigation node.
    Path,
    Human,
    Enemy,
    Cargo,
}

#[derive(Debug, Clone)]
pub struct Waypoint {
    pub vessel: EntityId,
    /// Interior frame.
    pub position: Vector<Real>,
    pub spawn_type: SpawnType,
    /// Symmetric.
    pub links: SmallVec<[WaypointId; 4]>,
}

#[derive(Default)]
pub struct WaypointGraph {
    next_id: u32,
    pub nodes: IndexMap<WaypointId, Waypoint, RandomState>,
}
impl WaypointGraph {
    pub fn add(
        &mut self,
        vessel: EntityId,
        position: Vector<Real>,
        spawn_type: SpawnType,
    ) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            Waypoint {
                vessel,
                position,
                spawn_type,
                links: SmallVec::new(),
            },
        );

        id
    }

    /// Does nothing if either node is missing or they are already linked.
    pub fn link(&mut self, a: WaypointId, b: WaypointId) {
        if a == b || !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return;
        }

        for (from, to) in [(a, b), (b, a)] {
            if let Some(node) = self.nodes.get_mut(&from) {
                if !node.links.contains(&to) {
                    node.links.push(to);
                }
            }
        }
    }

    pub fn unlink(&mut self, a: WaypointId, b: WaypointId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(node) = self.nodes.get_mut(&from) {
                node.links.retain(|id| *id != to);
            }
        }
    }

    pub fn is_linked(&self, a: WaypointId, b: WaypointId) -> bool {
        self.nodes
            .get(&a)
            .is_some_and(|node| node.links.contains(&b))
    }

    /// `Path` nodes of `vessel` inside `rect` (interior frame).
    pub fn path_nodes_in(&self, vessel: EntityId, rect: &Rect) -> SmallVec<[WaypointId; 8]> {
        self.nodes
            .iter()
            .filter(|(_, node)| {
                node.vessel == vessel
                    && node.spawn_type == SpawnType::Path
                    && rect.contains(node.position)
            })
            .map(|(id, _)| *id)
            .collect()
    }
}
