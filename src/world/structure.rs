use super::*;

const HULL_GRID_CELL_SIZE: f32 = 256.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullPrefab {
    pub name: String,
}
impl Default for HullPrefab {
    fn default() -> Self {
        Self {
            name: "Hull".to_string(),
        }
    }
}

/// Sealed interior region of a vessel.
#[derive(Debug, Clone)]
pub struct Hull {
    pub vessel: EntityId,
    /// Interior frame.
    pub rect: Rect,
}

/// Opening between two hulls.
#[derive(Debug, Clone)]
pub struct Gap {
    pub vessel: EntityId,
    /// Interior frame of `vessel`.
    pub rect: Rect,
    pub is_horizontal: bool,
    /// Left then right, or top then bottom.
    pub linked_to: [EntityId; 2],
}

pub struct Structures {
    /// Hulls can not be created without it.
    pub hull_prefab: Option<HullPrefab>,
    pub hulls: IndexMap<EntityId, Hull, RandomState>,
    pub gaps: IndexMap<EntityId, Gap, RandomState>,
}
impl Default for Structures {
    fn default() -> Self {
        Self {
            hull_prefab: Some(Default::default()),
            hulls: Default::default(),
            gaps: Default::default(),
        }
    }
}

/// Buckets a vessel's hulls by the grid cells they overlap.
#[derive(Default)]
pub struct HullGrid {
    cells: AHashMap<(i32, i32), SmallVec<[EntityId; 4]>>,
}
impl HullGrid {
    fn cells_of(rect: &Rect) -> impl Iterator<Item = (i32, i32)> {
        let min_x = (rect.x / HULL_GRID_CELL_SIZE).floor() as i32;
        let max_x = (rect.right() / HULL_GRID_CELL_SIZE).floor() as i32;
        let min_y = (rect.bottom() / HULL_GRID_CELL_SIZE).floor() as i32;
        let max_y = (rect.y / HULL_GRID_CELL_SIZE).floor() as i32;

        (min_x..=max_x).flat_map(move |x| (min_y..=max_y).map(move |y| (x, y)))
    }

    pub fn insert(&mut self, hull: EntityId, rect: &Rect) {
        for cell in Self::cells_of(rect) {
            let bucket = self.cells.entry(cell).or_default();
            if !bucket.contains(&hull) {
                bucket.push(hull);
            }
        }
    }

    pub fn remove(&mut self, hull: EntityId, rect: &Rect) {
        for cell in Self::cells_of(rect) {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.retain(|id| *id != hull);
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    /// Hulls which may contain `point`.
    pub fn candidates(&self, point: Vector<Real>) -> &[EntityId] {
        let cell = (
            (point.x / HULL_GRID_CELL_SIZE).floor() as i32,
            (point.y / HULL_GRID_CELL_SIZE).floor() as i32,
        );
        self.cells.get(&cell).map(|bucket| bucket.as_slice()).unwrap_or(&[])
    }
}

impl World {
    /// `rect` is in the vessel's interior frame.
    pub fn create_hull(
        &mut self,
        vessel: EntityId,
        rect: Rect,
        id: Option<EntityId>,
    ) -> anyhow::Result<EntityId> {
        if self.structures.hull_prefab.is_none() {
            return Err(DockingError::MissingHullPrefab.into());
        }
        if !self.vessels.contains_key(&vessel) {
            anyhow::bail!("Can not create hull on missing vessel {:?}", vessel);
        }

        let id = self.take_entity_id(id)?;
        self.structures.hulls.insert(id, Hull { vessel, rect });
        if let Some(vessel) = self.vessels.get_mut(&vessel) {
            vessel.hull_grid.insert(id, &rect);
        }

        Ok(id)
    }

    pub fn remove_hull(&mut self, id: EntityId) {
        let Some(hull) = self.structures.hulls.swap_remove(&id) else {
            return;
        };

        if let Some(vessel) = self.vessels.get_mut(&hull.vessel) {
            vessel.hull_grid.remove(id, &hull.rect);
        }
        self.entity_ids.delete_id(id);
    }

    pub fn create_gap(
        &mut self,
        vessel: EntityId,
        rect: Rect,
        is_horizontal: bool,
        linked_to: [EntityId; 2],
        id: Option<EntityId>,
    ) -> anyhow::Result<EntityId> {
        let id = self.take_entity_id(id)?;
        self.structures.gaps.insert(
            id,
            Gap {
                vessel,
                rect,
                is_horizontal,
                linked_to,
            },
        );

        Ok(id)
    }

    pub fn remove_gap(&mut self, id: EntityId) {
        if self.structures.gaps.swap_remove(&id).is_some() {
            self.entity_ids.delete_id(id);
        }
    }

    /// Hull of `vessel` containing `point` (interior frame).
    pub fn hull_at(&self, vessel: EntityId, point: Vector<Real>) -> Option<EntityId> {
        let vessel = self.vessels.get(&vessel)?;
        vessel
            .hull_grid
            .candidates(point)
            .iter()
            .copied()
            .find(|id| {
                self.structures
                    .hulls
                    .get(id)
                    .is_some_and(|hull| hull.rect.contains(point))
            })
    }

    /// Give hulls and gaps other ids, updating everything referring to them.
    ///
    /// Every old id is released before any new one is claimed, so new ids may
    /// overlap old ones. A structure whose new id is held by something else keeps
    /// its old id. Returns the final id of every structure moved, as `(old, final)`.
    pub fn reassign_structure_ids(
        &mut self,
        changes: &[(EntityId, EntityId)],
    ) -> anyhow::Result<SmallVec<[(EntityId, EntityId); 4]>> {
        enum Taken {
            Hull(Hull),
            Gap(Gap),
        }

        let mut taken = SmallVec::<[(EntityId, EntityId, Taken); 4]>::new();
        for &(old, new) in changes {
            let structure = if let Some(hull) = self.structures.hulls.swap_remove(&old) {
                if let Some(vessel) = self.vessels.get_mut(&hull.vessel) {
                    vessel.hull_grid.remove(old, &hull.rect);
                }
                Taken::Hull(hull)
            } else if let Some(gap) = self.structures.gaps.swap_remove(&old) {
                Taken::Gap(gap)
            } else {
                log::warn!("Can not move {:?}, not a hull or gap", old);
                continue;
            };
            self.entity_ids.delete_id(old);
            taken.push((old, new, structure));
        }

        let mut applied = SmallVec::<[(EntityId, EntityId); 4]>::new();
        for (old, new, structure) in taken {
            let id = if self.entity_ids.claim(new) {
                new
            } else {
                log::warn!("Can not move {:?} to {:?}, id already in use", old, new);
                // Another structure of this batch may have taken `old`.
                self.take_entity_id(Some(old))?
            };

            match structure {
                Taken::Hull(hull) => {
                    if let Some(vessel) = self.vessels.get_mut(&hull.vessel) {
                        vessel.hull_grid.insert(id, &hull.rect);
                    }
                    self.structures.hulls.insert(id, hull);
                }
                Taken::Gap(gap) => {
                    self.structures.gaps.insert(id, gap);
                }
            }
            applied.push((old, id));
        }

        let remap = |id: &mut EntityId| {
            if let Some((_, new)) = applied.iter().find(|(old, _)| *old == *id) {
                *id = *new;
            }
        };
        for gap in self.structures.gaps.values_mut() {
            gap.linked_to.iter_mut().for_each(remap);
        }
        for item in self.items.values_mut() {
            item.linked_to.iter_mut().for_each(remap);
        }
        for port in self.ports.values_mut() {
            port.replace_structure_ids(&applied);
        }

        Ok(applied)
    }
}
