//! Bee registry — every living bee plus a running role census.
//!
//! Neighbor queries and eviction are linear scans. That is fine for a few
//! thousand bees; a larger hive would index bees on a grid the way the
//! pheromone field indexes trails.

use hive_core::census::RoleCensus;
use hive_core::types::{Bee, BeeId, Position, Role};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct BeeRegistry {
    bees: BTreeMap<BeeId, Bee>,
    census: RoleCensus,
}

impl BeeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bee: Bee) {
        self.census.add(bee.role);
        if let Some(old) = self.bees.insert(bee.id, bee) {
            self.census.remove(old.role);
        }
    }

    pub fn remove(&mut self, id: &BeeId) -> Option<Bee> {
        let bee = self.bees.remove(id)?;
        self.census.remove(bee.role);
        Some(bee)
    }

    pub fn get(&self, id: &BeeId) -> Option<&Bee> {
        self.bees.get(id)
    }

    /// Mutable access for energy, position and assignment.
    /// Role changes must go through [`BeeRegistry::set_role`].
    pub(crate) fn get_mut(&mut self, id: &BeeId) -> Option<&mut Bee> {
        self.bees.get_mut(id)
    }

    /// Change a bee's role, keeping the census in step. Returns the old role.
    pub fn set_role(&mut self, id: &BeeId, role: Role) -> Option<Role> {
        let bee = self.bees.get_mut(id)?;
        let old = bee.role;
        if old != role {
            bee.role = role;
            self.census.remove(old);
            self.census.add(role);
        }
        Some(old)
    }

    pub fn len(&self) -> usize {
        self.bees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bees.is_empty()
    }

    pub fn census(&self) -> &RoleCensus {
        &self.census
    }

    pub fn ids(&self) -> Vec<BeeId> {
        self.bees.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bee> {
        self.bees.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bee> {
        self.bees.values_mut()
    }

    /// The bee to evict when the hive is full: lowest energy, then the
    /// longest idle.
    pub fn weakest(&self) -> Option<BeeId> {
        self.bees
            .values()
            .min_by(|a, b| {
                a.energy
                    .total_cmp(&b.energy)
                    .then_with(|| a.last_active.cmp(&b.last_active))
            })
            .map(|b| b.id)
    }

    /// Bees within `radius` of `position`, skipping `exclude`.
    pub fn within(&self, position: &Position, radius: f64, exclude: Option<BeeId>) -> Vec<&Bee> {
        self.bees
            .values()
            .filter(|b| Some(b.id) != exclude)
            .filter(|b| b.position.distance_to(position) <= radius)
            .collect()
    }

    /// Neighbors of bee `id`. Empty if the bee does not exist.
    pub fn nearby(&self, id: &BeeId, radius: f64) -> Vec<&Bee> {
        match self.bees.get(id) {
            Some(bee) => self.within(&bee.position, radius, Some(*id)),
            None => Vec::new(),
        }
    }
}
