//! Pheromone field — the shared environment bees read and write.
//!
//! Trails live in a map keyed by id and are indexed by a uniform 3D grid
//! (cell coordinate → trail ids). Every range query only touches the cells
//! that can contain a hit, so tolerance checks and `strongest_from` stay
//! cheap as the field grows.
//!
//! Intensity decays exponentially with wall-clock time, `intensity *=
//! rate^Δt`, and a trail that falls below the removal threshold evaporates.

use crate::config::SwarmConfig;
use chrono::{DateTime, Utc};
use hive_core::clock::elapsed_secs;
use hive_core::types::{FlowerId, Pattern, Position, Trail, TrailId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

type Cell = (i64, i64, i64);

/// The context that matches every trail type in [`PheromoneField::patterns_for`].
pub const ALL_CONTEXTS: &str = "all";

/// Grid-indexed store of decaying trails.
#[derive(Debug, Clone)]
pub struct PheromoneField {
    trails: HashMap<TrailId, Trail>,
    grid: HashMap<Cell, HashSet<TrailId>>,
    cell_size: f64,
    tolerance: f64,
    merge_by_type: bool,
    decay_rate: f64,
    removal_threshold: f64,
}

impl Default for PheromoneField {
    fn default() -> Self {
        Self::new(&SwarmConfig::default())
    }
}

impl PheromoneField {
    pub fn new(config: &SwarmConfig) -> Self {
        Self {
            trails: HashMap::new(),
            grid: HashMap::new(),
            cell_size: config.cell_size,
            tolerance: config.deposit_tolerance,
            merge_by_type: config.merge_by_type,
            decay_rate: config.decay_rate,
            removal_threshold: config.removal_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    pub fn get(&self, id: &TrailId) -> Option<&Trail> {
        self.trails.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trail> {
        self.trails.values()
    }

    /// Number of grid cells holding at least one trail.
    pub fn occupied_cells(&self) -> usize {
        self.grid.len()
    }

    fn cell_of(&self, position: &Position) -> Cell {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
            (position.z / self.cell_size).floor() as i64,
        )
    }

    /// Ids of every trail whose cell lies within `reach` cells of `center`.
    fn ids_near(&self, center: Cell, reach: i64) -> Vec<TrailId> {
        let side = (2 * reach + 1) as u128;
        let neighborhood = side.saturating_mul(side).saturating_mul(side);
        let span = reach as u64;
        let within = |cell: &Cell| {
            cell.0.abs_diff(center.0) <= span
                && cell.1.abs_diff(center.1) <= span
                && cell.2.abs_diff(center.2) <= span
        };

        // Huge radii over a sparse grid: walking occupied cells is cheaper.
        if neighborhood > self.grid.len() as u128 {
            return self
                .grid
                .iter()
                .filter(|(cell, _)| within(cell))
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect();
        }

        let mut ids = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let cell = (
                        center.0.saturating_add(dx),
                        center.1.saturating_add(dy),
                        center.2.saturating_add(dz),
                    );
                    if let Some(bucket) = self.grid.get(&cell) {
                        ids.extend(bucket.iter().copied());
                    }
                }
            }
        }
        ids
    }

    /// Trails within Euclidean `radius` of `position`, unordered.
    fn within(&self, position: &Position, radius: f64) -> Vec<&Trail> {
        if self.trails.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let reach = (radius / self.cell_size).ceil().min(i64::MAX as f64 / 4.0) as i64;
        self.ids_near(self.cell_of(position), reach)
            .into_iter()
            .filter_map(|id| self.trails.get(&id))
            .filter(|t| t.position.distance_to(position) <= radius)
            .collect()
    }

    /// Lay down a trail, or reinforce the nearest trail within the deposit
    /// tolerance. With `merge_by_type` set, only trails of the same type are
    /// candidates.
    ///
    /// Reinforcing adds `intensity` (capped at 1.0), refreshes the trail and
    /// bumps its deposit count. It never lowers intensity and keeps the
    /// trail's original type.
    pub fn deposit(
        &mut self,
        position: Position,
        kind: &str,
        intensity: f64,
        flower: Option<FlowerId>,
        detail: Option<String>,
        now: DateTime<Utc>,
    ) -> &Trail {
        let intensity = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };

        let existing = self
            .within(&position, self.tolerance)
            .into_iter()
            .filter(|t| !self.merge_by_type || t.kind == kind)
            .min_by(|a, b| {
                a.position
                    .distance_to(&position)
                    .total_cmp(&b.position.distance_to(&position))
            })
            .map(|t| t.id);

        let id = match existing {
            Some(id) => {
                if let Some(trail) = self.trails.get_mut(&id) {
                    trail.intensity = (trail.intensity + intensity).min(1.0);
                    trail.refreshed_at = now;
                    trail.decayed_at = now;
                    trail.deposits += 1;
                    if trail.flower.is_none() {
                        trail.flower = flower;
                    }
                    if detail.is_some() {
                        trail.detail = detail;
                    }
                    debug!(
                        "Reinforced {} trail with {} to {:.3} after {} deposits",
                        trail.kind, kind, trail.intensity, trail.deposits
                    );
                }
                id
            }
            None => {
                let trail = Trail {
                    id: TrailId::new(),
                    position,
                    kind: kind.to_string(),
                    intensity,
                    flower,
                    detail,
                    deposits: 1,
                    created_at: now,
                    refreshed_at: now,
                    decayed_at: now,
                };
                let id = trail.id;
                let cell = self.cell_of(&position);
                self.grid.entry(cell).or_default().insert(id);
                self.trails.insert(id, trail);
                id
            }
        };

        &self.trails[&id]
    }

    /// The `limit` most intense trails within `radius` of `position`,
    /// strongest first.
    pub fn strongest_from(&self, position: &Position, limit: usize, radius: f64) -> Vec<&Trail> {
        let mut found = self.within(position, radius);
        found.sort_by(|a, b| {
            b.intensity
                .total_cmp(&a.intensity)
                .then_with(|| a.id.cmp(&b.id))
        });
        found.truncate(limit);
        found
    }

    /// Summed intensity per trail type whose name contains `context`
    /// (every type for [`ALL_CONTEXTS`]), strongest first.
    pub fn patterns_for(&self, context: &str) -> Vec<Pattern> {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for trail in self.trails.values() {
            if context == ALL_CONTEXTS || trail.kind.contains(context) {
                *sums.entry(trail.kind.as_str()).or_insert(0.0) += trail.intensity;
            }
        }
        let mut patterns: Vec<Pattern> = sums
            .into_iter()
            .map(|(kind, intensity)| Pattern {
                kind: kind.to_string(),
                intensity,
            })
            .collect();
        patterns.sort_by(|a, b| {
            b.intensity
                .total_cmp(&a.intensity)
                .then_with(|| a.kind.cmp(&b.kind))
        });
        patterns
    }

    /// Summed intensity of trails whose type is exactly `kind`.
    pub fn intensity_of(&self, kind: &str) -> f64 {
        self.trails
            .values()
            .filter(|t| t.kind == kind)
            .map(|t| t.intensity)
            .sum()
    }

    /// Decay every trail up to `now` and drop the ones that evaporated.
    /// Returns how many were removed.
    ///
    /// Elapsed time is counted from the later of the last refresh and the
    /// last decay pass, so calling this twice never decays the same
    /// interval twice. A clock that runs backwards decays nothing.
    pub fn evolve(&mut self, now: DateTime<Utc>) -> usize {
        let mut skewed = 0usize;
        for trail in self.trails.values_mut() {
            let anchor = trail.decayed_at.max(trail.refreshed_at);
            if now < anchor {
                skewed += 1;
                continue;
            }
            let dt = elapsed_secs(anchor, now);
            trail.intensity = (trail.intensity * self.decay_rate.powf(dt)).clamp(0.0, 1.0);
            trail.decayed_at = now;
        }
        if skewed > 0 {
            warn!("Clock skew: {} trails are ahead of now, decay clamped to zero", skewed);
        }

        let threshold = self.removal_threshold;
        let dead: Vec<(TrailId, Position)> = self
            .trails
            .values()
            .filter(|t| t.intensity < threshold)
            .map(|t| (t.id, t.position))
            .collect();
        for (id, position) in &dead {
            self.trails.remove(id);
            let cell = self.cell_of(position);
            if let Some(bucket) = self.grid.get_mut(&cell) {
                bucket.remove(id);
                if bucket.is_empty() {
                    self.grid.remove(&cell);
                }
            }
        }
        if !dead.is_empty() {
            debug!("Evaporated {} trails, {} remain", dead.len(), self.trails.len());
        }
        dead.len()
    }

    /// Greedy trail following from `from` toward `to`.
    ///
    /// Each step looks at the three strongest trails within `search_radius`
    /// and moves to whichever is closest to the goal. Stops after
    /// `max_steps`, on arrival within `arrival_radius`, or when no candidate
    /// gets closer. The returned waypoints exclude the start.
    pub fn find_path(
        &self,
        from: Position,
        to: Position,
        max_steps: usize,
        search_radius: f64,
        arrival_radius: f64,
    ) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = from;
        for _ in 0..max_steps {
            let remaining = current.distance_to(&to);
            if remaining <= arrival_radius {
                break;
            }
            let next = self
                .strongest_from(&current, 3, search_radius)
                .into_iter()
                .map(|t| t.position)
                .min_by(|a, b| a.distance_to(&to).total_cmp(&b.distance_to(&to)));
            match next {
                Some(step) if step.distance_to(&to) < remaining => {
                    current = step;
                    path.push(step);
                }
                _ => break,
            }
        }
        path
    }
}
