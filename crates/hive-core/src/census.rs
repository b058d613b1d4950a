//! Role census — population ratios, coherence and mood.
//!
//! The census counts bees per role and compares the caste mix against the
//! target ratios {scout 0.1, worker 0.6, nurse 0.2, guard 0.1, queen 0}.
//! Queens count toward the population and pull coherence down, but they are
//! never rebalanced.

use crate::types::{Mood, Role};
use serde::{Deserialize, Serialize};

/// Guard share above which the swarm is `guarding`.
pub const GUARDING_RATIO: f64 = 0.3;
/// Nurse share above which the swarm is `healing`.
pub const HEALING_RATIO: f64 = 0.3;
/// Scout share above which the swarm is `exploring`.
pub const EXPLORING_RATIO: f64 = 0.2;
/// Coherence above which the swarm is in `sync`.
pub const SYNC_COHERENCE: f64 = 0.8;

const EPSILON: f64 = 1e-9;

/// Head count per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCensus {
    pub scouts: usize,
    pub workers: usize,
    pub nurses: usize,
    pub guards: usize,
    pub queens: usize,
}

impl RoleCensus {
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut census = Self::default();
        for role in roles {
            census.add(role);
        }
        census
    }

    pub fn add(&mut self, role: Role) {
        *self.slot(role) += 1;
    }

    pub fn remove(&mut self, role: Role) {
        let slot = self.slot(role);
        *slot = slot.saturating_sub(1);
    }

    fn slot(&mut self, role: Role) -> &mut usize {
        match role {
            Role::Scout => &mut self.scouts,
            Role::Worker => &mut self.workers,
            Role::Nurse => &mut self.nurses,
            Role::Guard => &mut self.guards,
            Role::Queen => &mut self.queens,
        }
    }

    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::Scout => self.scouts,
            Role::Worker => self.workers,
            Role::Nurse => self.nurses,
            Role::Guard => self.guards,
            Role::Queen => self.queens,
        }
    }

    /// Every bee, queens included.
    pub fn total(&self) -> usize {
        self.caste_total() + self.queens
    }

    /// Bees that take part in the ratio targets.
    pub fn caste_total(&self) -> usize {
        self.scouts + self.workers + self.nurses + self.guards
    }

    /// Share of the whole population holding `role`. Zero for an empty swarm.
    pub fn ratio(&self, role: Role) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(role) as f64 / total as f64
    }

    /// `max(0, 1 - Σ|actual - target| / 2)` over every role.
    pub fn coherence(&self) -> f64 {
        let drift: f64 = Role::ALL
            .iter()
            .map(|r| (self.ratio(*r) - r.target_ratio()).abs())
            .sum();
        (1.0 - drift / 2.0).max(0.0)
    }

    /// Target minus actual share. Positive means the role is short.
    pub fn deficit(&self, role: Role) -> f64 {
        role.target_ratio() - self.ratio(role)
    }

    pub fn is_in_excess(&self, role: Role) -> bool {
        role.is_caste() && self.deficit(role) < -EPSILON
    }

    /// The role furthest below its target, if any role is short at all.
    /// Ties go to the earlier role in [`Role::CASTES`].
    pub fn largest_deficit(&self) -> Option<(Role, f64)> {
        let mut best: Option<(Role, f64)> = None;
        for role in Role::CASTES {
            let deficit = self.deficit(role);
            if deficit <= EPSILON {
                continue;
            }
            match best {
                Some((_, current)) if deficit <= current + EPSILON => {}
                _ => best = Some((role, deficit)),
            }
        }
        best
    }

    /// Where a bee currently holding `current` should move, if anywhere.
    ///
    /// Only bees in an over-represented role shift, and only toward the role
    /// with the largest deficit. Evaluated one bee at a time so the swarm
    /// never reassigns a whole cohort at once.
    pub fn rebalance_target(&self, current: Role) -> Option<Role> {
        if !self.is_in_excess(current) {
            return None;
        }
        match self.largest_deficit() {
            Some((role, _)) if role != current => Some(role),
            _ => None,
        }
    }

    /// Classify the swarm's mood.
    ///
    /// `threat_alarm` short-circuits to [`Mood::Threat`]; otherwise the
    /// priority order is guarding, healing, exploring, sync, foraging.
    pub fn mood(&self, threat_alarm: bool) -> Mood {
        if threat_alarm {
            return Mood::Threat;
        }
        if self.ratio(Role::Guard) > GUARDING_RATIO {
            Mood::Guarding
        } else if self.ratio(Role::Nurse) > HEALING_RATIO {
            Mood::Healing
        } else if self.ratio(Role::Scout) > EXPLORING_RATIO {
            Mood::Exploring
        } else if self.coherence() > SYNC_COHERENCE {
            Mood::Sync
        } else {
            Mood::Foraging
        }
    }
}
