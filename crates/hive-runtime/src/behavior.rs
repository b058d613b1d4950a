//! Role behaviors — what each bee does when asked to act.
//!
//! Every action costs energy. Bees below the rest threshold do nothing
//! until a nurse tops them up. After acting, the bee checks whether its
//! role is over-represented and, if so, moves to the role the hive is
//! shortest of. Only the acting bee shifts, one at a time, so the hive
//! drifts toward its target mix instead of oscillating around it.
//!
//! | Role | Senses | Leaves |
//! |------|--------|--------|
//! | Scout | discovery quality | `high_quality_flower` above 0.7 |
//! | Worker | nearby trails, work value | `work_completed` |
//! | Nurse | exhausted neighbors | `healing_zone` after healing |
//! | Guard | threat level | `threat_detected` above 0.7 |
//! | Queen | — | a broadcast |

use crate::coordinator::SwarmCoordinator;
use chrono::{DateTime, Utc};
use hive_core::action::{BeeAction, GuardAction, ScoutAction, WorkerAction};
use hive_core::event::SwarmEvent;
use hive_core::types::{BeeId, FlowerId, Role};
use tracing::debug;

pub const DISCOVERY_TRAIL: &str = "high_quality_flower";
pub const WORK_TRAIL: &str = "work_completed";
pub const HEALING_TRAIL: &str = "healing_zone";
pub const THREAT_TRAIL: &str = "threat_detected";

/// Discoveries and threats must exceed this to leave a trail.
pub const NOTABLE_LEVEL: f64 = 0.7;
/// Nurses heal neighbors below this energy.
pub const EXHAUSTED_ENERGY: f64 = 0.3;
pub const HEAL_AMOUNT: f64 = 0.2;
pub const HEALING_TRAIL_INTENSITY: f64 = 0.5;
pub const PHEROMONE_PER_DISCOVERY: f64 = 0.1;
/// How many trails an unassigned worker considers.
const WORKER_TRAIL_CHOICES: usize = 3;

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl SwarmCoordinator {
    /// Have bee `id` act.
    ///
    /// Unknown bees and bees too tired to work are ignored. The payload is
    /// used when it matches the bee's current role; otherwise the bee acts
    /// on generated stimulus.
    pub fn agent_act(&mut self, id: BeeId, action: BeeAction) {
        let now = self.clock.now();
        let rest = self.config.rest_threshold;
        let cost = self.config.energy_cost;

        let role = match self.bees.get_mut(&id) {
            Some(bee) if bee.energy > 0.0 && bee.energy >= rest => {
                bee.last_active = now;
                bee.energy = (bee.energy - cost).max(0.0);
                bee.role
            }
            Some(bee) => {
                debug!("{} is resting at energy {:.2}", id, bee.energy);
                return;
            }
            None => return,
        };

        let action = if action.role() == role {
            action
        } else {
            BeeAction::generated(role)
        };

        match action {
            BeeAction::Scout(scout) => self.scout(id, scout, now),
            BeeAction::Worker(work) => self.work(id, work, now),
            BeeAction::Nurse => self.nurse(id, now),
            BeeAction::Guard(guard) => self.guard(id, guard, now),
            BeeAction::Queen => {
                self.broadcast_tick();
            }
        }

        self.shift_role(id);
    }

    fn scout(&mut self, id: BeeId, action: ScoutAction, now: DateTime<Utc>) {
        let Some(bee) = self.bees.get(&id) else {
            return;
        };
        let discovery = match action.discovery {
            Some(d) => d,
            None => {
                let flowers = self.flowers.ids();
                self.stimulus.discover(bee, &flowers)
            }
        };
        let quality = unit(discovery.quality);
        if quality <= NOTABLE_LEVEL {
            return;
        }

        let position = bee.position;
        self.field
            .deposit(position, DISCOVERY_TRAIL, quality, discovery.flower, None, now);
        if let Some(bee) = self.bees.get_mut(&id) {
            bee.pheromone_load = (bee.pheromone_load + PHEROMONE_PER_DISCOVERY).min(1.0);
        }
        debug!("{} found quality {:.2}", id, quality);
        self.notifier.emit(SwarmEvent::Discovery {
            scout: id,
            quality,
            work_source_id: discovery.flower,
        });
    }

    fn work(&mut self, id: BeeId, action: WorkerAction, now: DateTime<Utc>) {
        let Some(bee) = self.bees.get(&id) else {
            return;
        };
        let position = bee.position;

        let assigned = bee.flower.and_then(|f| self.flowers.get(&f));
        let Some(flower) = assigned else {
            self.adopt_flower(id);
            return;
        };

        let flower_id = flower.id;
        let value = match action.value {
            Some(v) => v,
            None => self.stimulus.work_value(bee, flower),
        };
        self.field
            .deposit(position, WORK_TRAIL, unit(value), Some(flower_id), None, now);
        if let Some(bee) = self.bees.get_mut(&id) {
            bee.pheromone_load = 0.0;
        }
    }

    /// Follow the strongest nearby trails to a flower that still exists.
    /// The worker stays unassigned if none leads anywhere.
    fn adopt_flower(&mut self, id: BeeId) {
        let Some(bee) = self.bees.get(&id) else {
            return;
        };
        let found: Option<FlowerId> = self
            .field
            .strongest_from(&bee.position, WORKER_TRAIL_CHOICES, self.config.trail_query_radius)
            .into_iter()
            .filter_map(|t| t.flower)
            .find(|f| self.flowers.contains(f));

        if let Some(flower) = found {
            self.flowers.assign(&flower);
            if let Some(bee) = self.bees.get_mut(&id) {
                bee.flower = Some(flower);
            }
            debug!("{} follows the trail to {}", id, flower);
        }
    }

    fn nurse(&mut self, id: BeeId, now: DateTime<Utc>) {
        let Some(nurse) = self.bees.get(&id) else {
            return;
        };
        let position = nurse.position;
        let patients: Vec<BeeId> = self
            .bees
            .within(&position, 2.0 * self.config.proximity_radius, Some(id))
            .into_iter()
            .filter(|b| b.energy < EXHAUSTED_ENERGY)
            .map(|b| b.id)
            .collect();

        for target in &patients {
            if let Some(bee) = self.bees.get_mut(target) {
                bee.energy = (bee.energy + HEAL_AMOUNT).min(1.0);
            }
            self.notifier.emit(SwarmEvent::Healing {
                nurse: id,
                target: *target,
            });
        }
        if !patients.is_empty() {
            debug!("{} healed {} bees", id, patients.len());
            self.field
                .deposit(position, HEALING_TRAIL, HEALING_TRAIL_INTENSITY, None, None, now);
        }
    }

    fn guard(&mut self, id: BeeId, action: GuardAction, now: DateTime<Utc>) {
        let Some(bee) = self.bees.get(&id) else {
            return;
        };
        let position = bee.position;
        let mut threat = match action.threat {
            Some(t) => t,
            None => self.stimulus.detect(bee),
        };
        threat.level = unit(threat.level);
        if threat.level <= NOTABLE_LEVEL {
            return;
        }

        self.field.deposit(
            position,
            THREAT_TRAIL,
            threat.level,
            None,
            Some(threat.kind.clone()),
            now,
        );
        let reinforcements = self
            .bees
            .within(&position, self.config.proximity_radius, Some(id))
            .into_iter()
            .filter(|b| b.role == Role::Guard)
            .count();
        debug!(
            "{} sensed {} at {:.2}, {} guards nearby",
            id, threat.kind, threat.level, reinforcements
        );
        self.notifier.emit(SwarmEvent::Threat {
            guard: id,
            threat,
            reinforcements,
        });
    }

    /// Move bee `id` out of an over-represented role into the role with the
    /// largest deficit.
    fn shift_role(&mut self, id: BeeId) {
        let Some(from) = self.bees.get(&id).map(|b| b.role) else {
            return;
        };
        let census = *self.bees.census();
        let Some(to) = census.rebalance_target(from) else {
            return;
        };
        self.bees.set_role(&id, to);
        let reason = format!(
            "{} at {:.0}% of hive (target {:.0}%), {} short by {:.0}%",
            from,
            census.ratio(from) * 100.0,
            from.target_ratio() * 100.0,
            to,
            census.deficit(to) * 100.0
        );
        debug!("{} shifts {} -> {}: {}", id, from, to, reason);
        self.notifier.emit(SwarmEvent::RoleShift {
            agent: id,
            from,
            to,
            reason,
        });
    }
}
