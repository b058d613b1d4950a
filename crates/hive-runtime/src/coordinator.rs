//! Swarm coordinator — owns the hive and drives its tick loop.
//!
//! The coordinator is an explicitly constructed value: no globals. It holds
//! the pheromone field, both registries, the queen, the notification
//! channel, and the collaborators (clock and stimulus) it was built with.
//!
//! Each `tick()` runs three phases:
//! 1. **Evolve** the pheromone field (decay and evaporation)
//! 2. **Broadcast** a queen pulse if the interval has elapsed
//! 3. **Report** the recomputed aggregate state as a `stateUpdate` event
//!
//! Bee actions happen between ticks, through [`SwarmCoordinator::agent_act`]
//! or the activity sampler.

use crate::behavior::THREAT_TRAIL;
use crate::config::SwarmConfig;
use crate::field::PheromoneField;
use crate::flowers::{population_plan, FlowerRegistry};
use crate::notify::Notifier;
use crate::queen::Broadcaster;
use crate::registry::BeeRegistry;
use crate::sampler::ActivitySampler;
use crate::stimulus::RandomStimulus;
use chrono::{DateTime, Utc};
use hive_core::action::BeeAction;
use hive_core::clock::{Clock, SystemClock};
use hive_core::error::Result;
use hive_core::event::SwarmEvent;
use hive_core::stimulus::Stimulus;
use hive_core::types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Guards the queen summons when the swarm is under threat.
pub const THREAT_REINFORCEMENTS: usize = 3;

/// Serializable view of the whole hive, for dashboards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmSnapshot {
    pub state: SwarmState,
    pub bees: Vec<Bee>,
    pub flowers: Vec<Flower>,
    pub trails: Vec<Trail>,
    pub ticks: u64,
}

/// The hive.
pub struct SwarmCoordinator {
    pub(crate) config: SwarmConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) stimulus: Box<dyn Stimulus>,
    pub(crate) rng: StdRng,
    pub(crate) field: PheromoneField,
    pub(crate) flowers: FlowerRegistry,
    pub(crate) bees: BeeRegistry,
    pub(crate) queen: Broadcaster,
    pub(crate) sampler: ActivitySampler,
    pub(crate) notifier: Notifier,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_pulse: Option<Arc<QueenPulse>>,
    pub(crate) ticks: u64,
}

impl SwarmCoordinator {
    /// A hive on the system clock with the random stand-in stimulus.
    pub fn new(config: SwarmConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`SwarmCoordinator::new`], but rejects a config that fails
    /// [`SwarmConfig::validate`].
    pub fn try_new(config: SwarmConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_clock(config: SwarmConfig, clock: Arc<dyn Clock>) -> Self {
        if let Err(e) = config.validate() {
            warn!("Starting hive with an invalid config: {}", e);
        }
        let stimulus: Box<dyn Stimulus> = match config.seed {
            Some(seed) => Box::new(RandomStimulus::seeded(seed.wrapping_add(1))),
            None => Box::new(RandomStimulus::new()),
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let created_at = clock.now();
        Self {
            field: PheromoneField::new(&config),
            flowers: FlowerRegistry::new(),
            bees: BeeRegistry::new(),
            queen: Broadcaster::new(),
            sampler: ActivitySampler::new(config.sample_fraction),
            notifier: Notifier::new(config.event_capacity),
            config,
            clock,
            stimulus,
            rng,
            created_at,
            last_pulse: None,
            ticks: 0,
        }
    }

    /// Replace the stimulus collaborator.
    pub fn with_stimulus(mut self, stimulus: impl Stimulus + 'static) -> Self {
        self.stimulus = Box::new(stimulus);
        self
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn flowers(&self) -> &FlowerRegistry {
        &self.flowers
    }

    pub fn bees(&self) -> &BeeRegistry {
        &self.bees
    }

    pub fn bee(&self, id: &BeeId) -> Option<&Bee> {
        self.bees.get(id)
    }

    pub fn flower(&self, id: &FlowerId) -> Option<&Flower> {
        self.flowers.get(id)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_pulse(&self) -> Option<&QueenPulse> {
        self.last_pulse.as_deref()
    }

    pub(crate) fn random_position(&mut self) -> Position {
        let side = self.config.world_size;
        if !side.is_finite() || side <= 0.0 {
            return Position::origin();
        }
        Position::new(
            self.rng.gen_range(0.0..side),
            self.rng.gen_range(0.0..side),
            self.rng.gen_range(0.0..side),
        )
    }

    fn next_uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }

    // --- Spawning ---

    /// Register a flower and recruit its founding population.
    pub fn spawn_flower(&mut self, seed: FlowerSeed) -> Flower {
        let now = self.clock.now();
        let position = match seed.position {
            Some(p) => p,
            None => self.random_position(),
        };
        let id = FlowerId(self.next_uuid());
        let mut flower = self.flowers.register(id, seed, position, now).clone();
        info!("Flower {} spawned with quality {:.2}", id, flower.quality);
        self.notifier.emit(SwarmEvent::FlowerSpawned {
            id,
            quality: flower.quality,
        });

        for (role, count) in population_plan(flower.quality) {
            for _ in 0..count {
                self.spawn_bee(role, Some(id));
            }
        }

        if let Some(recruited) = self.flowers.get(&id) {
            flower.bee_count = recruited.bee_count;
        }
        flower
    }

    /// Add one bee, evicting the weakest first if the hive is full.
    ///
    /// A `target` naming a live flower assigns the bee to it.
    pub fn spawn_bee(&mut self, role: Role, target: Option<FlowerId>) -> Bee {
        let position = self.random_position();
        self.spawn_bee_at(role, target, position)
    }

    /// Like [`SwarmCoordinator::spawn_bee`], at a chosen position.
    pub fn spawn_bee_at(&mut self, role: Role, target: Option<FlowerId>, position: Position) -> Bee {
        if self.bees.len() >= self.config.max_bees {
            self.evict_weakest();
        }

        let now = self.clock.now();
        let id = BeeId(self.next_uuid());
        let mut bee = Bee::new(role, position, now).with_id(id);
        if let Some(flower) = target {
            if self.flowers.assign(&flower) {
                bee.flower = Some(flower);
            } else {
                debug!("Spawn target {} does not exist, {} starts unassigned", flower, id);
            }
        }

        debug!("Spawned {} as {}", id, role);
        self.bees.insert(bee.clone());
        self.notifier.emit(SwarmEvent::BeeSpawned { id, role, target });
        bee
    }

    fn evict_weakest(&mut self) {
        let Some(id) = self.bees.weakest() else {
            return;
        };
        if let Some(bee) = self.bees.remove(&id) {
            if let Some(flower) = bee.flower {
                self.flowers.release(&flower);
            }
            debug!("Evicted {} ({}, energy {:.2}) to make room", bee.id, bee.role, bee.energy);
            self.notifier.emit(SwarmEvent::BeeEvicted {
                id: bee.id,
                role: bee.role,
                energy: bee.energy,
            });
        }
    }

    // --- Queries ---

    /// Bees within `radius` (default: the proximity radius) of bee `id`.
    pub fn nearby_bees(&self, id: &BeeId, radius: Option<f64>) -> Vec<&Bee> {
        self.bees
            .nearby(id, radius.unwrap_or(self.config.proximity_radius))
    }

    /// The strongest trails around `location`.
    pub fn trails_from(&self, location: &Position, limit: Option<usize>) -> Vec<&Trail> {
        self.field.strongest_from(
            location,
            limit.unwrap_or(self.config.trail_limit),
            self.config.trail_query_radius,
        )
    }

    /// Greedy trail-following path from `from` toward `to`.
    pub fn find_path(&self, from: Position, to: Position, max_steps: usize) -> Vec<Position> {
        self.field.find_path(
            from,
            to,
            max_steps,
            self.config.path_search_radius,
            self.config.path_arrival_radius,
        )
    }

    /// What the swarm collectively leans toward in `context`.
    ///
    /// Confidence is the strongest matching pattern's intensity scaled by
    /// the share of bees assigned to a live flower, capped at 1.
    pub fn emergent_decision(&self, context: &str) -> Decision {
        let patterns = self.field.patterns_for(context);
        let total = self.bees.len();
        let Some(pattern) = patterns.first() else {
            return Decision::wait();
        };
        if total == 0 {
            return Decision::wait();
        }

        let engaged = self
            .bees
            .iter()
            .filter(|b| b.flower.map_or(false, |f| self.flowers.contains(&f)))
            .count();
        let confidence = (pattern.intensity * engaged as f64 / total as f64).clamp(0.0, 1.0);
        if confidence < self.config.consensus_threshold {
            Decision::explore(confidence)
        } else {
            Decision {
                decision: pattern.kind.clone(),
                confidence,
            }
        }
    }

    /// Aggregate state as of now.
    pub fn state(&self) -> SwarmState {
        self.state_at(self.clock.now())
    }

    fn state_at(&self, now: DateTime<Utc>) -> SwarmState {
        let census = self.bees.census();
        let alarm = self.field.intensity_of(THREAT_TRAIL) >= self.config.threat_alarm_intensity;
        SwarmState {
            timestamp: now,
            bee_count: self.bees.len(),
            flower_count: self.flowers.len(),
            trail_count: self.field.len(),
            mood: census.mood(alarm),
            coherence: census.coherence(),
            last_broadcast: self.last_pulse.as_ref().map(|p| p.sent_at),
        }
    }

    pub fn snapshot(&self) -> SwarmSnapshot {
        SwarmSnapshot {
            state: self.state(),
            bees: self.bees.iter().cloned().collect(),
            flowers: self.flowers.iter().cloned().collect(),
            trails: self.field.iter().cloned().collect(),
            ticks: self.ticks,
        }
    }

    // --- Events ---

    pub fn subscribe(&self) -> broadcast::Receiver<SwarmEvent> {
        self.notifier.subscribe()
    }

    /// The most recent events, oldest first.
    pub fn recent_events(&self) -> impl Iterator<Item = &SwarmEvent> {
        self.notifier.recent()
    }

    // --- Loop ---

    /// Advance the hive by one tick. Returns the state reported to observers.
    pub fn tick(&mut self) -> SwarmState {
        let now = self.clock.now();
        self.field.evolve(now);

        let since = self
            .last_pulse
            .as_ref()
            .map_or(self.created_at, |p| p.sent_at);
        if now - since >= self.config.broadcast_interval() {
            self.broadcast_tick();
        }

        self.ticks += 1;
        let state = self.state_at(now);
        self.notifier.emit(SwarmEvent::StateUpdate(state.clone()));
        state
    }

    /// Send a queen pulse to every bee now, regardless of the interval.
    ///
    /// Under threat the queen also summons extra guards.
    pub fn broadcast_tick(&mut self) -> Arc<QueenPulse> {
        let now = self.clock.now();
        let state = self.state_at(now);
        let pulse = Arc::new(self.queen.compose(&state, &mut self.rng, now));
        for bee in self.bees.iter_mut() {
            bee.last_pulse = Some(Arc::clone(&pulse));
        }
        self.last_pulse = Some(Arc::clone(&pulse));

        info!(
            "Queen pulse: {} (coherence {:.2}, {} bees) \"{}\"",
            pulse.mood, pulse.coherence, pulse.bee_count, pulse.signal
        );
        self.notifier.emit(SwarmEvent::QueenPulse {
            mood: pulse.mood,
            coherence: pulse.coherence,
            bee_count: pulse.bee_count,
            flower_count: pulse.flower_count,
            signal: pulse.signal.clone(),
        });

        if pulse.mood == Mood::Threat {
            for _ in 0..THREAT_REINFORCEMENTS {
                self.spawn_bee(Role::Guard, None);
            }
        }
        pulse
    }

    /// Act a sampled fraction of the population with generated stimulus.
    /// Returns how many bees were asked to act.
    pub fn act_sample(&mut self) -> usize {
        let ids = self.bees.ids();
        let chosen = self.sampler.select(&ids, &mut self.rng);
        for id in &chosen {
            if let Some(role) = self.bees.get(id).map(|b| b.role) {
                self.agent_act(*id, BeeAction::generated(role));
            }
        }
        chosen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::clock::ManualClock;

    fn hive() -> (SwarmCoordinator, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let config = SwarmConfig::default().with_seed(42);
        (SwarmCoordinator::with_clock(config, clock.clone()), clock)
    }

    fn rich_seed() -> FlowerSeed {
        FlowerSeed::new(1.0).with_biometrics(1).with_activity(1)
    }

    #[test]
    fn rich_flower_spawns_ten_assigned_bees() {
        let (mut h, _) = hive();
        let flower = h.spawn_flower(rich_seed());
        assert_eq!(flower.quality, 1.0);
        assert_eq!(flower.bee_count, 10);
        let census = h.bees().census();
        assert_eq!(
            (census.scouts, census.workers, census.nurses, census.guards),
            (1, 6, 2, 1)
        );
        assert!(h.bees().iter().all(|b| b.flower == Some(flower.id)));
    }

    #[test]
    fn spawned_flower_reports_its_recruits_after_evictions() {
        let clock = Arc::new(ManualClock::default());
        let config = SwarmConfig::default().with_seed(11).with_max_bees(4);
        let mut h = SwarmCoordinator::with_clock(config, clock);
        let flower = h.spawn_flower(rich_seed().with_metadata("name", "clover"));

        assert_eq!(h.bees().len(), 4);
        assert_eq!(flower.bee_count, 4);
        assert_eq!(flower.bee_count, h.flower(&flower.id).unwrap().bee_count);
        assert_eq!(flower.metadata["name"], "clover");
        assert!(flower.metadata.contains_key("biometrics"));
    }

    #[test]
    fn try_new_rejects_a_zero_tick_interval() {
        let config = SwarmConfig {
            tick_interval_ms: 0,
            ..SwarmConfig::default()
        };
        assert!(SwarmCoordinator::try_new(config).is_err());
        assert!(SwarmCoordinator::try_new(SwarmConfig::default()).is_ok());
    }

    #[test]
    fn full_hive_evicts_the_weakest_and_releases_its_flower() {
        let clock = Arc::new(ManualClock::default());
        let config = SwarmConfig::default().with_seed(1).with_max_bees(10);
        let mut h = SwarmCoordinator::with_clock(config, clock);
        let flower = h.spawn_flower(rich_seed());
        assert_eq!(h.bees().len(), 10);

        let victim = h.bees().ids()[3];
        h.bees.get_mut(&victim).unwrap().energy = 0.05;

        h.spawn_bee(Role::Scout, None);
        assert_eq!(h.bees().len(), 10);
        assert!(h.bee(&victim).is_none());
        assert_eq!(h.flower(&flower.id).unwrap().bee_count, 9);
        assert!(h
            .recent_events()
            .any(|e| matches!(e, SwarmEvent::BeeEvicted { id, .. } if *id == victim)));
    }

    #[test]
    fn spawn_with_unknown_target_stays_unassigned() {
        let (mut h, _) = hive();
        let bee = h.spawn_bee(Role::Worker, Some(FlowerId::new()));
        assert_eq!(bee.flower, None);
    }

    #[test]
    fn seeded_hives_place_bees_identically() {
        let (mut a, _) = hive();
        let (mut b, _) = hive();
        let pa = a.spawn_bee(Role::Scout, None);
        let pb = b.spawn_bee(Role::Scout, None);
        assert_eq!(pa.id, pb.id);
        assert_eq!(pa.position, pb.position);
    }

    #[test]
    fn broadcast_waits_for_its_interval() {
        let (mut h, clock) = hive();
        h.spawn_bee(Role::Worker, None);
        h.tick();
        assert!(h.last_pulse().is_none());

        clock.advance_secs(1.5);
        let state = h.tick();
        assert!(h.last_pulse().is_some());
        assert!(state.last_broadcast.is_some());
        assert!(h.bees().iter().all(|b| b.last_pulse.is_some()));

        let first = h.last_pulse().unwrap().sent_at;
        clock.advance_secs(1.0);
        h.tick();
        assert_eq!(h.last_pulse().unwrap().sent_at, first);
    }

    #[test]
    fn every_tick_reports_state() {
        let (mut h, _) = hive();
        let mut rx = h.subscribe();
        h.tick();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.name(), "stateUpdate");
        assert_eq!(h.ticks(), 1);
    }

    #[test]
    fn emergent_decision_needs_engaged_bees() {
        let (mut h, clock) = hive();
        assert_eq!(h.emergent_decision("work"), Decision::wait());

        let flower = h.spawn_flower(rich_seed());
        h.field
            .deposit(flower.position, "work_completed", 0.9, Some(flower.id), None, clock.now());

        // Every bee is assigned: confidence = 0.9 × 1.0.
        let decision = h.emergent_decision("work");
        assert_eq!(decision.decision, "work_completed");
        assert!((decision.confidence - 0.9).abs() < 1e-9);

        // Unassigned newcomers dilute the consensus below threshold.
        for _ in 0..10 {
            h.spawn_bee(Role::Scout, None);
        }
        let decision = h.emergent_decision("work");
        assert_eq!(decision.decision, Decision::EXPLORE);
        assert!((decision.confidence - 0.45).abs() < 1e-9);
    }

    #[test]
    fn threat_mood_summons_guards() {
        let (mut h, clock) = hive();
        h.spawn_bee(Role::Worker, None);
        let now = clock.now();
        h.field.deposit(Position::new(0.0, 0.0, 0.0), THREAT_TRAIL, 1.0, None, None, now);
        h.field.deposit(Position::new(500.0, 0.0, 0.0), THREAT_TRAIL, 1.0, None, None, now);
        assert_eq!(h.state().mood, Mood::Threat);

        let pulse = h.broadcast_tick();
        assert_eq!(pulse.mood, Mood::Threat);
        assert_eq!(h.bees().census().guards, THREAT_REINFORCEMENTS);
    }

    #[test]
    fn snapshot_serializes() {
        let (mut h, _) = hive();
        h.spawn_flower(FlowerSeed::new(0.5));
        let json = serde_json::to_value(h.snapshot()).unwrap();
        assert_eq!(json["state"]["flowerCount"], 1);
        assert_eq!(json["bees"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn sampler_acts_a_fraction_of_the_hive() {
        let (mut h, _) = hive();
        for _ in 0..25 {
            h.spawn_bee(Role::Worker, None);
        }
        assert_eq!(h.act_sample(), 3);
    }
}
