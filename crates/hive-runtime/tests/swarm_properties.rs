//! Whole-hive properties: trail reinforcement and decay, range queries,
//! role convergence, and the reference scenarios.

use chrono::Utc;
use hive_runtime::behavior::{DISCOVERY_TRAIL, WORK_TRAIL};
use hive_runtime::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn manual_hive(config: SwarmConfig) -> (SwarmCoordinator, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let hive = SwarmCoordinator::with_clock(config, clock.clone()).with_stimulus(QuietStimulus);
    (hive, clock)
}

fn near_origin(x: f64) -> Position {
    Position::new(x, 0.0, 0.0)
}

/// One bee per caste target slot, all within a nurse's reach of the origin.
fn balanced_ten(hive: &mut SwarmCoordinator) -> Vec<Bee> {
    let mix = [
        (Role::Scout, 1),
        (Role::Worker, 6),
        (Role::Nurse, 2),
        (Role::Guard, 1),
    ];
    let mut bees = Vec::new();
    for (role, n) in mix {
        for i in 0..n {
            bees.push(hive.spawn_bee_at(role, None, near_origin(i as f64 * 5.0)));
        }
    }
    bees
}

// ---------------------------------------------------------------------------
// Pheromone field
// ---------------------------------------------------------------------------

#[test]
fn deposits_within_tolerance_reinforce_instead_of_replacing() {
    let mut field = PheromoneField::default();
    let now = Utc::now();
    let first = field
        .deposit(Position::origin(), "nectar", 0.3, None, None, now)
        .intensity;
    let second = field
        .deposit(near_origin(4.0), "nectar", 0.2, None, None, now)
        .intensity;

    assert_eq!(field.len(), 1);
    assert!(second > first);
    assert!((second - 0.5).abs() < 1e-12);

    for _ in 0..10 {
        field.deposit(near_origin(1.0), "nectar", 0.4, None, None, now);
    }
    assert_eq!(field.len(), 1);
    assert_eq!(field.iter().next().unwrap().intensity, 1.0);
    assert_eq!(field.iter().next().unwrap().deposits, 12);
}

#[test]
fn trails_fade_every_tick_until_they_evaporate() {
    let (mut hive, clock) = manual_hive(SwarmConfig::default().with_seed(1));
    let scout = hive.spawn_bee_at(Role::Scout, None, Position::origin()).id;
    hive.agent_act(scout, BeeAction::scout(Discovery::new(0.9, None)));
    assert_eq!(hive.field().len(), 1);

    let mut last = hive.field().iter().next().unwrap().intensity;
    let mut ticks = 0;
    while !hive.field().is_empty() {
        clock.advance_secs(1.0);
        hive.tick();
        ticks += 1;
        if let Some(trail) = hive.field().iter().next() {
            assert!(trail.intensity < last, "intensity rose at tick {}", ticks);
            assert!(trail.intensity >= 0.01);
            last = trail.intensity;
        }
        assert!(ticks < 500, "trail never evaporated");
    }
    // 0.9 × 0.95^n < 0.01 first holds at n = 88.
    assert_eq!(ticks, 88);
}

#[test]
fn strongest_from_is_exact_and_sorted() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut field = PheromoneField::default();
    let now = Utc::now();
    for i in 0..400 {
        let p = Position::new(
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
        );
        field.deposit(p, &format!("kind-{}", i % 7), rng.gen_range(0.05..1.0), None, None, now);
    }

    for _ in 0..50 {
        let center = Position::new(
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
        );
        let radius = rng.gen_range(10.0..250.0);
        let found = field.strongest_from(&center, usize::MAX, radius);

        assert!(found.iter().all(|t| t.position.distance_to(&center) <= radius));
        assert!(found.windows(2).all(|w| w[0].intensity >= w[1].intensity));

        let expected = field
            .iter()
            .filter(|t| t.position.distance_to(&center) <= radius)
            .count();
        assert_eq!(found.len(), expected);

        let top = field.strongest_from(&center, 3, radius);
        assert_eq!(top.len(), expected.min(3));
    }
}

// ---------------------------------------------------------------------------
// Flowers
// ---------------------------------------------------------------------------

#[test]
fn flower_quality_is_always_within_unit_range() {
    let (mut hive, _) = manual_hive(SwarmConfig::default().with_seed(2));
    let scores = [f64::NEG_INFINITY, -5.0, 0.0, 0.25, 1.0, 3.0, f64::INFINITY, f64::NAN];
    for score in scores {
        for (bio, act) in [(false, false), (true, false), (false, true), (true, true)] {
            let mut seed = FlowerSeed::new(score);
            if bio {
                seed = seed.with_biometrics(serde_json::json!({"hrv": 80}));
            }
            if act {
                seed = seed.with_activity(serde_json::json!([1, 2, 3]));
            }
            let flower = hive.spawn_flower(seed);
            assert!(
                (0.0..=1.0).contains(&flower.quality),
                "quality {} for score {}",
                flower.quality,
                score
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[test]
fn guard_heavy_hive_converges_toward_target_mix() {
    let (mut hive, clock) = manual_hive(SwarmConfig::default().with_seed(3));
    for _ in 0..90 {
        hive.spawn_bee(Role::Guard, None);
    }
    for _ in 0..10 {
        hive.spawn_bee(Role::Scout, None);
    }

    let start = hive.state().coherence;
    assert!((start - 0.2).abs() < 1e-9);

    let mut coherence = start;
    for _ in 0..5 {
        let guards: Vec<BeeId> = hive
            .bees()
            .iter()
            .filter(|b| b.role == Role::Guard)
            .map(|b| b.id)
            .collect();
        for id in guards {
            hive.agent_act(id, BeeAction::guard(ThreatReport::new(0.0, "none")));
            let next = hive.state().coherence;
            assert!(next >= coherence - 1e-9, "coherence fell from {} to {}", coherence, next);
            coherence = next;
        }
        clock.advance_secs(0.1);
        hive.tick();
    }

    assert!(coherence > start);
    assert!(coherence > 0.99);
    let census = hive.bees().census();
    assert_eq!(
        (census.scouts, census.workers, census.nurses, census.guards),
        (10, 60, 20, 10)
    );
    assert_eq!(hive.state().mood, Mood::Sync);
}

#[test]
fn queens_weigh_on_coherence_but_stay_queens() {
    let (mut hive, _) = manual_hive(SwarmConfig::default().with_seed(12));
    hive.spawn_flower(FlowerSeed::new(1.0).with_biometrics(1).with_activity(1));
    assert_eq!(hive.state().mood, Mood::Sync);

    let queens: Vec<BeeId> = (0..10).map(|_| hive.spawn_bee(Role::Queen, None).id).collect();
    let state = hive.state();
    // |0.05-0.1| + |0.3-0.6| + |0.1-0.2| + |0.05-0.1| + |0.5-0| = 1.0
    assert!((state.coherence - 0.5).abs() < 1e-9);
    assert_eq!(state.mood, Mood::Foraging);

    for id in &queens {
        hive.agent_act(*id, BeeAction::Queen);
    }
    assert!(queens.iter().all(|id| hive.bee(id).unwrap().role == Role::Queen));
}

#[test]
fn role_shift_events_describe_the_move() {
    let (mut hive, _) = manual_hive(SwarmConfig::default().with_seed(4));
    let mut events = hive.subscribe();
    let guard = hive.spawn_bee(Role::Guard, None).id;
    hive.spawn_bee(Role::Guard, None);

    hive.agent_act(guard, BeeAction::guard(ThreatReport::new(0.1, "none")));

    let shift = std::iter::from_fn(|| events.try_recv().ok())
        .find(|e| e.name() == "roleShift")
        .expect("a role shift");
    let json = serde_json::to_value(&shift).unwrap();
    assert_eq!(json["from"], "guard");
    assert_eq!(json["to"], "worker");
    assert!(json["reason"].as_str().unwrap().contains("guard"));
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_perfect_flower_recruits_ten_bees() {
    let (mut hive, _) = manual_hive(SwarmConfig::default().with_seed(5));
    let flower = hive.spawn_flower(
        FlowerSeed::new(1.0)
            .with_biometrics(1)
            .with_activity(1),
    );

    assert_eq!(flower.quality, 1.0);
    assert_eq!(hive.bees().len(), 10);
    let census = hive.bees().census();
    assert_eq!(census.scouts, 1);
    assert_eq!(census.workers, 6);
    assert_eq!(census.nurses, 2);
    assert_eq!(census.guards, 1);
    assert_eq!(hive.flower(&flower.id).unwrap().bee_count, 10);
}

#[test]
fn scenario_b_single_deposit_is_found() {
    let mut field = PheromoneField::default();
    let id = field
        .deposit(Position::origin(), "X", 0.9, None, None, Utc::now())
        .id;
    let found = field.strongest_from(&Position::origin(), 1, 50.0);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
    assert_eq!(found[0].intensity, 0.9);
}

#[test]
fn scenario_c_exhausted_bee_waits_for_a_nurse() {
    let config = SwarmConfig {
        energy_cost: 0.4,
        ..SwarmConfig::default().with_seed(6)
    };
    let (mut hive, clock) = manual_hive(config);
    let bees = balanced_ten(&mut hive);
    let worker = bees.iter().find(|b| b.role == Role::Worker).unwrap().id;
    let nurse = bees.iter().find(|b| b.role == Role::Nurse).unwrap().id;

    // 1.0 → 0.6 → 0.2
    hive.agent_act(worker, BeeAction::worker(0.5));
    clock.advance_secs(1.0);
    hive.agent_act(worker, BeeAction::worker(0.5));
    let tired = hive.bee(&worker).unwrap().clone();
    assert!((tired.energy - 0.2).abs() < 1e-9);

    for _ in 0..3 {
        clock.advance_secs(1.0);
        hive.agent_act(worker, BeeAction::worker(0.5));
        let now = hive.bee(&worker).unwrap();
        assert_eq!(now.energy, tired.energy);
        assert_eq!(now.last_active, tired.last_active);
        assert_eq!(now.role, tired.role);
    }

    hive.agent_act(nurse, BeeAction::nurse());
    assert!(hive.bee(&worker).unwrap().energy >= 0.3);

    clock.advance_secs(1.0);
    hive.agent_act(worker, BeeAction::worker(0.5));
    let rested = hive.bee(&worker).unwrap();
    assert!(rested.last_active > tired.last_active);
    assert!(rested.energy < 0.3);
}

#[test]
fn scenario_d_no_signal_means_wait() {
    let (hive, _) = manual_hive(SwarmConfig::default().with_seed(7));
    assert_eq!(hive.emergent_decision("ctx"), Decision::wait());

    let (mut hive, _) = manual_hive(SwarmConfig::default().with_seed(7));
    hive.spawn_flower(FlowerSeed::new(0.5));
    let decision = hive.emergent_decision("ctx");
    assert_eq!(decision.decision, "wait");
    assert_eq!(decision.confidence, 0.0);
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn foraging_hive_reaches_consensus_on_work() {
    let (mut hive, clock) = manual_hive(SwarmConfig::default().with_seed(8));
    let flower = hive.spawn_flower(FlowerSeed::new(1.0).at(Position::new(500.0, 500.0, 500.0)));
    let workers: Vec<BeeId> = hive
        .bees()
        .iter()
        .filter(|b| b.role == Role::Worker)
        .map(|b| b.id)
        .collect();
    for id in &workers {
        hive.agent_act(*id, BeeAction::worker(0.9));
    }
    clock.advance_secs(0.1);
    hive.tick();

    let patterns = hive.field().patterns_for(WORK_TRAIL);
    assert_eq!(patterns.len(), 1);
    let decision = hive.emergent_decision("work");
    assert_eq!(decision.decision, WORK_TRAIL);
    assert!(decision.confidence <= 1.0);
    assert!(hive.trails_from(&hive.flower(&flower.id).unwrap().position, None).len() <= 10);
}

#[test]
fn discovery_events_carry_the_flower() {
    let (mut hive, _) = manual_hive(SwarmConfig::default().with_seed(9));
    let mut events = hive.subscribe();
    let flower = hive.spawn_flower(FlowerSeed::new(0.2));
    let scout = hive.spawn_bee_at(Role::Scout, None, Position::origin()).id;

    hive.agent_act(scout, BeeAction::scout(Discovery::new(0.85, Some(flower.id))));

    let discovery = std::iter::from_fn(|| events.try_recv().ok())
        .find(|e| e.name() == "discovery")
        .expect("a discovery event");
    let json = serde_json::to_value(&discovery).unwrap();
    assert_eq!(json["event"], "discovery");
    assert_eq!(json["quality"], 0.85);
    assert_eq!(
        json["workSourceId"],
        serde_json::to_value(flower.id).unwrap()
    );

    let trail = hive.trails_from(&Position::origin(), Some(1))[0];
    assert_eq!(trail.kind, DISCOVERY_TRAIL);
}
