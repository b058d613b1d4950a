//! Run a hive on simulated time and report what it decided.

use anyhow::Result;
use hive::prelude::*;
use serde_json::json;
use std::sync::Arc;

use super::run::{plant_flowers, step, swarm_config};
use crate::config::Config;

pub fn run(context: &str, ticks: Option<u64>, seed: Option<u64>) -> Result<()> {
    let config = Config::load()?;
    let swarm = swarm_config(&config, seed)?;
    let ticks = ticks.unwrap_or(config.run.ticks);

    let clock = Arc::new(ManualClock::default());
    let mut hive = SwarmCoordinator::with_clock(swarm, clock.clone());
    plant_flowers(&mut hive, config.run.flowers, seed);
    for _ in 0..ticks {
        step(&mut hive, &clock);
    }

    let decision = hive.emergent_decision(context);
    let report = json!({
        "context": context,
        "decision": decision.decision,
        "confidence": decision.confidence,
        "patterns": hive.field().patterns_for(context),
        "state": hive.state(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
