//! Run a simulated hive.

use anyhow::{Context, Result};
use colored::Colorize;
use hive::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;
use tracing::warn;

use crate::config::Config;

pub struct RunOptions {
    pub ticks: Option<u64>,
    pub flowers: Option<usize>,
    pub seed: Option<u64>,
    pub realtime: bool,
    pub events: bool,
}

/// Swarm settings from hive.toml with the command-line seed applied.
pub fn swarm_config(config: &Config, seed: Option<u64>) -> Result<SwarmConfig> {
    let mut swarm = config.swarm.clone();
    if seed.is_some() {
        swarm.seed = seed;
    }
    swarm.validate().context("Invalid swarm configuration")?;
    Ok(swarm)
}

/// Plant `count` flowers with randomly present signals.
pub fn plant_flowers(hive: &mut SwarmCoordinator, count: usize, seed: Option<u64>) -> Vec<Flower> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_mul(31).wrapping_add(7)),
        None => StdRng::from_entropy(),
    };
    (0..count)
        .map(|i| {
            let mut flower = FlowerSeed::new(rng.gen_range(0.0..=1.0))
                .with_metadata("name", format!("flower-{}", i + 1));
            if rng.gen_bool(0.6) {
                flower = flower.with_biometrics(json!({ "heartRate": rng.gen_range(55..95) }));
            }
            if rng.gen_bool(0.6) {
                flower = flower.with_activity(json!({ "steps": rng.gen_range(0..12_000) }));
            }
            hive.spawn_flower(flower)
        })
        .collect()
}

/// Advance a hive on simulated time: sample, act, step the clock, tick.
pub fn step(hive: &mut SwarmCoordinator, clock: &ManualClock) -> SwarmState {
    hive.act_sample();
    clock.advance_secs(hive.config().tick_interval_ms as f64 / 1000.0);
    hive.tick()
}

fn print_event_lines(rx: &mut Receiver<SwarmEvent>) -> Result<()> {
    loop {
        match rx.try_recv() {
            Ok(event) => println!("{}", serde_json::to_string(&event)?),
            Err(TryRecvError::Lagged(n)) => warn!("Event stream lagged, skipped {} events", n),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}

pub fn run(opts: RunOptions, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let swarm = swarm_config(&config, opts.seed)?;
    let ticks = opts.ticks.unwrap_or(config.run.ticks);
    let flowers = opts.flowers.unwrap_or(config.run.flowers);

    let hive = if opts.realtime {
        run_realtime(swarm, ticks, flowers, opts.seed, opts.events)?
    } else {
        run_simulated(swarm, ticks, flowers, opts.seed, opts.events, verbose)?
    };

    let decision = hive.emergent_decision(&config.run.context);
    if opts.events {
        println!(
            "{}",
            json!({ "event": "summary", "state": hive.state(), "decision": decision })
        );
    } else {
        print_summary(&hive, &config.run.context, &decision);
    }
    Ok(())
}

fn run_simulated(
    swarm: SwarmConfig,
    ticks: u64,
    flowers: usize,
    seed: Option<u64>,
    events: bool,
    verbose: bool,
) -> Result<SwarmCoordinator> {
    let clock = Arc::new(ManualClock::default());
    let mut hive = SwarmCoordinator::with_clock(swarm, clock.clone());
    let mut rx = hive.subscribe();

    plant_flowers(&mut hive, flowers, seed);
    if events {
        print_event_lines(&mut rx)?;
        for _ in 0..ticks {
            step(&mut hive, &clock);
            print_event_lines(&mut rx)?;
        }
        return Ok(hive);
    }

    println!(
        "{} Planted {} flowers, {} bees",
        "→".blue(),
        flowers.to_string().cyan(),
        hive.bees().len().to_string().cyan()
    );
    println!("{} Running {} ticks...", "→".blue(), ticks.to_string().cyan());

    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );
    for _ in 0..ticks {
        let state = step(&mut hive, &clock);
        if verbose {
            pb.println(format!(
                "  tick {}: {} (coherence {:.2}, {} trails)",
                hive.ticks(),
                state.mood,
                state.coherence,
                state.trail_count
            ));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(hive)
}

fn run_realtime(
    swarm: SwarmConfig,
    ticks: u64,
    flowers: usize,
    seed: Option<u64>,
    events: bool,
) -> Result<SwarmCoordinator> {
    let period = swarm.tick_interval();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    runtime.block_on(async move {
        let mut hive = SwarmCoordinator::new(swarm);
        let mut rx = hive.subscribe();
        plant_flowers(&mut hive, flowers, seed);

        if !events {
            println!(
                "{} Hive awake for ~{} ticks of {:?}",
                "→".blue(),
                ticks.to_string().cyan(),
                period
            );
        }
        let mut runtime = SwarmRuntime::new(hive);
        runtime.awaken();

        let deadline = tokio::time::sleep(period * ticks.min(u32::MAX as u64) as u32);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                received = rx.recv(), if events => match received {
                    Ok(event) => println!("{}", serde_json::to_string(&event)?),
                    Err(RecvError::Lagged(n)) => warn!("Event stream lagged, skipped {} events", n),
                    Err(RecvError::Closed) => break,
                },
            }
        }
        runtime.sleep().await;
        if events {
            print_event_lines(&mut rx)?;
        }

        let shared = runtime.swarm();
        drop(runtime);
        let hive = Arc::try_unwrap(shared)
            .map_err(|_| anyhow::anyhow!("Hive still in use after sleep"))?
            .into_inner();
        Ok::<_, anyhow::Error>(hive)
    })
}

fn print_summary(hive: &SwarmCoordinator, context: &str, decision: &Decision) {
    let state = hive.state();
    let census = hive.bees().census();

    println!();
    println!("{}", "Hive State".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  Ticks:      {}", hive.ticks().to_string().cyan());
    println!("  Mood:       {}", state.mood.to_string().green());
    println!("  Coherence:  {:.3}", state.coherence);
    println!("  Bees:       {}", state.bee_count.to_string().cyan());
    println!("  Flowers:    {}", state.flower_count.to_string().cyan());
    println!("  Trails:     {}", state.trail_count.to_string().cyan());
    println!();

    println!("{}", "Roles".blue().bold());
    for role in Role::CASTES {
        println!(
            "  {:<8} {:>5}  ({:.0}% of hive, target {:.0}%)",
            role.as_str(),
            census.count(role),
            census.ratio(role) * 100.0,
            role.target_ratio() * 100.0
        );
    }
    if census.queens > 0 {
        println!("  {:<8} {:>5}", "queen", census.queens);
    }
    println!();

    println!("{}", "Strongest Patterns".blue().bold());
    let patterns = hive.field().patterns_for("all");
    if patterns.is_empty() {
        println!("  {}", "(no trails)".dimmed());
    }
    for pattern in patterns.iter().take(5) {
        println!("  {:<20} {:.3}", pattern.kind, pattern.intensity);
    }
    println!();

    if let Some(pulse) = hive.last_pulse() {
        println!("{} \"{}\"", "Queen:".yellow().bold(), pulse.signal);
    }
    println!(
        "{} {} (confidence {:.2}, context \"{}\")",
        "Decision:".green().bold(),
        decision.decision.cyan(),
        decision.confidence,
        context
    );
}
