//! Async tick loop for a living hive.
//!
//! [`SwarmRuntime`] wraps a coordinator in an `Arc<Mutex<_>>` and, once
//! awake, drives it from a tokio interval: each tick samples a fraction of
//! the bees to act, then advances the hive. Callers keep using the shared
//! handle between ticks to spawn flowers, inject actions or read state.
//!
//! # Feature Flag
//!
//! This module requires the `async` feature (on by default):
//! ```toml
//! hive-runtime = { version = "0.1", features = ["async"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use hive_runtime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut runtime = SwarmRuntime::new(SwarmCoordinator::new(SwarmConfig::default()));
//!     runtime.swarm().lock().await.spawn_flower(FlowerSeed::new(0.9));
//!
//!     runtime.awaken();
//!     tokio::time::sleep(std::time::Duration::from_secs(2)).await;
//!     let ticks = runtime.sleep().await;
//!     println!("ran {} ticks", ticks);
//! }
//! ```

#![cfg(feature = "async")]

use crate::coordinator::SwarmCoordinator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Owns the background tick loop of a hive.
pub struct SwarmRuntime {
    swarm: Arc<Mutex<SwarmCoordinator>>,
    period: Duration,
    stop: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<u64>>,
}

impl SwarmRuntime {
    pub fn new(swarm: SwarmCoordinator) -> Self {
        let period = swarm.config().tick_interval();
        Self {
            swarm: Arc::new(Mutex::new(swarm)),
            period,
            stop: None,
            handle: None,
        }
    }

    /// Shared handle to the hive.
    pub fn swarm(&self) -> Arc<Mutex<SwarmCoordinator>> {
        Arc::clone(&self.swarm)
    }

    pub fn is_awake(&self) -> bool {
        self.handle.is_some()
    }

    /// Start the tick loop on the current tokio runtime.
    /// Returns false if it was already running.
    pub fn awaken(&mut self) -> bool {
        if self.is_awake() {
            return false;
        }
        let (tx, mut rx) = watch::channel(false);
        let swarm = Arc::clone(&self.swarm);
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = 0u64;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let mut hive = swarm.lock().await;
                        hive.act_sample();
                        hive.tick();
                        ticks += 1;
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }
            ticks
        });

        info!("Hive awake, ticking every {:?}", period);
        self.stop = Some(tx);
        self.handle = Some(handle);
        true
    }

    /// Stop the tick loop and wait for it to finish. Returns the number of
    /// ticks it ran; zero if the hive was not awake.
    pub async fn sleep(&mut self) -> u64 {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(true);
        }
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.await {
            Ok(ticks) => {
                info!("Hive asleep after {} ticks", ticks);
                ticks
            }
            Err(e) => {
                warn!("Tick loop ended abnormally: {}", e);
                0
            }
        }
    }
}

impl Drop for SwarmRuntime {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(true);
        }
    }
}
