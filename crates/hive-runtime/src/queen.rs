//! Broadcaster — the queen's periodic mood pulse.
//!
//! The queen does not command individual bees. She reads the aggregate state,
//! names the mood with a phrase from a small pool, and every bee keeps a
//! reference to the latest pulse.

use chrono::{DateTime, Utc};
use hive_core::types::{Mood, QueenPulse, SwarmState};
use rand::seq::SliceRandom;
use rand::Rng;

const THREAT_PHRASES: &[&str] = &[
    "Close ranks, the hive is under attack",
    "All guards to the entrance",
    "Danger at the comb, defend the brood",
];
const GUARDING_PHRASES: &[&str] = &[
    "Hold the perimeter",
    "Eyes on the horizon",
    "Guards, stay watchful",
];
const HEALING_PHRASES: &[&str] = &[
    "Rest and recover",
    "Tend to the weary",
    "The hive mends itself",
];
const EXPLORING_PHRASES: &[&str] = &[
    "New fields await",
    "Scouts, seek further",
    "Map the unknown meadow",
];
const SYNC_PHRASES: &[&str] = &[
    "We move as one",
    "The hive is in harmony",
    "Every bee in its place",
];
const FORAGING_PHRASES: &[&str] = &[
    "Gather while the sun is high",
    "Follow the sweetest trails",
    "Bring the nectar home",
];

/// Turns aggregate state into queen pulses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Broadcaster;

impl Broadcaster {
    pub fn new() -> Self {
        Self
    }

    /// The phrase pool for a mood.
    pub fn phrases(mood: Mood) -> &'static [&'static str] {
        match mood {
            Mood::Threat => THREAT_PHRASES,
            Mood::Guarding => GUARDING_PHRASES,
            Mood::Healing => HEALING_PHRASES,
            Mood::Exploring => EXPLORING_PHRASES,
            Mood::Sync => SYNC_PHRASES,
            Mood::Foraging => FORAGING_PHRASES,
        }
    }

    /// Compose a pulse for `state`, picking the phrase uniformly at random.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        state: &SwarmState,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> QueenPulse {
        let signal = Self::phrases(state.mood)
            .choose(rng)
            .copied()
            .unwrap_or("The hive endures");
        QueenPulse {
            mood: state.mood,
            coherence: state.coherence,
            bee_count: state.bee_count,
            flower_count: state.flower_count,
            signal: signal.to_string(),
            sent_at: now,
        }
    }
}
