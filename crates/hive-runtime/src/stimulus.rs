//! Random stimulus — a stand-in for real instrumentation.
//!
//! Produces uniformly random discoveries, work values and threats so a swarm
//! can run without any outside input. Handy for demos and load tests. Its
//! numbers mean nothing; production callers should inject real measurements.

use hive_core::stimulus::{Discovery, DiscoverySource, ThreatDetector, ThreatReport, WorkValuer};
use hive_core::types::{Bee, Flower, FlowerId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Threat kinds the random detector reports.
pub const THREAT_KINDS: &[&str] = &["intrusion", "anomaly", "overload", "spoofing"];

#[derive(Debug, Clone)]
pub struct RandomStimulus {
    rng: StdRng,
}

impl RandomStimulus {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStimulus {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoverySource for RandomStimulus {
    fn discover(&mut self, _scout: &Bee, flowers: &[FlowerId]) -> Discovery {
        let quality = self.rng.gen_range(0.0..=1.0);
        Discovery::new(quality, flowers.choose(&mut self.rng).copied())
    }
}

impl WorkValuer for RandomStimulus {
    /// `quality × U[0.5, 1]`: better flowers pay more on average.
    fn work_value(&mut self, _worker: &Bee, flower: &Flower) -> f64 {
        flower.quality * self.rng.gen_range(0.5..=1.0)
    }
}

impl ThreatDetector for RandomStimulus {
    fn detect(&mut self, _guard: &Bee) -> ThreatReport {
        let level = self.rng.gen_range(0.0..=1.0);
        let kind = THREAT_KINDS.choose(&mut self.rng).copied().unwrap_or("unknown");
        ThreatReport::new(level, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hive_core::types::{Position, Role};
    use serde_json::Map;

    fn flower(quality: f64) -> Flower {
        Flower {
            id: FlowerId::new(),
            position: Position::origin(),
            quality,
            bee_count: 0,
            metadata: Map::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn values_stay_in_range() {
        let mut s = RandomStimulus::seeded(11);
        let bee = Bee::new(Role::Scout, Position::origin(), Utc::now());
        let f = flower(0.8);
        for _ in 0..200 {
            let d = s.discover(&bee, &[f.id]);
            assert!((0.0..=1.0).contains(&d.quality));
            assert_eq!(d.flower, Some(f.id));

            let v = s.work_value(&bee, &f);
            assert!((0.4..=0.8).contains(&v));

            let t = s.detect(&bee);
            assert!((0.0..=1.0).contains(&t.level));
            assert!(THREAT_KINDS.contains(&t.kind.as_str()));
        }
    }

    #[test]
    fn better_flowers_pay_more_on_average() {
        let mut s = RandomStimulus::seeded(5);
        let bee = Bee::new(Role::Worker, Position::origin(), Utc::now());
        let (rich, poor) = (flower(0.9), flower(0.3));
        let mean = |s: &mut RandomStimulus, f: &Flower| {
            (0..500).map(|_| s.work_value(&bee, f)).sum::<f64>() / 500.0
        };
        assert!(mean(&mut s, &rich) > mean(&mut s, &poor));
    }

    #[test]
    fn no_flowers_means_no_reference() {
        let mut s = RandomStimulus::seeded(1);
        let bee = Bee::new(Role::Scout, Position::origin(), Utc::now());
        assert_eq!(s.discover(&bee, &[]).flower, None);
    }
}
