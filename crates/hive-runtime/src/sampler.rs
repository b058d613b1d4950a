//! Activity sampler — decides which bees act on a tick.
//!
//! The swarm never runs every bee every tick. A fixed fraction of the
//! population is drawn uniformly without replacement.

use hive_core::types::BeeId;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct ActivitySampler {
    fraction: f64,
}

impl ActivitySampler {
    /// `fraction` is clamped to [0, 1].
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        Self { fraction }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// `ceil(fraction × population)`, never more than the population.
    pub fn sample_size(&self, population: usize) -> usize {
        ((self.fraction * population as f64).ceil() as usize).min(population)
    }

    pub fn select<R: Rng + ?Sized>(&self, population: &[BeeId], rng: &mut R) -> Vec<BeeId> {
        let n = self.sample_size(population.len());
        population.choose_multiple(rng, n).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn sample_size_rounds_up() {
        let s = ActivitySampler::new(0.1);
        assert_eq!(s.sample_size(0), 0);
        assert_eq!(s.sample_size(1), 1);
        assert_eq!(s.sample_size(25), 3);
        assert_eq!(ActivitySampler::new(7.0).sample_size(4), 4);
    }

    #[test]
    fn selection_has_no_duplicates() {
        let ids: Vec<BeeId> = (0..50).map(BeeId::from_seed).collect();
        let mut rng = StdRng::seed_from_u64(9);
        let picked = ActivitySampler::new(0.5).select(&ids, &mut rng);
        assert_eq!(picked.len(), 25);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 25);
    }
}
