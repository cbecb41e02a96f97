//! Fixed-point sigmoid/log approximations and the unigram^p negative
//! sampling table.

use anyhow::{Result, bail};
use rand::Rng;
use rand::rngs::StdRng;

pub const SIGMOID_TABLE_SIZE: usize = 512;
pub const MAX_SIGMOID: f64 = 8.0;
pub const LOG_TABLE_SIZE: usize = 512;
pub const NEGATIVE_TABLE_SIZE: usize = 10_000_000;

/// Precomputed sigmoid and natural-log tables, 513 entries each.
///
/// `sigmoid` covers [-8, 8] and saturates outside it; `log` covers (0, 1]
/// at 1/512 resolution. Both trade a table lookup for a libm call in the
/// hot loop.
pub struct ApproxMath {
    t_sigmoid: Vec<f64>,
    t_log: Vec<f64>,
}

impl ApproxMath {
    pub fn new() -> ApproxMath {
        let mut t_sigmoid = Vec::with_capacity(SIGMOID_TABLE_SIZE + 1);
        for i in 0..=SIGMOID_TABLE_SIZE {
            let x = (i * 2) as f64 * MAX_SIGMOID / SIGMOID_TABLE_SIZE as f64 - MAX_SIGMOID;
            t_sigmoid.push(1.0 / (1.0 + (-x).exp()));
        }
        let mut t_log = Vec::with_capacity(LOG_TABLE_SIZE + 1);
        for i in 0..=LOG_TABLE_SIZE {
            let x = (i as f64 + 1e-5) / LOG_TABLE_SIZE as f64;
            t_log.push(x.ln());
        }
        ApproxMath { t_sigmoid, t_log }
    }

    pub fn sigmoid(&self, x: f64) -> f64 {
        if x <= -MAX_SIGMOID {
            0.0
        } else if x >= MAX_SIGMOID {
            1.0
        } else {
            let i = ((x + MAX_SIGMOID) * SIGMOID_TABLE_SIZE as f64 / MAX_SIGMOID / 2.0) as usize;
            self.t_sigmoid[i]
        }
    }

    /// Table-approximated natural log over (0, 1]. Returns exactly 0.0 for
    /// x > 1; the scores fed in here never legitimately exceed 1.
    pub fn log(&self, x: f64) -> f64 {
        if x > 1.0 {
            return 0.0;
        }
        let i = (x * LOG_TABLE_SIZE as f64) as usize;
        self.t_log[i]
    }
}

impl Default for ApproxMath {
    fn default() -> Self {
        ApproxMath::new()
    }
}

/// Flat unigram^power sampling table over the retained vocabulary.
///
/// Id `i` appears `floor(count_i^p * TABLE_SIZE / z)` times, so a uniform
/// index draw approximates the unigram^p distribution.
pub struct NegativeSampler {
    table: Vec<i64>,
}

impl NegativeSampler {
    /// `counts[i]` is the corpus count of the word with dense id `i`.
    pub fn new(counts: &[u64], power: f64) -> NegativeSampler {
        let z: f64 = counts.iter().map(|&c| (c as f64).powf(power)).sum();
        let mut table = Vec::new();
        for (id, &count) in counts.iter().enumerate() {
            let copies = ((count as f64).powf(power) * NEGATIVE_TABLE_SIZE as f64 / z) as usize;
            for _ in 0..copies {
                table.push(id as i64);
            }
        }
        NegativeSampler { table }
    }

    /// Draws an id different from `exclude`. Self-collision is the only
    /// thing rejected; repeats across separate draws are allowed.
    pub fn draw(&self, exclude: i64, rng: &mut StdRng) -> i64 {
        loop {
            let id = self.table[rng.random_range(0..self.table.len())];
            if id != exclude {
                return id;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Training objective, chosen once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Pair-sum second-order loss on top of the single-pair term.
    SecondOrder,
    /// Plain skip-gram negative sampling.
    SkipGram,
}

impl Objective {
    pub fn from_name(name: &str) -> Result<Objective> {
        match name {
            "secvec" => Ok(Objective::SecondOrder),
            "skipgram" => Ok(Objective::SkipGram),
            other => bail!("unknown loss '{other}', expected 'secvec' or 'skipgram'"),
        }
    }

    /// Exponent applied to counts when building the sampling table.
    pub fn sampling_power(self) -> f64 {
        match self {
            Objective::SecondOrder => 0.75,
            Objective::SkipGram => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn sigmoid_midpoint_and_saturation() {
        let math = ApproxMath::new();
        assert!((math.sigmoid(0.0) - 0.5).abs() < 1e-9);
        assert_eq!(math.sigmoid(-8.0), 0.0);
        assert_eq!(math.sigmoid(8.0), 1.0);
        assert_eq!(math.sigmoid(-100.0), 0.0);
        assert_eq!(math.sigmoid(100.0), 1.0);
    }

    #[test]
    fn sigmoid_tracks_the_true_curve() {
        let math = ApproxMath::new();
        for i in -70..=70 {
            let x = i as f64 / 10.0;
            let truth = 1.0 / (1.0 + (-x).exp());
            // half a table step at the steepest point
            assert!(
                (math.sigmoid(x) - truth).abs() < 0.01,
                "sigmoid({x}) too far off"
            );
        }
    }

    #[test]
    fn log_clamps_above_one() {
        let math = ApproxMath::new();
        assert_eq!(math.log(1.5), 0.0);
        assert_eq!(math.log(2.0), 0.0);
        assert_eq!(math.log(100.0), 0.0);
    }

    #[test]
    fn log_matches_on_grid_points() {
        let math = ApproxMath::new();
        for i in 1..=LOG_TABLE_SIZE {
            let x = i as f64 / LOG_TABLE_SIZE as f64;
            assert!((math.log(x) - x.ln()).abs() < 1e-4, "log({x}) off grid");
        }
    }

    #[test]
    fn log_between_grid_points() {
        let math = ApproxMath::new();
        // error is bounded by one table cell, ln((i+1)/i), small away from 0
        for i in 1..40 {
            let x = 0.125 + i as f64 * 0.02;
            assert!((math.log(x) - x.ln()).abs() < 0.02, "log({x}) drifted");
        }
    }

    #[test]
    fn log_is_finite_at_zero() {
        let math = ApproxMath::new();
        assert!(math.log(0.0).is_finite());
        assert!(math.log(0.0) < -15.0);
    }

    #[test]
    fn sampler_never_returns_excluded() {
        let sampler = NegativeSampler::new(&[50, 30, 20], 0.75);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            assert_ne!(sampler.draw(0, &mut rng), 0);
        }
    }

    #[test]
    fn sampler_approximates_unigram_power() {
        let counts = [1000u64, 100, 10];
        let power = 0.75;
        let sampler = NegativeSampler::new(&counts, power);
        let z: f64 = counts.iter().map(|&c| (c as f64).powf(power)).sum();

        let mut rng = StdRng::seed_from_u64(7);
        let draws = 100_000;
        let mut hits = [0u64; 3];
        for _ in 0..draws {
            // exclude can never match, so draws are unbiased
            hits[sampler.draw(-1, &mut rng) as usize] += 1;
        }
        for (id, &count) in counts.iter().enumerate() {
            let expected = (count as f64).powf(power) / z;
            let observed = hits[id] as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "id {id}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn sampler_table_multiplicity_floors() {
        let counts = [3u64, 1];
        let sampler = NegativeSampler::new(&counts, 1.0);
        // z = 4, so id 0 gets 7_500_000 entries and id 1 gets 2_500_000
        assert_eq!(sampler.len(), 10_000_000);
        assert!(!sampler.is_empty());
    }

    #[test]
    fn objective_names() {
        assert_eq!(Objective::from_name("secvec").unwrap(), Objective::SecondOrder);
        assert_eq!(Objective::from_name("skipgram").unwrap(), Objective::SkipGram);
        assert!(Objective::from_name("glove").is_err());
    }

    #[test]
    fn objective_powers() {
        assert_eq!(Objective::SecondOrder.sampling_power(), 0.75);
        assert_eq!(Objective::SkipGram.sampling_power(), 0.5);
    }
}
