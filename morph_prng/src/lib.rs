// Deterministic, portable pseudo-random number generator for morph search.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled with zero external dependencies so that a given seed produces
// the same search trajectory on every platform.
//
// `morph_search` never draws from ambient global randomness: the stochastic
// hill climb and the n-sphere sampler both take a `&mut MorphRng` supplied by
// the caller. Tests seed it explicitly; the CLI seeds it from `--seed`.
//
// **Critical constraint: determinism.** The integer core (`next_u64` and the
// integer range helpers) must produce identical output given the same prior
// state. The floating-point derived draws (`next_f64`, `next_standard_normal`)
// only use IEEE-754 basic operations plus `ln`/`sqrt`/`cos`.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG, the sole source of randomness for search.
///
/// Each search call borrows the generator mutably, so independent calls that
/// need isolation simply own separate instances seeded from distinct values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MorphRng {
    s: [u64; 4],
}

impl MorphRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    /// Two `MorphRng` instances created with the same seed will produce
    /// identical output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1).
    ///
    /// Uses the upper 53 bits of a `u64` to fill the mantissa of an f64.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Uniformly pick one of `-1.0`, `0.0`, `+1.0`.
    ///
    /// This is the per-coordinate move direction of the stochastic hill climb.
    pub fn next_unit_step(&mut self) -> f64 {
        match self.range_u64(0, 3) {
            0 => -1.0,
            1 => 0.0,
            _ => 1.0,
        }
    }

    /// Draw from the standard normal distribution N(0, 1).
    ///
    /// Box–Muller transform; only the cosine branch is used so each call
    /// consumes exactly two `u64` draws and no cached state is carried.
    pub fn next_standard_normal(&mut self) -> f64 {
        // 1 - U keeps u1 in (0, 1] so ln(u1) is finite.
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinism_same_seed_same_output() {
        let mut a = MorphRng::new(42);
        let mut b = MorphRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_different_output() {
        let mut a = MorphRng::new(42);
        let mut b = MorphRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_in_unit_range() {
        let mut rng = MorphRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn range_u64_within_bounds() {
        let mut rng = MorphRng::new(999);
        for _ in 0..10_000 {
            let v = rng.range_u64(10, 20);
            assert!((10..20).contains(&v), "range_u64 out of range: {v}");
        }
    }

    #[test]
    fn unit_step_hits_all_three_directions() {
        let mut rng = MorphRng::new(7);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let s = rng.next_unit_step();
            assert!(s == -1.0 || s == 0.0 || s == 1.0, "unexpected step {s}");
            counts[(s + 1.0) as usize] += 1;
        }
        // Roughly uniform: each bucket near 1000.
        for (i, &c) in counts.iter().enumerate() {
            assert!((800..1200).contains(&c), "bucket {i} has {c} draws");
        }
    }

    #[test]
    fn standard_normal_moments() {
        let mut rng = MorphRng::new(2024);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| rng.next_standard_normal()).collect();
        assert!(draws.iter().all(|x| x.is_finite()));
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean too far from 0: {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance too far from 1: {var}");
    }

    #[test]
    fn serialization_roundtrip() {
        let mut rng = MorphRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: MorphRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
