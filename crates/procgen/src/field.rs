use noise::{NoiseFn, Simplex};

/// Divisor applied to grid coordinates before sampling simplex noise.
/// Larger values stretch the undulation across more cells.
pub const BASE_NOISE_SCALE: f64 = 100.0;

/// Seeded smooth noise in `[0, 1]`.
///
/// Holds the simplex permutation table for one seed so repeated sampling
/// does not rebuild it.
pub struct BaseNoise {
    simplex: Simplex,
    seed: u32,
}

impl BaseNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: Simplex::new(seed),
            seed,
        }
    }

    /// Sample at a real-valued grid position.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let raw = self
            .simplex
            .get([x / BASE_NOISE_SCALE, y / BASE_NOISE_SCALE]);
        ((raw + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

impl Clone for BaseNoise {
    fn clone(&self) -> Self {
        Self::new(self.seed)
    }
}

impl std::fmt::Debug for BaseNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseNoise")
            .field("seed", &self.seed)
            .finish()
    }
}

/// One-shot smooth noise sample. Prefer [`BaseNoise`] in loops.
pub fn base_noise(x: f64, y: f64, seed: u32) -> f64 {
    BaseNoise::new(seed).sample(x, y)
}

/// 32-bit avalanche hash of a grid position and seed.
///
/// The inputs are encoded as the ASCII key `"{x}#{y}#{seed}"`, folded with
/// a murmur-style multiply/rotate step per byte, then finalized with the
/// murmur3 `fmix32` constants. Integer-only, so every platform agrees.
pub fn hash_u32(x: i32, y: i32, seed: u32) -> u32 {
    let key = format!("{x}#{y}#{seed}");
    let mut h: u32 = 1_779_033_703 ^ key.len() as u32;
    for &byte in key.as_bytes() {
        h = (h ^ u32::from(byte)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}

/// High-frequency jitter in `[0, 1)` with no spatial continuity.
///
/// Keeps the top 24 bits of [`hash_u32`] so the result is exact in `f32`
/// and can never round up to `1.0`.
pub fn hash_noise(x: i32, y: i32, seed: u32) -> f32 {
    (hash_u32(x, y, seed) >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_conformance_vectors() {
        assert_eq!(hash_u32(5, 5, 29), 1_917_349_310);
        assert_eq!(hash_u32(0, 0, 29), 2_060_238_690);
        assert_eq!(hash_u32(3, 4, 47), 3_625_540_511);
        assert_eq!(hash_u32(-2, 7, 29), 2_709_682_460);
    }

    #[test]
    fn hash_noise_at_five_five() {
        let expected = (1_917_349_310u32 >> 8) as f32 / 16_777_216.0;
        assert_eq!(hash_noise(5, 5, 29), expected);
        assert!((hash_noise(5, 5, 29) - 0.446_417_6).abs() < 1e-6);
    }

    #[test]
    fn separator_prevents_concatenation_collisions() {
        assert_ne!(hash_u32(1, 23, 4), hash_u32(12, 3, 4));
        assert_ne!(hash_u32(1, 2, 34), hash_u32(12, 3, 4));
    }

    #[test]
    fn hash_is_seed_sensitive() {
        assert_ne!(hash_u32(5, 5, 29), hash_u32(5, 5, 47));
    }

    #[test]
    fn hash_noise_reaches_extremes_without_hitting_one() {
        // Largest value the top-24-bit mapping can produce.
        let max = ((u32::MAX >> 8) as f32) / (1u32 << 24) as f32;
        assert!(max < 1.0);
    }

    #[test]
    fn base_noise_is_smooth_between_neighbours() {
        let field = BaseNoise::new(47);
        let a = field.sample(10.0, 10.0);
        let b = field.sample(10.5, 10.0);
        assert!((a - b).abs() < 0.05);
    }

    #[test]
    fn base_noise_matches_one_shot() {
        let field = BaseNoise::new(47);
        assert_eq!(field.sample(3.0, -8.0), base_noise(3.0, -8.0, 47));
        assert_eq!(field.clone().sample(3.0, -8.0), field.sample(3.0, -8.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hash_noise_in_unit_interval(x in any::<i32>(), y in any::<i32>(), seed in any::<u32>()) {
                let v = hash_noise(x, y, seed);
                prop_assert!((0.0..1.0).contains(&v));
            }

            #[test]
            fn hash_noise_is_deterministic(x in -10_000i32..10_000, y in -10_000i32..10_000, seed in any::<u32>()) {
                prop_assert_eq!(hash_noise(x, y, seed).to_bits(), hash_noise(x, y, seed).to_bits());
            }

            #[test]
            fn base_noise_in_unit_interval(x in -1.0e5f64..1.0e5, y in -1.0e5f64..1.0e5, seed in 0u32..1000) {
                let v = base_noise(x, y, seed);
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
