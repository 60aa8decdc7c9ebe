//! Synthetic noise tiles.
//!
//! Every cell is an independent draw from the configured law. The RNG is an
//! explicit value owned by the caller and advanced by `rows * cols` draws per
//! fill, so a fixed seed yields one reproducible sequence across a whole run
//! regardless of how many tiles are generated from it.
pub mod params;
pub mod rayleigh;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::surface::Surface;
use params::{NoiseConfig, NoiseDistribution};
use rayleigh::Rayleigh;

/// Name reported next to the seed at start-up.
pub const GENERATOR_NAME: &str = "StdRng";

/// Draw one value from `dist`.
#[inline]
fn draw<R: Rng + ?Sized>(dist: NoiseDistribution, speckle: &Rayleigh, rng: &mut R) -> f64 {
    match dist {
        NoiseDistribution::Speckle => speckle.sample(rng),
        NoiseDistribution::Norm => {
            let v: f64 = StandardNormal.sample(rng);
            v
        }
    }
}

/// Overwrite every cell of `surface` with fresh draws, row by row.
pub fn fill_surface<R: Rng + ?Sized>(surface: &mut Surface, dist: NoiseDistribution, rng: &mut R) {
    let speckle = Rayleigh::UNIT;
    for r in 0..surface.rows {
        for c in 0..surface.cols {
            surface.set(r, c, draw(dist, &speckle, rng));
        }
    }
}

/// Allocate a `size × size` tile and fill it per `config`.
pub fn generate<R: Rng + ?Sized>(config: &NoiseConfig, rng: &mut R) -> Surface {
    let mut surface = Surface::square(config.size);
    fill_surface(&mut surface, config.distribution, rng);
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(distribution: NoiseDistribution, size: usize) -> NoiseConfig {
        NoiseConfig { distribution, size, seed: Some(17), target_count: None }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let cfg = config(NoiseDistribution::Speckle, 4);
        let a = generate(&cfg, &mut StdRng::seed_from_u64(cfg.effective_seed()));
        let b = generate(&cfg, &mut StdRng::seed_from_u64(cfg.effective_seed()));
        let bytes = |s: &Surface| s.data.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>();
        assert_eq!(bytes(&a), bytes(&b));
    }

    #[test]
    fn stream_advances_across_tiles() {
        // Two consecutive tiles from one stream differ, and the pair matches
        // a single double-length draw sequence.
        let cfg = config(NoiseDistribution::Norm, 3);
        let mut rng = StdRng::seed_from_u64(5);
        let first = generate(&cfg, &mut rng);
        let second = generate(&cfg, &mut rng);
        assert_ne!(first, second);

        let mut long = Surface::new(6, 3, 0.0);
        fill_surface(&mut long, NoiseDistribution::Norm, &mut StdRng::seed_from_u64(5));
        assert_eq!(&long.data[..9], &first.data[..]);
        assert_eq!(&long.data[9..], &second.data[..]);
    }

    #[test]
    fn speckle_is_non_negative() {
        let cfg = config(NoiseDistribution::Speckle, 32);
        let s = generate(&cfg, &mut StdRng::seed_from_u64(1));
        assert!(s.min_value() >= 0.0);
    }

    #[test]
    fn norm_is_roughly_standard() {
        let cfg = config(NoiseDistribution::Norm, 256);
        let s = generate(&cfg, &mut StdRng::seed_from_u64(2));
        let n = s.len() as f64;
        let mean = s.data.iter().sum::<f64>() / n;
        let var = s.data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.02, "mean={mean:.4}");
        assert!((var - 1.0).abs() < 0.03, "var={var:.4}");
        assert!(s.min_value() < 0.0);
    }

    #[test]
    fn fill_keeps_dimensions() {
        let mut s = Surface::new(2, 5, f64::NAN);
        fill_surface(&mut s, NoiseDistribution::Speckle, &mut StdRng::seed_from_u64(0));
        assert_eq!((s.rows, s.cols), (2, 5));
        assert!(s.data.iter().all(|v| v.is_finite()));
    }
}
