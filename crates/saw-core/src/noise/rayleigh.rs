//! Rayleigh distribution, sampled through the unit exponential.
//!
//! If `E ~ Exp(1)` then `σ·√(2E) ~ Rayleigh(σ)`, which is the inverse-CDF
//! transform `σ·√(−2 ln U)` with `U` uniform on (0, 1].
use rand::Rng;
use rand_distr::{Distribution, Exp1};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rayleigh {
    sigma: f64,
}

impl Rayleigh {
    /// Rayleigh(σ = 1).
    pub const UNIT: Self = Self { sigma: 1.0 };
}

impl Distribution<f64> for Rayleigh {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let e: f64 = Exp1.sample(rng);
        self.sigma * (2.0 * e).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_are_non_negative_with_expected_mean() {
        // Mean of Rayleigh(σ) is σ·√(π/2) ≈ 1.2533 for σ = 1.
        let dist = Rayleigh::UNIT;
        let mut rng = StdRng::seed_from_u64(9);
        let n = 200_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let v = dist.sample(&mut rng);
            assert!(v >= 0.0);
            sum += v;
        }
        let mean = sum / n as f64;
        let expected = (std::f64::consts::PI / 2.0).sqrt();
        assert!((mean - expected).abs() < 0.01, "mean={mean:.4}, expected={expected:.4}");
    }
}
