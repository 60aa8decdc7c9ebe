use serde::{Deserialize, Serialize};

/// Default tile edge length in pixels.
pub const DEFAULT_SIZE: usize = 2048;

/// Seed used when none is supplied. Reported to the user at start-up.
pub const DEFAULT_SEED: u64 = 0;

/// Sampling law for synthetic noise tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoiseDistribution {
    /// Rayleigh(σ = 1): coherent-imaging speckle.
    #[default]
    Speckle,
    /// Gaussian(μ = 0, σ = 1).
    Norm,
}

/// Generate-mode parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub distribution: NoiseDistribution,
    /// Tile edge length; tiles are `size × size`.
    pub size: usize,
    pub seed: Option<u64>,
    /// Number of samples to accumulate before stopping.
    pub target_count: Option<usize>,
}

impl NoiseConfig {
    /// Seed that will actually drive the RNG stream.
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            distribution: NoiseDistribution::Speckle,
            size: DEFAULT_SIZE,
            seed: None,
            target_count: None,
        }
    }
}
