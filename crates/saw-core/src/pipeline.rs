//! Pipeline orchestrator: single-file mode and the generate loop.
//!
//! Generate loop, per iteration:
//!   1. Fill the reusable surface from the shared RNG stream.
//!   2. Export it over the reusable scratch raster.
//!   3. Run the extractor on the scratch raster.
//!   4. Reduce every line and stream the samples.
//!
//! The loop body runs at least once. Whether it repeats depends on the
//! [`CountPolicy`] and the configured target.
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SawError};
use crate::extractor::{RidgeExtractor, TEMP_PREFIX};
use crate::noise::{fill_surface, params::NoiseConfig, GENERATOR_NAME};
use crate::raster::RasterExporter;
use crate::sample::SampleWriter;
use crate::surface::Surface;

// ── Configuration ─────────────────────────────────────────────────────────────

/// How the generate loop's sample counter is advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    /// Counter grows by the samples each iteration emits; the loop stops once
    /// it reaches the target, or after one iteration when no target is set.
    #[default]
    Accumulate,
    /// Counter is never advanced. Without a target the loop runs once; with
    /// a target it runs until the process is killed.
    Frozen,
}

impl CountPolicy {
    /// Samples to add to the counter after an iteration that emitted `emitted`.
    fn advance(self, emitted: usize) -> usize {
        match self {
            CountPolicy::Accumulate => emitted,
            CountPolicy::Frozen => 0,
        }
    }
}

/// Loop condition, evaluated after each iteration.
fn should_continue(count: usize, target: Option<usize>) -> bool {
    target.is_some_and(|t| count < t)
}

/// Largest tile edge a raster can describe.
pub const MAX_TILE_SIZE: usize = u32::MAX as usize;

/// Reject tile edges that are zero, exceed raster dimensions, or whose cell
/// count does not fit in `usize`.
fn check_tile_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(SawError::Usage("tile size must be at least 1".into()));
    }
    if size > MAX_TILE_SIZE || size.checked_mul(size).is_none() {
        return Err(SawError::Usage(format!("tile size {size} is too large")));
    }
    Ok(())
}

/// Where line data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mode {
    /// Extract from a user-supplied raster once.
    SingleFile(PathBuf),
    /// Synthesize noise tiles repeatedly.
    Generate(NoiseConfig),
}

/// Totals reported when a run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub iterations: usize,
    pub samples: usize,
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

pub struct Pipeline<E, X> {
    extractor: E,
    exporter: X,
    scale: f64,
    policy: CountPolicy,
}

impl<E: RidgeExtractor, X: RasterExporter> Pipeline<E, X> {
    pub fn new(extractor: E, exporter: X) -> Self {
        Self { extractor, exporter, scale: 0.0, policy: CountPolicy::default() }
    }

    /// Detection scale passed to the extractor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_policy(mut self, policy: CountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn exporter(&self) -> &X {
        &self.exporter
    }

    pub fn run<W: Write>(&self, mode: &Mode, out: &mut SampleWriter<W>) -> Result<RunSummary> {
        match mode {
            Mode::SingleFile(path) => self.run_single_file(path, out),
            Mode::Generate(config) => self.run_generate(config, out),
        }
    }

    /// Extract once from `input` and emit every line.
    pub fn run_single_file<W: Write>(
        &self,
        input: &Path,
        out: &mut SampleWriter<W>,
    ) -> Result<RunSummary> {
        let dataset = self.extractor.extract(input, self.scale)?;
        let samples = out.write_dataset(&dataset)?;
        Ok(RunSummary { iterations: 1, samples })
    }

    /// Seed a fresh RNG stream from `config` and run the generate loop.
    pub fn run_generate<W: Write>(
        &self,
        config: &NoiseConfig,
        out: &mut SampleWriter<W>,
    ) -> Result<RunSummary> {
        let seed = config.effective_seed();
        debug!("seeding {GENERATOR_NAME} with {seed}");
        let mut rng = StdRng::seed_from_u64(seed);
        self.run_generate_with(config, &mut rng, out)
    }

    /// Generate loop driven by a caller-owned RNG stream.
    pub fn run_generate_with<R: Rng + ?Sized, W: Write>(
        &self,
        config: &NoiseConfig,
        rng: &mut R,
        out: &mut SampleWriter<W>,
    ) -> Result<RunSummary> {
        check_tile_size(config.size)?;
        if self.policy == CountPolicy::Frozen && config.target_count.is_some() {
            warn!("frozen count policy with a target: generating until interrupted");
        }

        let scratch = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tif")
            .tempfile()
            .map_err(SawError::ScratchFile)?;
        debug!("scratch raster: {}", scratch.path().display());

        let mut surface = Surface::square(config.size);
        let mut summary = RunSummary::default();
        let mut count = 0usize;

        loop {
            fill_surface(&mut surface, config.distribution, rng);
            self.exporter.export(&surface, scratch.path())?;

            let dataset = self.extractor.extract(scratch.path(), self.scale)?;
            let emitted = out.write_dataset(&dataset)?;

            summary.iterations += 1;
            summary.samples += emitted;
            count += self.policy.advance(emitted);
            debug!(
                "iteration {}: {} lines, {} samples total",
                summary.iterations, emitted, summary.samples
            );

            if !should_continue(count, config.target_count) {
                break;
            }
        }

        scratch.close().map_err(SawError::ScratchFile)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_target_runs_once() {
        assert!(!should_continue(0, None));
        assert!(!should_continue(100, None));
    }

    #[test]
    fn target_bounds_loop() {
        assert!(should_continue(0, Some(5)));
        assert!(should_continue(4, Some(5)));
        assert!(!should_continue(5, Some(5)));
        assert!(!should_continue(9, Some(5)));
    }

    #[test]
    fn tile_size_bounds() {
        assert!(check_tile_size(1).is_ok());
        assert!(check_tile_size(2048).is_ok());
        assert_eq!(check_tile_size(0).unwrap_err().exit_code(), 1);
        assert_eq!(check_tile_size(usize::MAX).unwrap_err().exit_code(), 1);
        if let Some(too_wide) = MAX_TILE_SIZE.checked_add(1) {
            assert_eq!(check_tile_size(too_wide).unwrap_err().exit_code(), 1);
        }
    }

    #[test]
    fn frozen_policy_never_advances() {
        assert_eq!(CountPolicy::Frozen.advance(12), 0);
        assert_eq!(CountPolicy::Accumulate.advance(12), 12);
        assert_eq!(CountPolicy::default(), CountPolicy::Accumulate);
    }

    #[test]
    fn policy_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&CountPolicy::Frozen).unwrap(), "\"frozen\"");
    }
}
