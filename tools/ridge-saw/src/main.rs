/// Ridge-line statistics for self-avoiding walk analysis.
///
/// Detects ridge lines (via the external `ridgetool`) in a user image or in
/// repeatedly generated noise tiles, and writes `steps, distance` CSV rows.
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use log::info;

use saw_core::noise::params::DEFAULT_SIZE;
use saw_core::noise::GENERATOR_NAME;
use saw_core::{
    CountPolicy, Mode, NoiseConfig, NoiseDistribution, OutputSink, Pipeline, ProcessExtractor,
    SampleWriter, SawError, TiffExporter,
};

// ── CLI ──────────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = "\
Detect ridge lines and output step count and end-to-end distance for
comparison with self-avoiding walk statistics.  Two modes are available:

  - If '-i FILE' was given, image data is loaded from FILE, and the
    number of data points is determined automatically.

  - If '-r' was given, random noise images are generated and used to
    obtain line data.  TYPE selects the noise function: 'S' (speckle,
    default) or 'N' (normal).  '-d' controls how large the generated
    images are.  If '-n' is given, images are generated repeatedly until
    NUM data points have been created.  '-s' overrides the random seed.

If an OUTFILE was specified, CSV data is written to that file; otherwise,
output is to standard output.

The RIDGETOOL environment variable can be set to control the path to the
'ridgetool' program.";

#[derive(Parser, Debug)]
#[command(
    name = "ridge-saw",
    about = "Generate ridge data for self-avoiding walk analysis",
    after_help = AFTER_HELP,
    group(ArgGroup::new("source").required(true).args(["input", "random"]))
)]
struct Args {
    /// Load image data from FILE
    #[arg(short = 'i', value_name = "FILE")]
    input: Option<PathBuf>,

    /// Generate random image data; TYPE is attached, as in -rN [default TYPE: S]
    #[arg(
        short = 'r',
        value_name = "TYPE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "S",
        value_parser = parse_noise_type
    )]
    random: Option<NoiseDistribution>,

    /// Size for random tiles
    #[arg(short = 'd', value_name = "SIZE", default_value_t = DEFAULT_SIZE, value_parser = parse_at_least_one)]
    size: usize,

    /// Ridge detection scale
    #[arg(short = 't', value_name = "SCALE", default_value_t = 0.0, value_parser = parse_scale)]
    scale: f64,

    /// Target data point count for random generation
    #[arg(short = 'n', value_name = "NUM", value_parser = parse_at_least_one)]
    target: Option<usize>,

    /// Random seed
    #[arg(short = 's', value_name = "SEED")]
    seed: Option<u64>,

    /// How the generate loop counts data points towards '-n'
    #[arg(long, value_enum, default_value_t = PolicyArg::Accumulate)]
    count_policy: PolicyArg,

    /// Output CSV file [default: standard output]
    #[arg(value_name = "OUTFILE")]
    outfile: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Stop once NUM data points have been written
    Accumulate,
    /// Never count data points: with '-n', generate until interrupted
    Frozen,
}

impl From<PolicyArg> for CountPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Accumulate => CountPolicy::Accumulate,
            PolicyArg::Frozen => CountPolicy::Frozen,
        }
    }
}

fn parse_noise_type(s: &str) -> Result<NoiseDistribution, String> {
    match s {
        "S" | "s" => Ok(NoiseDistribution::Speckle),
        "N" | "n" => Ok(NoiseDistribution::Norm),
        _ => Err(format!("Bad argument '{s}' to -r option; TYPE must be 'S' or 'N'")),
    }
}

fn parse_at_least_one(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(format!("'{s}' is not a positive integer")),
    }
}

fn parse_scale(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!("'{s}' is not a non-negative number")),
    }
}

/// Spell an attached `-r` TYPE as `-r=TYPE`. With `require_equals` clap then
/// takes TYPE only when attached, and a separate token after `-r` stays
/// positional.
fn attach_noise_type<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut options_done = false;
    for (i, arg) in argv.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i > 0 && !options_done {
            if arg == "--" {
                options_done = true;
            } else if let Some(ty) = arg.to_str().and_then(|s| s.strip_prefix("-r")) {
                if !ty.is_empty() && !ty.starts_with('=') {
                    out.push(OsString::from(format!("-r={ty}")));
                    continue;
                }
            }
        }
        out.push(arg);
    }
    out
}

/// Seed line printed to stderr in generate mode, whatever the log level.
fn seed_report(config: &NoiseConfig) -> String {
    format!("Random number seed: {} ({GENERATOR_NAME})", config.effective_seed())
}

impl Args {
    fn mode(&self) -> Result<Mode, SawError> {
        match (&self.input, self.random) {
            (Some(path), None) => Ok(Mode::SingleFile(path.clone())),
            (None, Some(distribution)) => Ok(Mode::Generate(NoiseConfig {
                distribution,
                size: self.size,
                seed: self.seed,
                target_count: self.target,
            })),
            _ => Err(SawError::Usage("Only one of '-i' or '-r' options may be given.".into())),
        }
    }
}

// ── Run ──────────────────────────────────────────────────────────────────────

fn run(args: Args) -> Result<()> {
    let mode = args.mode()?;

    let mut sink = OutputSink::open(args.outfile.as_deref())?;
    let pipeline = Pipeline::new(ProcessExtractor::from_env(), TiffExporter)
        .with_scale(args.scale)
        .with_policy(args.count_policy.into());
    info!(
        "extractor: {}, scale {:.6}, count policy {:?}",
        pipeline.extractor().program().display(),
        args.scale,
        pipeline.policy()
    );

    let mut writer = SampleWriter::new(&mut sink);
    let summary = match &mode {
        Mode::SingleFile(path) => pipeline
            .run_single_file(path, &mut writer)
            .with_context(|| format!("processing '{}'", path.display()))?,
        Mode::Generate(config) => {
            eprintln!("{}", seed_report(config));
            pipeline.run_generate(config, &mut writer)?
        }
    };
    drop(writer);
    sink.close()?;

    info!("{} data points from {} image(s)", summary.samples, summary.iterations);
    Ok(())
}

/// Parse `argv`, run, and return the process exit status.
fn real_main<I, T>(argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = match Args::try_parse_from(attach_noise_type(argv)) {
        Ok(a) => a,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { 1 } else { 0 };
        }
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();

    match run(args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            err.downcast_ref::<SawError>().map_or(1, SawError::exit_code)
        }
    }
}

fn main() {
    process::exit(real_main(std::env::args_os()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(attach_noise_type(
            std::iter::once("ridge-saw").chain(argv.iter().copied()),
        ))
    }

    #[test]
    fn defaults_for_generate_mode() {
        let a = parse(&["-r"]).unwrap();
        assert_eq!(a.random, Some(NoiseDistribution::Speckle));
        assert_eq!(a.size, 2048);
        assert_eq!(a.scale, 0.0);
        assert_eq!(a.target, None);
        assert_eq!(a.seed, None);
        assert_eq!(a.count_policy, PolicyArg::Accumulate);
        assert!(a.outfile.is_none());
    }

    #[test]
    fn attached_noise_type() {
        assert_eq!(parse(&["-rN"]).unwrap().random, Some(NoiseDistribution::Norm));
        assert_eq!(parse(&["-rS"]).unwrap().random, Some(NoiseDistribution::Speckle));
        assert!(parse(&["-rX"]).is_err());
    }

    #[test]
    fn separate_token_after_r_is_outfile() {
        let a = parse(&["-r", "out.csv"]).unwrap();
        assert_eq!(a.random, Some(NoiseDistribution::Speckle));
        assert_eq!(a.outfile, Some(PathBuf::from("out.csv")));

        let a = parse(&["-rN", "out.csv"]).unwrap();
        assert_eq!(a.random, Some(NoiseDistribution::Norm));
        assert_eq!(a.outfile, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn attach_leaves_other_tokens_alone() {
        let argv = attach_noise_type(["ridge-saw", "-rN", "-r", "-r=S", "-i", "x", "--", "-rS"]);
        let argv: Vec<_> = argv.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(argv, ["ridge-saw", "-r=N", "-r", "-r=S", "-i", "x", "--", "-rS"]);
    }

    #[test]
    fn seed_report_uses_default_seed() {
        let config = NoiseConfig::default();
        assert_eq!(seed_report(&config), format!("Random number seed: 0 ({GENERATOR_NAME})"));
        let config = NoiseConfig { seed: Some(12), ..NoiseConfig::default() };
        assert!(seed_report(&config).starts_with("Random number seed: 12 "));
    }

    #[test]
    fn generate_mode_carries_options() {
        let a = parse(&["out.csv", "-rN", "-d", "64", "-n", "500", "-s", "7", "-t", "1.5"]).unwrap();
        assert_eq!(a.outfile, Some(PathBuf::from("out.csv")));
        assert_eq!(a.scale, 1.5);
        assert_eq!(
            a.mode().unwrap(),
            Mode::Generate(NoiseConfig {
                distribution: NoiseDistribution::Norm,
                size: 64,
                seed: Some(7),
                target_count: Some(500),
            })
        );
    }

    #[test]
    fn single_file_mode() {
        let a = parse(&["-i", "ridges.tif", "out.csv"]).unwrap();
        assert_eq!(a.mode().unwrap(), Mode::SingleFile("ridges.tif".into()));
        assert_eq!(a.outfile, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["-r", "-d", "0"]).is_err());
        assert!(parse(&["-r", "-n", "0"]).is_err());
        assert!(parse(&["-r", "-t", "-1"]).is_err());
        assert!(parse(&["-r", "-s", "-3"]).is_err());
    }

    #[test]
    fn mode_is_required() {
        assert_eq!(real_main(["ridge-saw"]), 1);
    }

    #[test]
    fn help_exits_zero() {
        assert_eq!(real_main(["ridge-saw", "-h"]), 0);
    }

    #[test]
    fn conflicting_modes_exit_one_without_opening_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let out_arg = out.to_string_lossy().into_owned();

        let code = real_main(["ridge-saw", "-i", "a.tif", "-rS", out_arg.as_str()]);

        assert_eq!(code, 1);
        assert!(!out.exists());
    }

    #[test]
    fn unopenable_output_exits_four() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("out.csv");
        let out_arg = out.to_string_lossy().into_owned();
        assert_eq!(real_main(["ridge-saw", "-i", "a.tif", out_arg.as_str()]), 4);
    }
}
