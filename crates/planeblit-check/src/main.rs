use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use planeblit_engine::device::GpuInit;
use planeblit_engine::logging::{init_logging, LoggingConfig};
use planeblit_engine::scenario::{self, ScenarioOutcome, ScenarioParams};
use planeblit_engine::verify::DEFAULT_MAX_DIFF;

/// Renders seeded RGB and YUV planes off-screen and verifies the readback.
#[derive(Debug, Parser)]
#[command(name = "planeblit-check", version)]
struct Args {
    /// Image width in pixels.
    #[arg(long, default_value_t = 16)]
    width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = 16)]
    height: u32,

    /// Seed for the random plane content.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Which colour path to exercise.
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Per-channel tolerance for the YUV path (0-255 scale).
    #[arg(long, default_value_t = DEFAULT_MAX_DIFF)]
    max_diff: f32,

    /// Use the software fallback adapter.
    #[arg(long)]
    fallback_adapter: bool,

    /// Log filter, env_logger syntax (overrides RUST_LOG).
    #[arg(long)]
    log: Option<String>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Mode {
    Rgb,
    Yuv,
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let params = ScenarioParams::new(args.width, args.height, args.seed);
    let init = GpuInit {
        force_fallback_adapter: args.fallback_adapter,
        ..GpuInit::default()
    };

    let mut failed = 0usize;

    if matches!(args.mode, Mode::Rgb | Mode::All) {
        let outcome = scenario::run_rgb_scenario(params, &init)
            .context("rgb scenario aborted")?;
        failed += report("rgb", &outcome);
    }

    if matches!(args.mode, Mode::Yuv | Mode::All) {
        let outcome = scenario::run_yuv_scenario(params, &init, args.max_diff)
            .context("yuv scenario aborted")?;
        failed += report("yuv", &outcome);
    }

    anyhow::ensure!(failed == 0, "{failed} scenario(s) failed verification");
    Ok(())
}

/// Prints one result line and returns 1 on failure.
fn report(path: &str, outcome: &ScenarioOutcome) -> usize {
    let ScenarioParams {
        width,
        height,
        seed,
    } = outcome.params;

    match &outcome.verification {
        Ok(()) => {
            println!("{path:<4} {width}x{height} seed {seed}: ok");
            0
        }
        Err(failure) => {
            println!("{path:<4} {width}x{height} seed {seed}: FAILED\n{failure}");
            1
        }
    }
}
