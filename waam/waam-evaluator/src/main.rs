//! `waam-eval`: evaluate the wall thickness of a WAAM part.
//!
//! ```text
//! waam-eval part.stl --output results -v
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use mesh_thickness::ThicknessParams;
use tracing::Level;
use waam_evaluator::{EvaluationConfig, evaluate};

/// Inscribed-sphere wall thickness of STL and STEP parts
#[derive(Parser)]
#[command(name = "waam-eval")]
#[command(about = "Wall thickness evaluation for WAAM parts", long_about = None)]
#[command(version)]
struct Cli {
    /// Input geometry (.stl, .step or .stp)
    #[arg(name = "INPUT")]
    input: PathBuf,

    /// Directory for the view files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Chord-deviation tolerance for tessellating STEP input, in model
    /// units (0 = automatic, 0.1% of the part diameter). Smaller values give
    /// finer triangles; this is not an element edge length. Ignored for STL.
    #[arg(long, value_name = "TOL")]
    sizing: Option<f64>,

    /// Root-finding starts per triangle
    #[arg(long, default_value_t = 10)]
    max_trials: usize,

    /// Gradient values at or above this fraction of the maximum are clamped
    #[arg(long, default_value_t = 0.95)]
    outlier_fraction: f64,

    /// Solve triangles on one thread
    #[arg(long)]
    sequential: bool,

    /// Stop solving after this many seconds
    #[arg(long, value_name = "SECS")]
    time_budget: Option<f64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Result<EvaluationConfig> {
        let mut params = ThicknessParams::default()
            .max_trials(self.max_trials)
            .outlier_fraction(self.outlier_fraction)
            .parallel(!self.sequential);
        if let Some(secs) = self.time_budget {
            if !(secs.is_finite() && secs >= 0.0) {
                bail!("--time-budget must be a non-negative number of seconds, got {secs}");
            }
            params = params.time_budget(Duration::from_secs_f64(secs));
        }
        params.validate().context("invalid analysis parameters")?;

        Ok(EvaluationConfig::new(&self.input)
            .output_dir(&self.output)
            .sizing(self.sizing)
            .params(params))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config()?;
    let evaluation = evaluate(&config)
        .with_context(|| format!("evaluation of {} failed", config.input.display()))?;

    print!("{}", evaluation.analysis.report);
    println!("Wrote {}", evaluation.radii_file.display());
    println!("Wrote {}", evaluation.gradient_file.display());
    Ok(())
}
