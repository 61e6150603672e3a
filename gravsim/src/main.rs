use gravsim::{ScenarioConfig, Scenario, SimulationDriver, LogProgress, RunOutcome};
use gravsim::bench_step;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Newtonian n-body simulation with frame, plot and table export")]
struct Args {
    /// Scenario file, looked up in the working directory, then in `scenarios/`
    #[arg(short, default_value = "two_bodies.yaml")]
    file_name: String,

    /// Override the number of samples
    #[arg(long)]
    samples: Option<usize>,

    /// Override the number of frames (0 disables frames and video)
    #[arg(long)]
    frames: Option<usize>,

    /// Override the output directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the trajectory plot
    #[arg(long)]
    no_plot: bool,

    /// Skip video assembly, frames are still written
    #[arg(long)]
    no_video: bool,

    /// Time engine steps for growing N and exit
    #[arg(long)]
    bench: bool,
}

fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_from_yaml(args: &Args) -> Result<ScenarioConfig> {
    let config_path = scenario_path(&args.file_name);
    let mut cfg = ScenarioConfig::from_yaml_file(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;

    if let Some(samples) = args.samples {
        cfg.run.samples = samples;
    }
    if let Some(frames) = args.frames {
        cfg.run.frames = frames;
    }
    if let Some(output) = &args.output {
        cfg.output.directory = output.clone();
    }
    if args.no_plot {
        cfg.run.plot = false;
    }
    if args.no_video {
        cfg.output.video = false;
    }

    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.bench {
        bench_step(&[200, 400, 800, 1600, 3200, 6400])?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args)?;
    let scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;

    let start = Instant::now();
    let mut driver = SimulationDriver::with_default_outputs(&scenario.render);
    let report = driver
        .run(&scenario, &mut LogProgress::default())
        .context("simulation failed")?;

    let elapsed = start.elapsed().as_secs_f64();
    match report.outcome {
        RunOutcome::Completed => info!(
            "done: {} samples, {} frames in {elapsed:.2} s, output in {}",
            report.record.len() - 1,
            report.frames_emitted,
            scenario.output.directory.display()
        ),
        RunOutcome::Cancelled => info!("cancelled after {} samples", report.record.len() - 1),
    }

    Ok(())
}
