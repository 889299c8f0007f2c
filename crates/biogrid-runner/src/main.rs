//! Interactive console runner for the grid ecology simulation.

mod input;
mod telemetry;

use anyhow::{Context, Result};
use biogrid_core::SimulationConfig;
use biogrid_world::{ControlHandle, Simulation, TickReport};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

const DEFAULT_HEADLESS_TICKS: u64 = 100;

#[derive(Debug, Parser)]
#[command(author, version, about = "Grid ecology simulation runner")]
struct Cli {
    /// JSON configuration file (built-in roster when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Start paused; press `s` to step
    #[arg(long)]
    start_paused: bool,

    /// Run without pacing or input and print the final snapshot as JSON
    #[arg(long)]
    headless: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(ticks) = cli.ticks {
        config.max_ticks = Some(ticks);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.log_json)?;

    let config = load_config(&cli)?;
    let controls = ControlHandle::with_paused(cli.start_paused);
    let mut simulation = Simulation::new(config)
        .context("Invalid simulation configuration")?
        .with_controls(controls.clone());

    if cli.headless {
        let ticks = simulation
            .config()
            .max_ticks
            .unwrap_or(DEFAULT_HEADLESS_TICKS);
        simulation.run(ticks);
        println!("{}", simulation.world().snapshot().to_json()?);
        telemetry::shutdown_telemetry();
        return Ok(());
    }

    info!("Controls: p = pause/resume, s = single step, q = quit");
    print_frame(&simulation, None);

    input::spawn_input_thread(controls.clone());
    tokio::spawn(shutdown_signal(controls.clone()));

    run_tick_loop(&mut simulation).await;

    let summary = simulation.summary();
    info!(
        final_tick = summary.final_tick,
        herbivores = summary.census.herbivores,
        carnivores = summary.census.carnivores,
        extinct = summary.extinct,
        "Simulation stopped"
    );

    telemetry::shutdown_telemetry();
    Ok(())
}

async fn run_tick_loop(simulation: &mut Simulation) {
    let period = Duration::from_millis(simulation.config().tick_interval_ms);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !simulation.is_finished() {
        ticker.tick().await;

        if let Some(report) = simulation.poll() {
            print_frame(simulation, Some(&report));
        }
    }
}

fn print_frame(simulation: &Simulation, report: Option<&TickReport>) {
    let census = match report {
        Some(report) => report.census.clone(),
        None => simulation.world().census(),
    };
    println!(
        "tick {} | herbivores {} | carnivores {}{}",
        simulation.tick(),
        census.herbivores,
        census.carnivores,
        if simulation.controls().is_paused() {
            " | paused"
        } else {
            ""
        }
    );
    println!("{}", simulation.world().frame());
}

async fn shutdown_signal(controls: ControlHandle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    controls.stop();
}
