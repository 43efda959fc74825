mod catalog;
mod collectors;
mod config;
mod error;
mod exporters;
mod measure;
mod monitor;
mod publisher;
mod rate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use sysinfo::System;
use tokio::time::{self, Duration};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Config, Exporter};
use crate::error::MonitorError;
use crate::exporters::Point;
use crate::monitor::Monitor;
use crate::publisher::Publisher;

#[derive(Parser, Debug)]
#[command(name = "esmetrics", version, about = "Elasticsearch cluster metrics for InfluxDB")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "esmetrics.toml")]
    config: PathBuf,

    /// Run two cycles, print the line protocol and exit
    #[arg(long)]
    oneshot: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Polls every target once and returns the points of the cycles that succeeded
async fn run_cycle(monitors: &mut [Monitor], publisher: &Publisher) -> Vec<Point> {
    let mut points = Vec::new();
    for monitor in monitors.iter_mut() {
        let published = match monitor.poll().await {
            Ok(metrics) => publisher.publish_all(monitor.label(), &metrics).map_err(MonitorError::from),
            Err(e) => Err(e),
        };

        match published {
            Ok(cycle_points) => points.extend(cycle_points),
            Err(e) => error!("Polling cycle for {} failed: {}", monitor.label(), e),
        }
    }
    points
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    info!("Loaded config with {} target(s)", config.targets.len());

    let hostname = System::host_name().context("Could not determine hostname")?;

    let publisher = Publisher::new(&config.publish);
    let mut monitors: Vec<Monitor> = config.targets.iter().cloned().map(Monitor::new).collect();

    let client = Client::new();
    let mut interval = time::interval(Duration::from_secs(config.collect_interval));

    // The first tick completes immediately, let's consume it
    interval.tick().await;

    if cli.oneshot {
        info!("Running in oneshot mode, metrics will be printed to the console");
        // rates need two samples
        run_cycle(&mut monitors, &publisher).await;
        interval.tick().await;
        let points = run_cycle(&mut monitors, &publisher).await;
        println!("{}", exporters::influxdb::format_points(&points, &hostname));
        return Ok(());
    }

    info!("Running in continuous mode, every {}s", config.collect_interval);
    loop {
        let points = run_cycle(&mut monitors, &publisher).await;

        match &config.exporter {
            Exporter::InfluxDB(influx_config) => {
                let lines = exporters::influxdb::format_points(&points, &hostname);
                if let Err(e) = exporters::influxdb::export_points(&client, influx_config, &lines).await {
                    error!("Failed to export metrics: {}", e);
                }
            }
        }

        interval.tick().await;
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
