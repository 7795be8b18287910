//! Command-line entry point: configures a [`Simulator`] from flags, runs it
//! for a fixed duration with a logger and a stats collector attached, then
//! reports the final tallies.

use clap::Parser;
use lob_engine::bus::Backpressure;
use lob_engine::listeners::{Logger, StatsCollector};
use lob_engine::simulator::{Simulator, SimulatorConfig};
use std::time::Duration;

/// Run a simulated limit order book.
#[derive(Debug, Parser)]
#[command(name = "lob-sim", version, about)]
struct Cli {
    /// Number of concurrent producer threads.
    #[arg(long, default_value_t = 4)]
    producers: usize,

    /// Orders generated by each producer.
    #[arg(long, default_value_t = 10_000)]
    orders_per_producer: usize,

    /// Mid-price orders are generated around.
    #[arg(long, default_value_t = 100.0)]
    mid_price: f64,

    /// Maximum distance from the mid-price a generated limit order may
    /// fall.
    #[arg(long, default_value_t = 5.0)]
    spread: f64,

    /// Deterministic RNG seed. Omit to seed from OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// How long to let the simulation run before shutting it down.
    #[arg(long, default_value_t = 5)]
    duration_secs: u64,

    /// Log every event at info level, not just the final summary.
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Enable the live-view listener bundle (depth-of-book view, stats,
    /// publisher) for the run.
    #[arg(long, default_value_t = false)]
    live_view: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut builder = SimulatorConfig::builder()
        .producer_count(cli.producers)
        .orders_per_producer(cli.orders_per_producer)
        .mid_price(cli.mid_price)
        .price_spread(cli.spread)
        .live_view(cli.live_view);
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build();

    let mut simulator = Simulator::new(config);
    let stats = StatsCollector::new();
    simulator
        .add_listener(stats.clone(), Backpressure::Block)
        .expect("bus is freshly constructed, not yet shut down");
    if cli.verbose {
        simulator
            .add_listener(Logger::new(), Backpressure::Drop)
            .expect("bus is freshly constructed, not yet shut down");
    }

    tracing::info!(duration_secs = cli.duration_secs, "starting simulation");
    simulator.start().expect("simulator should not already be running");
    std::thread::sleep(Duration::from_secs(cli.duration_secs));
    simulator.stop().expect("simulator should be running");

    println!(
        "fills: {}  volume: {}  last price: {}",
        stats.fill_count(),
        stats.total_volume(),
        stats
            .last_price()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    );

    if let Some(view) = simulator.live_view() {
        println!(
            "best bid: {}  best ask: {}",
            view.best_bid().map(|p| p.to_string()).unwrap_or_else(|| "n/a".to_string()),
            view.best_ask().map(|p| p.to_string()).unwrap_or_else(|| "n/a".to_string()),
        );
    }
}
