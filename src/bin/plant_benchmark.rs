//! plant-benchmark binary entry point.

use clap::Parser;
use plant_care::cli::benchmark::handle_benchmark;
use plant_care::cli::BenchmarkArgs;
use plant_care::telemetry::{default_level, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = BenchmarkArgs::parse();
    init_tracing(default_level(args.verbose));

    println!("Starting plant care benchmark...");
    if let Err(e) = handle_benchmark(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
