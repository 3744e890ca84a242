//! plant-care binary entry point.

use clap::Parser;
use plant_care::cli::care::handle_plant_care;
use plant_care::cli::PlantCareArgs;
use plant_care::plant::PlantName;
use plant_care::telemetry::{default_level, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut args = PlantCareArgs::parse();
    init_tracing(default_level(args.verbose));

    let plant = match args.plant_name.take().map(PlantName::new) {
        Some(Ok(plant)) => plant,
        _ => {
            println!("Error: Plant name is required");
            eprintln!("Usage: plant-care \"plant name\"");
            std::process::exit(1);
        }
    };

    if let Err(e) = handle_plant_care(args, plant).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
