//! `plant-care`: generate instructions for one plant.

use std::io::Write;

use tracing::{debug, warn};

use crate::config::PlantCareConfig;
use crate::error::PlantCareError;
use crate::generation::{care_settings, generate_or_unknown, stream_instructions, CareGenerator};
use crate::plant::{InstructionArtifact, PlantName};
use crate::provider::create_provider;
use crate::storage::InstructionStore;

use super::{parse_model, LocalBackend, PlantCareArgs};

/// Run one generation. Generation failures are not errors; they store `None`.
///
/// Errors are reserved for setup problems (config, model selector) and for
/// failing to write the artifact.
pub async fn handle_plant_care(
    args: PlantCareArgs,
    plant: PlantName,
) -> Result<(), PlantCareError> {
    let mut config = PlantCareConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    let selector = args.model.unwrap_or_else(|| config.model.clone());
    let model = parse_model(&selector)?;
    debug!(%model, plant = %plant, "plant-care starting");

    let mut local = LocalBackend::for_model(
        &model,
        &config,
        config.ollama.availability_sentinel.as_deref(),
    );

    let provider = match create_provider(&model, &config) {
        Ok(provider) => Some(provider),
        Err(e) => {
            println!("Error: {e}");
            warn!(error = %e, "provider unavailable");
            None
        }
    };

    if args.print && args.stream {
        if let Some(provider) = &provider {
            let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));
            stream_to_console(&generator, &plant, local.as_mut()).await;
        } else {
            print_to_console(&plant, &InstructionArtifact::Unknown);
        }
        return Ok(());
    }

    let artifact = match &provider {
        Some(provider) => {
            let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));
            let readiness = local.as_mut().map(LocalBackend::readiness);
            generate_or_unknown(&generator, &plant, readiness).await
        }
        None => InstructionArtifact::Unknown,
    };

    if args.print {
        print_to_console(&plant, &artifact);
    } else {
        InstructionStore::new(&config.output_dir).save_announced(&plant, &artifact)?;
    }
    Ok(())
}

fn print_to_console(plant: &PlantName, artifact: &InstructionArtifact) {
    match artifact {
        InstructionArtifact::Known(body) => {
            println!("# {plant} Care Instructions\n");
            println!("{body}");
        }
        InstructionArtifact::Unknown => println!("Plant '{plant}' is unknown."),
    }
}

async fn stream_to_console(
    generator: &CareGenerator<'_>,
    plant: &PlantName,
    local: Option<&mut LocalBackend>,
) {
    let mut readiness = local.map(LocalBackend::readiness);
    if let Some(ready) = readiness.as_mut() {
        if !ready.check().await {
            println!("Plant '{plant}' is unknown.");
            return;
        }
    }

    println!("# {plant} Care Instructions\n");
    let result = stream_instructions(generator, plant, |text| {
        print!("{text}");
        let _ = std::io::stdout().flush();
    })
    .await;
    println!();

    match result {
        Ok((InstructionArtifact::Unknown, _)) => println!("Plant '{plant}' is unknown."),
        Ok((InstructionArtifact::Known(_), usage)) => {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "stream finished"
            );
        }
        Err(e) => {
            println!("Error generating instructions: {e}");
            warn!(plant = %plant, error = %e, "streaming failed");
            if let Some(ready) = readiness.as_mut() {
                ready.note_failure(&e);
            }
        }
    }
}
