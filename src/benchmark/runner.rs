//! Phase 1: make sure every plant has an artifact.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use strum::Display;
use tracing::{debug, warn};

use crate::availability::{ModelAvailability, ModelCatalog, ModelPuller};
use crate::error::PlantCareError;
use crate::generation::{generate_or_unknown, CareGenerator, LocalReadiness};
use crate::plant::PlantName;
use crate::storage::InstructionStore;

/// Outcome of the generation step for one plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum GenerationStatus {
    Success,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRecord {
    pub plant: PlantName,
    pub status: GenerationStatus,
    pub reason: Option<String>,
}

/// Produces and persists the artifact for a single plant.
#[async_trait]
pub trait GenerationRunner: Send {
    async fn run(&mut self, plant: &PlantName) -> Result<(), PlantCareError>;
}

struct LocalCheck<'a> {
    availability: ModelAvailability,
    catalog: &'a dyn ModelCatalog,
    puller: Option<&'a dyn ModelPuller>,
}

/// Generates in this process and saves through an [`InstructionStore`].
pub struct InProcessRunner<'a> {
    generator: CareGenerator<'a>,
    store: &'a InstructionStore,
    local: Option<LocalCheck<'a>>,
}

impl<'a> InProcessRunner<'a> {
    pub fn new(generator: CareGenerator<'a>, store: &'a InstructionStore) -> Self {
        Self {
            generator,
            store,
            local: None,
        }
    }

    /// Check local model availability before each generation.
    ///
    /// The availability answer is kept across plants.
    pub fn with_local_check(
        mut self,
        availability: ModelAvailability,
        catalog: &'a dyn ModelCatalog,
        puller: Option<&'a dyn ModelPuller>,
    ) -> Self {
        self.local = Some(LocalCheck {
            availability,
            catalog,
            puller,
        });
        self
    }
}

#[async_trait]
impl GenerationRunner for InProcessRunner<'_> {
    async fn run(&mut self, plant: &PlantName) -> Result<(), PlantCareError> {
        println!("Generating instructions for: {plant}");
        let readiness = self.local.as_mut().map(|local| LocalReadiness {
            availability: &mut local.availability,
            catalog: local.catalog,
            puller: local.puller,
        });
        let artifact = generate_or_unknown(&self.generator, plant, readiness).await;
        self.store.save_announced(plant, &artifact)?;
        println!("Successfully generated instructions for {plant}");
        Ok(())
    }
}

/// Runs the `plant-care` command once per plant; exit status 0 is success.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    program: PathBuf,
    args: Vec<String>,
}

impl SubprocessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the plant name on every call.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

#[async_trait]
impl GenerationRunner for SubprocessRunner {
    async fn run(&mut self, plant: &PlantName) -> Result<(), PlantCareError> {
        println!("Generating instructions for: {plant}");
        debug!(program = %self.program.display(), args = ?self.args, "spawning generator");

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg("--")
            .arg(plant.as_str())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| PlantCareError::Subprocess {
                program: self.program_name(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            println!("Error generating instructions for {plant}:");
            println!("{}", String::from_utf8_lossy(&output.stderr));
            return Err(PlantCareError::Subprocess {
                program: self.program_name(),
                message: format!("exited with {}", output.status),
            });
        }

        println!("Successfully generated instructions for {plant}");
        Ok(())
    }
}

/// Generate every plant that has no artifact yet.
pub async fn generate_all(
    plants: &[PlantName],
    store: &InstructionStore,
    runner: &mut dyn GenerationRunner,
) -> Vec<GenerationRecord> {
    println!("\n{}", "=".repeat(50));
    println!("PHASE 1: GENERATING INSTRUCTIONS");
    println!("{}", "=".repeat(50));

    let mut records = Vec::with_capacity(plants.len());
    for plant in plants {
        println!("\nProcessing plant: {plant}");

        if store.exists(plant) {
            println!("Instructions for '{plant}' already exist, skipping generation");
            records.push(GenerationRecord {
                plant: plant.clone(),
                status: GenerationStatus::Skipped,
                reason: Some("Instructions already exist".into()),
            });
            continue;
        }

        let record = match runner.run(plant).await {
            Ok(()) => GenerationRecord {
                plant: plant.clone(),
                status: GenerationStatus::Success,
                reason: None,
            },
            Err(e) => {
                warn!(plant = %plant, error = %e, "generation step failed");
                println!("Exception when generating instructions for {plant}: {e}");
                GenerationRecord {
                    plant: plant.clone(),
                    status: GenerationStatus::Failed,
                    reason: Some("Error generating instructions".into()),
                }
            }
        };
        records.push(record);
    }

    let count = |status: GenerationStatus| records.iter().filter(|r| r.status == status).count();
    println!("\nGeneration Summary:");
    println!("Generated: {}", count(GenerationStatus::Success));
    println!("Skipped: {}", count(GenerationStatus::Skipped));
    println!("Failed: {}", count(GenerationStatus::Failed));

    records
}
