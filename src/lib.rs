//! plant-care: LLM-generated plant care instructions.
//!
//! Generates care instructions for a named plant through a hosted chat API
//! (Groq) or a local inference server (Ollama), stores them one file per
//! plant, and benchmarks a plant list by grading every stored artifact with a
//! local model.
//!
//! # Quick Start
//!
//! ```no_run
//! use plant_care::prelude::*;
//!
//! # async fn example() -> plant_care::error::Result<()> {
//! let config = PlantCareConfig::load(None)?;
//! let model: LanguageModel = "groq:llama-3.1-8b-instant".parse()?;
//! let provider = create_provider(&model, &config)?;
//!
//! let plant = PlantName::new("Aloe Vera")?;
//! let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));
//! let artifact = generate_or_unknown(&generator, &plant, None).await;
//! InstructionStore::new(&config.output_dir).save(&plant, &artifact)?;
//! # Ok(())
//! # }
//! ```

pub mod availability;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod plant;
pub mod prelude;
pub mod prompt;
pub mod provider;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
