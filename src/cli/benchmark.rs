//! `plant-benchmark`: generate what is missing, grade everything, write a report.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tracing::{debug, warn};

use crate::availability::ModelPuller;
use crate::benchmark::{
    read_plant_list, BenchmarkOutcome, BenchmarkRun, Evaluator, GenerationRunner,
    InProcessRunner, SubprocessRunner,
};
use crate::config::PlantCareConfig;
use crate::error::PlantCareError;
use crate::generation::{care_settings, CareGenerator};
use crate::models::LanguageModel;
use crate::provider::{create_provider, ModelProvider, ProviderRequest, ProviderResponse};
use crate::storage::InstructionStore;
use crate::types::TextStreamDelta;

use super::{parse_model, BenchmarkArgs, LocalBackend};

/// Provider that fails every call, standing in when generation cannot be set up.
///
/// Each plant then goes through the normal failure path and is stored as unknown.
struct Unavailable {
    model: String,
    reason: String,
}

#[async_trait]
impl ModelProvider for Unavailable {
    fn provider_name(&self) -> &str {
        "unavailable"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate_text(
        &self,
        _request: &ProviderRequest,
    ) -> Result<ProviderResponse, PlantCareError> {
        Err(PlantCareError::Authentication(self.reason.clone()))
    }

    async fn stream_text(
        &self,
        _request: &ProviderRequest,
    ) -> Result<BoxStream<'static, Result<TextStreamDelta, PlantCareError>>, PlantCareError> {
        Err(PlantCareError::Authentication(self.reason.clone()))
    }
}

/// Run the whole benchmark. Errors are setup failures only.
pub async fn handle_benchmark(args: BenchmarkArgs) -> Result<BenchmarkOutcome, PlantCareError> {
    let mut config = PlantCareConfig::load(args.config.as_deref())?;
    if let Some(path) = args.plants {
        config.plants_file = path;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = args.report_dir {
        config.report_dir = dir;
    }
    if let Some(model) = args.evaluation_model {
        config.evaluation_model = model;
    }
    if let Some(ms) = args.pause_ms {
        config.evaluation.pause_ms = ms;
    }
    debug!(?config, "benchmark configuration");

    let plants = read_plant_list(&config.plants_file)?;

    let store = InstructionStore::new(&config.output_dir);
    std::fs::create_dir_all(store.dir())?;

    let grading_model = parse_model(&config.evaluation_model)?;
    let grader = create_provider(&grading_model, &config)?;
    let mut grading_local = LocalBackend::for_model(&grading_model, &config, None);
    let evaluator = Evaluator::new(
        grader.as_ref(),
        &store,
        config.evaluation.max_content_chars,
    );

    let generation_model = parse_model(&config.model)?;
    let generation_provider;
    let generation_local;
    let mut subprocess;
    let mut in_process;
    let runner: &mut dyn GenerationRunner = match &args.generator_command {
        Some(program) => {
            let mut forwarded = vec![
                "--output-dir".to_string(),
                config.output_dir.display().to_string(),
                "--model".to_string(),
                config.model.clone(),
            ];
            if let Some(path) = &args.config {
                forwarded.extend(["--config".to_string(), path.display().to_string()]);
            }
            subprocess = SubprocessRunner::new(program).args(forwarded);
            &mut subprocess
        }
        None => {
            generation_provider = provider_or_unavailable(&generation_model, &config);
            generation_local = LocalBackend::for_model(
                &generation_model,
                &config,
                config.ollama.availability_sentinel.as_deref(),
            );
            let generator = CareGenerator::new(
                generation_provider.as_ref(),
                care_settings(&generation_model),
            );
            in_process = InProcessRunner::new(generator, &store);
            if let Some(local) = &generation_local {
                in_process = in_process.with_local_check(
                    local.availability.clone(),
                    &local.catalog,
                    local.puller.as_ref().map(|p| p as &dyn ModelPuller),
                );
            }
            &mut in_process
        }
    };

    BenchmarkRun {
        plants: &plants,
        store: &store,
        runner,
        evaluator: &evaluator,
        grading_readiness: grading_local.as_mut().map(LocalBackend::readiness),
        pause: Duration::from_millis(config.evaluation.pause_ms),
        report_dir: &config.report_dir,
    }
    .execute()
    .await
}

fn provider_or_unavailable(
    model: &LanguageModel,
    config: &PlantCareConfig,
) -> Box<dyn ModelProvider> {
    match create_provider(model, config) {
        Ok(provider) => provider,
        Err(e) => {
            println!("Error: {e}");
            warn!(error = %e, "generation provider unavailable");
            Box::new(Unavailable {
                model: model.model_id().to_string(),
                reason: e.to_string(),
            })
        }
    }
}
