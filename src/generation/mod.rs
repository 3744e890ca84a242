//! Care-instruction generation: prompt, one backend call, classification.

pub mod classify;
pub mod stream;

pub use classify::{classify_response, signals_unknown_plant, UNKNOWN_PLANT_PATTERNS};
pub use stream::stream_instructions;

use tracing::{debug, warn};

use crate::availability::{ModelAvailability, ModelCatalog, ModelPuller};
use crate::error::PlantCareError;
use crate::models::LanguageModel;
use crate::plant::{InstructionArtifact, PlantName};
use crate::prompt::care_prompt;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::GenerationSettings;

/// Sampling used for care instructions on `model`.
///
/// Hosted backends get temperature 0.7, top-p 1, 1024 output tokens; the
/// local server runs with its own defaults.
pub fn care_settings(model: &LanguageModel) -> GenerationSettings {
    if model.is_local() {
        GenerationSettings::default()
    } else {
        GenerationSettings::builder()
            .temperature(0.7)
            .top_p(1.0)
            .max_tokens(1024)
            .build()
    }
}

/// Asks one provider for care instructions.
pub struct CareGenerator<'a> {
    provider: &'a dyn ModelProvider,
    settings: GenerationSettings,
}

impl<'a> CareGenerator<'a> {
    pub fn new(provider: &'a dyn ModelProvider, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider(&self) -> &'a dyn ModelProvider {
        self.provider
    }

    pub(crate) fn request(&self, plant: &PlantName) -> ProviderRequest {
        ProviderRequest::new(care_prompt(plant), self.settings.clone())
    }

    /// Generate and classify. Backend failures are returned, not swallowed.
    pub async fn generate(&self, plant: &PlantName) -> Result<InstructionArtifact, PlantCareError> {
        debug!(
            plant = %plant,
            provider = self.provider.provider_name(),
            model = self.provider.model_id(),
            "requesting care instructions"
        );
        let response = self.provider.generate_text(&self.request(plant)).await?;
        let artifact = classify_response(&response.text);
        if !artifact.is_known() {
            println!("'{plant}' appears to be unknown.");
        }
        Ok(artifact)
    }
}

/// Availability check run before generating against a local server.
pub struct LocalReadiness<'a> {
    pub availability: &'a mut ModelAvailability,
    pub catalog: &'a dyn ModelCatalog,
    pub puller: Option<&'a dyn ModelPuller>,
}

impl LocalReadiness<'_> {
    /// Whether the local model can be used. Problems are printed, not returned.
    pub async fn check(&mut self) -> bool {
        match self.availability.ensure(self.catalog, self.puller).await {
            Ok(true) => true,
            Ok(false) => {
                println!(
                    "Error: model {} is not available on the local server",
                    self.availability.model()
                );
                false
            }
            Err(e) => {
                println!("Error: cannot reach the local inference server: {e}");
                warn!(model = self.availability.model(), error = %e, "availability check failed");
                false
            }
        }
    }

    /// Forget the availability answer after a connection failure or non-200 answer.
    pub fn note_failure(&mut self, error: &PlantCareError) {
        if error.is_transport() {
            self.availability.invalidate();
        }
    }
}

/// Generate for `plant`, turning every failure into [`InstructionArtifact::Unknown`].
///
/// Failures are printed and logged; nothing is returned to the caller but the
/// artifact. Transport failures invalidate the local availability cache.
pub async fn generate_or_unknown(
    generator: &CareGenerator<'_>,
    plant: &PlantName,
    readiness: Option<LocalReadiness<'_>>,
) -> InstructionArtifact {
    let mut readiness = readiness;

    if let Some(ready) = readiness.as_mut() {
        if !ready.check().await {
            return InstructionArtifact::Unknown;
        }
    }

    match generator.generate(plant).await {
        Ok(artifact) => artifact,
        Err(e) => {
            println!("Error generating instructions: {e}");
            warn!(plant = %plant, error = %e, "generation failed");
            if let Some(ready) = readiness.as_mut() {
                ready.note_failure(&e);
            }
            InstructionArtifact::Unknown
        }
    }
}
