//! Care generation against mock backends.

mod common;

use common::{MockProvider, StaticCatalog, ALOE_BODY};
use plant_care::availability::ModelAvailability;
use plant_care::generation::{
    generate_or_unknown, stream_instructions, CareGenerator, LocalReadiness,
};
use plant_care::plant::{InstructionArtifact, PlantName};
use plant_care::types::GenerationSettings;

fn plant(name: &str) -> PlantName {
    PlantName::new(name).unwrap()
}

#[tokio::test]
async fn known_plant_keeps_full_body() {
    let provider = MockProvider::new("mock").respond_when("Aloe Vera", ALOE_BODY);
    let generator = CareGenerator::new(&provider, GenerationSettings::default());

    let artifact = generator.generate(&plant("Aloe Vera")).await.unwrap();
    assert_eq!(artifact, InstructionArtifact::Known(ALOE_BODY.to_string()));

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("the plant known as 'Aloe Vera'"));
}

#[tokio::test]
async fn flagged_response_becomes_unknown() {
    let provider = MockProvider::new("mock")
        .respond_when("Zzyzx", "I'm sorry, but 'Zzyzx Nonplant' is not a known plant.");
    let generator = CareGenerator::new(&provider, GenerationSettings::default());

    let artifact = generator.generate(&plant("Zzyzx Nonplant")).await.unwrap();
    assert_eq!(artifact, InstructionArtifact::Unknown);
}

#[tokio::test]
async fn generate_returns_backend_error() {
    let provider = MockProvider::new("mock").fail_when("Basil", 500);
    let generator = CareGenerator::new(&provider, GenerationSettings::default());

    let err = generator.generate(&plant("Basil")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn pipeline_boundary_swallows_errors() {
    let provider = MockProvider::new("mock").fail_when("Basil", 503);
    let generator = CareGenerator::new(&provider, GenerationSettings::default());

    let artifact = generate_or_unknown(&generator, &plant("Basil"), None).await;
    assert_eq!(artifact, InstructionArtifact::Unknown);
}

#[tokio::test]
async fn transport_failure_invalidates_local_availability() {
    let provider = MockProvider::new("tinyllama").fail_when("Basil", 500);
    let generator = CareGenerator::new(&provider, GenerationSettings::default());
    let catalog = StaticCatalog(vec!["tinyllama:latest".to_string()]);
    let dir = tempfile::TempDir::new().unwrap();
    let sentinel = dir.path().join(".tinyllama_available");
    let mut availability = ModelAvailability::with_sentinel("tinyllama", &sentinel);

    let readiness = LocalReadiness {
        availability: &mut availability,
        catalog: &catalog,
        puller: None,
    };
    let artifact = generate_or_unknown(&generator, &plant("Basil"), Some(readiness)).await;

    assert_eq!(artifact, InstructionArtifact::Unknown);
    assert!(!availability.is_confirmed());
    assert!(!sentinel.exists());
}

#[tokio::test]
async fn confirmed_local_model_is_used() {
    let provider = MockProvider::new("tinyllama").respond_when("Fern", "## Water\nKeep moist.");
    let generator = CareGenerator::new(&provider, GenerationSettings::default());
    let catalog = StaticCatalog(vec!["tinyllama:latest".to_string()]);
    let mut availability = ModelAvailability::new("tinyllama");

    let readiness = LocalReadiness {
        availability: &mut availability,
        catalog: &catalog,
        puller: None,
    };
    let artifact = generate_or_unknown(&generator, &plant("Fern"), Some(readiness)).await;

    assert!(artifact.is_known());
    assert!(availability.is_confirmed());
}

#[tokio::test]
async fn missing_local_model_skips_the_backend() {
    let provider = MockProvider::new("tinyllama");
    let generator = CareGenerator::new(&provider, GenerationSettings::default());
    let catalog = StaticCatalog(vec!["mistral:latest".to_string()]);
    let mut availability = ModelAvailability::new("tinyllama");

    let readiness = LocalReadiness {
        availability: &mut availability,
        catalog: &catalog,
        puller: None,
    };
    let artifact = generate_or_unknown(&generator, &plant("Fern"), Some(readiness)).await;

    assert_eq!(artifact, InstructionArtifact::Unknown);
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn streamed_chunks_reassemble_and_classify() {
    let provider = MockProvider::new("mock").respond_when("Aloe Vera", ALOE_BODY);
    let generator = CareGenerator::new(&provider, GenerationSettings::default());

    let mut seen = String::new();
    let (artifact, usage) = stream_instructions(&generator, &plant("Aloe Vera"), |chunk| {
        seen.push_str(chunk)
    })
    .await
    .unwrap();

    assert_eq!(seen, ALOE_BODY);
    assert_eq!(artifact, InstructionArtifact::Known(ALOE_BODY.to_string()));
    assert_eq!(usage.output_tokens, 20);
}

#[tokio::test]
async fn streamed_unknown_plant_is_classified_at_the_end() {
    let provider = MockProvider::new("mock")
        .respond_when("Zzyzx", "Sorry, I am unable to identify this plant.");
    let generator = CareGenerator::new(&provider, GenerationSettings::default());

    let (artifact, _) = stream_instructions(&generator, &plant("Zzyzx"), |_| {})
        .await
        .unwrap();
    assert_eq!(artifact, InstructionArtifact::Unknown);
}
