//! Groq and Ollama adapters against a mock HTTP server.

use std::time::Duration;

use futures::StreamExt;
use plant_care::availability::{ModelAvailability, ModelCatalog};
use plant_care::config::PlantCareConfig;
use plant_care::error::{ErrorCategory, PlantCareError};
use plant_care::generation::{care_settings, generate_or_unknown, CareGenerator, LocalReadiness};
use plant_care::models::LanguageModel;
use plant_care::plant::{InstructionArtifact, PlantName};
use plant_care::provider::ollama::OllamaProvider;
use plant_care::provider::{create_provider, ModelProvider, ProviderRequest};
use plant_care::types::GenerationSettings;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn groq_config(base_url: &str) -> PlantCareConfig {
    let mut config = PlantCareConfig::new();
    config.set_api_key("groq", "gsk-test".to_string());
    config.set_base_url("groq", base_url.to_string());
    config
}

fn ollama_config(base_url: &str) -> PlantCareConfig {
    let mut config = PlantCareConfig::new();
    config.set_base_url("ollama", base_url.to_string());
    config
}

#[tokio::test]
async fn groq_request_carries_fixed_sampling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk-test"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "stream": false,
            "temperature": 0.7,
            "top_p": 1.0,
            "max_completion_tokens": 1024
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "## Watering\nSparingly."}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model: LanguageModel = "groq:llama-3.1-8b-instant".parse().unwrap();
    let provider = create_provider(&model, &groq_config(&server.uri())).unwrap();
    assert_eq!(provider.provider_name(), "groq");

    let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));
    let artifact = generator
        .generate(&PlantName::new("Aloe Vera").unwrap())
        .await
        .unwrap();
    assert_eq!(
        artifact,
        InstructionArtifact::Known("## Watering\nSparingly.".to_string())
    );
}

#[tokio::test]
async fn groq_unauthorized_keeps_status_and_auth_category() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let model: LanguageModel = "groq:llama-3.1-8b-instant".parse().unwrap();
    let provider = create_provider(&model, &groq_config(&server.uri())).unwrap();
    let err = provider
        .generate_text(&ProviderRequest::new("hi", GenerationSettings::default()))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Authentication);
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn groq_server_error_becomes_unknown_at_the_boundary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let model: LanguageModel = "groq:llama-3.1-8b-instant".parse().unwrap();
    let provider = create_provider(&model, &groq_config(&server.uri())).unwrap();
    let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));

    let artifact =
        generate_or_unknown(&generator, &PlantName::new("Basil").unwrap(), None).await;
    assert_eq!(artifact, InstructionArtifact::Unknown);
}

#[tokio::test]
async fn groq_streams_sse_chunks() {
    let server = MockServer::start().await;
    let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"## Light\\n\"}}]}\n\n\
               data: {\"choices\":[{\"delta\":{\"content\":\"Bright.\"}}]}\n\n\
               data: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let model: LanguageModel = "groq:llama-3.1-8b-instant".parse().unwrap();
    let provider = create_provider(&model, &groq_config(&server.uri())).unwrap();
    let mut stream = provider
        .stream_text(&ProviderRequest::new("care", care_settings(&model)))
        .await
        .unwrap();

    let mut text = String::new();
    while let Some(delta) = stream.next().await {
        let delta = delta.unwrap();
        text.push_str(&delta.text);
        if delta.done {
            break;
        }
    }
    assert_eq!(text, "## Light\nBright.");
}

#[test]
fn missing_groq_key_is_reported_before_any_request() {
    let model: LanguageModel = "groq:llama-3.1-8b-instant".parse().unwrap();
    let err = match create_provider(&model, &PlantCareConfig::new()) {
        Ok(_) => panic!("expected missing key error"),
        Err(err) => err,
    };
    assert!(matches!(err, PlantCareError::Authentication(_)));
    assert!(err.to_string().contains("GROQ_API_KEY"), "unexpected error: {err}");
}

#[tokio::test]
async fn ollama_generate_sends_stream_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "tinyllama", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "tinyllama",
            "response": "## Soil\nWell-draining mix.",
            "done": true,
            "prompt_eval_count": 40,
            "eval_count": 8
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model: LanguageModel = "ollama:tinyllama".parse().unwrap();
    let provider = create_provider(&model, &ollama_config(&server.uri())).unwrap();
    let response = provider
        .generate_text(&ProviderRequest::new("care", care_settings(&model)))
        .await
        .unwrap();

    assert_eq!(response.text, "## Soil\nWell-draining mix.");
    assert_eq!(response.usage.input_tokens, 40);
    assert_eq!(response.usage.output_tokens, 8);
}

#[tokio::test]
async fn ollama_tags_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "phi3:mini"}, {"name": "tinyllama:latest"}]
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new("phi3:mini".parse().unwrap(), server.uri());
    let names = provider.list_models().await.unwrap();
    assert_eq!(names, vec!["phi3:mini", "tinyllama:latest"]);
}

#[tokio::test]
async fn ollama_generation_checks_availability_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "tinyllama:latest"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "## Water\nWeekly.",
            "done": true
        })))
        .expect(2)
        .mount(&server)
        .await;

    let model: LanguageModel = "ollama:tinyllama".parse().unwrap();
    let provider = create_provider(&model, &ollama_config(&server.uri())).unwrap();
    let catalog = OllamaProvider::new("tinyllama".parse().unwrap(), server.uri());
    let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));
    let mut availability = ModelAvailability::new("tinyllama");

    for name in ["Basil", "Fern"] {
        let readiness = LocalReadiness {
            availability: &mut availability,
            catalog: &catalog,
            puller: None,
        };
        let artifact =
            generate_or_unknown(&generator, &PlantName::new(name).unwrap(), Some(readiness)).await;
        assert!(artifact.is_known());
    }
}

#[tokio::test]
async fn ollama_streams_ndjson() {
    let server = MockServer::start().await;
    let body = "{\"response\":\"Keep \",\"done\":false}\n\
                {\"response\":\"moist.\",\"done\":false}\n\
                {\"response\":\"\",\"done\":true,\"prompt_eval_count\":3,\"eval_count\":2}\n";
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&server)
        .await;

    let model: LanguageModel = "ollama:tinyllama".parse().unwrap();
    let provider = create_provider(&model, &ollama_config(&server.uri())).unwrap();
    let mut stream = provider
        .stream_text(&ProviderRequest::new("care", GenerationSettings::default()))
        .await
        .unwrap();

    let mut text = String::new();
    let mut usage = None;
    while let Some(delta) = stream.next().await {
        let delta = delta.unwrap();
        text.push_str(&delta.text);
        if delta.done {
            usage = delta.usage;
            break;
        }
    }
    assert_eq!(text, "Keep moist.");
    assert_eq!(usage.unwrap().output_tokens, 2);
}

#[tokio::test]
async fn ollama_unreachable_is_a_transport_error() {
    let provider = OllamaProvider::new("tinyllama".parse().unwrap(), "http://127.0.0.1:9".into());
    let err = provider.list_models().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn ollama_unauthorized_generation_clears_availability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "tinyllama:latest"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(401).set_body_string("proxy auth required"))
        .mount(&server)
        .await;

    let model: LanguageModel = "ollama:tinyllama".parse().unwrap();
    let provider = create_provider(&model, &ollama_config(&server.uri())).unwrap();
    let catalog = OllamaProvider::new("tinyllama".parse().unwrap(), server.uri());
    let generator = CareGenerator::new(provider.as_ref(), care_settings(&model));
    let mut availability = ModelAvailability::new("tinyllama");

    let readiness = LocalReadiness {
        availability: &mut availability,
        catalog: &catalog,
        puller: None,
    };
    let artifact =
        generate_or_unknown(&generator, &PlantName::new("Basil").unwrap(), Some(readiness)).await;

    assert_eq!(artifact, InstructionArtifact::Unknown);
    assert!(!availability.is_confirmed());
}

#[tokio::test]
async fn ollama_waits_for_slow_answers_unless_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "PASS: accurate.", "done": true}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let request = ProviderRequest::new("grade", GenerationSettings::default());

    let unbounded = OllamaProvider::new("phi3:mini".parse().unwrap(), server.uri());
    let response = unbounded.generate_text(&request).await.unwrap();
    assert_eq!(response.text, "PASS: accurate.");

    let bounded = OllamaProvider::new("phi3:mini".parse().unwrap(), server.uri())
        .with_timeout(Some(Duration::from_millis(50)));
    let err = bounded.generate_text(&request).await.unwrap_err();
    assert!(matches!(err, PlantCareError::Network(_)));
}
