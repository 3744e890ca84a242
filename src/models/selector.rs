//! Model selection and parsing.

use std::str::FromStr;

use super::LanguageModel;
use crate::error::PlantCareError;

/// Parse a "provider:model" string into a LanguageModel.
pub struct ModelSelector;

impl ModelSelector {
    /// Parse "provider:model_id" into a LanguageModel.
    ///
    /// Splits at the first `:`, so "ollama:phi3:mini" keeps its tag.
    pub fn parse(s: &str) -> Result<LanguageModel, PlantCareError> {
        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            PlantCareError::InvalidArgument(format!(
                "Invalid model selector '{s}': expected 'provider:model_id'"
            ))
        })?;

        if model_id.is_empty() {
            return Err(PlantCareError::InvalidArgument(format!(
                "Invalid model selector '{s}': model id is empty"
            )));
        }

        match provider {
            #[cfg(feature = "groq")]
            "groq" => {
                use super::groq::GroqModel;
                let m = GroqModel::from_str(model_id)
                    .unwrap_or(GroqModel::Custom(model_id.to_string()));
                Ok(LanguageModel::Groq(m))
            }
            #[cfg(feature = "ollama")]
            "ollama" => {
                use super::ollama::OllamaModel;
                let m = OllamaModel::from_str(model_id)
                    .unwrap_or(OllamaModel::Custom(model_id.to_string()));
                Ok(LanguageModel::Ollama(m))
            }
            _ => Ok(LanguageModel::Custom {
                provider: provider.to_string(),
                model_id: model_id.to_string(),
            }),
        }
    }
}

impl FromStr for LanguageModel {
    type Err = PlantCareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSelector::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "groq")]
    #[test]
    fn parse_groq_model() {
        let model = ModelSelector::parse("groq:llama-3.1-8b-instant").unwrap();
        assert_eq!(model.provider_name(), "groq");
        assert_eq!(model.model_id(), "llama-3.1-8b-instant");
        assert!(!model.is_local());
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn parse_ollama_model_keeps_tag() {
        let model = ModelSelector::parse("ollama:phi3:mini").unwrap();
        assert_eq!(model.provider_name(), "ollama");
        assert_eq!(model.model_id(), "phi3:mini");
        assert!(model.is_local());
    }

    #[test]
    fn parse_unknown_provider_becomes_custom() {
        let model = ModelSelector::parse("somecloud:my-model").unwrap();
        assert_eq!(model.provider_name(), "somecloud");
        assert_eq!(model.model_id(), "my-model");
    }

    #[test]
    fn parse_missing_colon_is_error() {
        assert!(ModelSelector::parse("tinyllama").is_err());
    }

    #[test]
    fn parse_empty_model_is_error() {
        assert!(ModelSelector::parse("groq:").is_err());
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn roundtrip_display_parse() {
        let model = ModelSelector::parse("ollama:tinyllama").unwrap();
        let parsed: LanguageModel = model.to_string().parse().unwrap();
        assert_eq!(parsed, model);
    }
}
