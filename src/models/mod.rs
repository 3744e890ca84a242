//! Model definitions and selection.

pub mod selector;

#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "ollama")]
pub mod ollama;

pub use selector::ModelSelector;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level language model enum, dispatching to backend-specific variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    #[cfg(feature = "groq")]
    Groq(groq::GroqModel),
    #[cfg(feature = "ollama")]
    Ollama(ollama::OllamaModel),
    /// Model on a backend without a built-in provider.
    Custom { provider: String, model_id: String },
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            #[cfg(feature = "groq")]
            Self::Groq(m) => m.as_str(),
            #[cfg(feature = "ollama")]
            Self::Ollama(m) => m.as_str(),
            Self::Custom { model_id, .. } => model_id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            #[cfg(feature = "groq")]
            Self::Groq(_) => "groq",
            #[cfg(feature = "ollama")]
            Self::Ollama(_) => "ollama",
            Self::Custom { provider, .. } => provider,
        }
    }

    /// Whether the model is served by a same-host inference server.
    pub fn is_local(&self) -> bool {
        self.provider_name() == "ollama"
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}
