//! Ollama local model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Models served by a local Ollama instance. Names include the tag when one is pinned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum OllamaModel {
    #[strum(serialize = "tinyllama")]
    TinyLlama,
    #[strum(serialize = "phi3:mini")]
    Phi3Mini,
    #[strum(serialize = "llama3.1")]
    Llama31,
    #[strum(serialize = "mistral")]
    Mistral,
    #[strum(default)]
    Custom(String),
}

impl OllamaModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::TinyLlama => "tinyllama",
            Self::Phi3Mini => "phi3:mini",
            Self::Llama31 => "llama3.1",
            Self::Mistral => "mistral",
            Self::Custom(s) => s,
        }
    }
}
