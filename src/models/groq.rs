//! Groq model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Groq models (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum GroqModel {
    #[strum(serialize = "llama-3.1-8b-instant")]
    Llama318bInstant,
    #[strum(serialize = "llama-3.3-70b-versatile")]
    Llama3370bVersatile,
    #[strum(serialize = "gemma2-9b-it")]
    Gemma29bIt,
    #[strum(default)]
    Custom(String),
}

impl Default for GroqModel {
    fn default() -> Self {
        Self::Llama318bInstant
    }
}

impl GroqModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Llama318bInstant => "llama-3.1-8b-instant",
            Self::Llama3370bVersatile => "llama-3.3-70b-versatile",
            Self::Gemma29bIt => "gemma2-9b-it",
            Self::Custom(s) => s,
        }
    }
}
