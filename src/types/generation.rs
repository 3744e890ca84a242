//! Generation settings.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Sampling settings forwarded to a backend. Unset fields are omitted from the request.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl GenerationSettings {
    /// True when no sampling field is set.
    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_only_given_fields() {
        let settings = GenerationSettings::builder()
            .temperature(0.7)
            .max_tokens(1024)
            .build();
        assert_eq!(settings.temperature, Some(0.7));
        assert_eq!(settings.max_tokens, Some(1024));
        assert!(settings.top_p.is_none());
        assert!(!settings.is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert!(GenerationSettings::default().is_empty());
    }
}
