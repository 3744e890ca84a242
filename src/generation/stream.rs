//! Streaming care generation for console output.

use futures::StreamExt;

use crate::error::PlantCareError;
use crate::plant::{InstructionArtifact, PlantName};
use crate::types::Usage;

use super::{classify_response, CareGenerator};

/// Stream instructions for `plant`, handing each text chunk to `on_text`.
///
/// Classification runs on the full text once the stream ends.
pub async fn stream_instructions(
    generator: &CareGenerator<'_>,
    plant: &PlantName,
    mut on_text: impl FnMut(&str),
) -> Result<(InstructionArtifact, Usage), PlantCareError> {
    let mut stream = generator
        .provider()
        .stream_text(&generator.request(plant))
        .await?;

    let mut text = String::new();
    let mut usage = Usage::default();

    while let Some(delta) = stream.next().await {
        let delta = delta?;
        if !delta.text.is_empty() {
            on_text(&delta.text);
            text.push_str(&delta.text);
        }
        if let Some(u) = delta.usage {
            usage = u;
        }
        if delta.done {
            break;
        }
    }

    Ok((classify_response(&text), usage))
}
