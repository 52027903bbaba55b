//! Intent classification for incoming utterances

use crate::agent::Intent;
use crate::error::Result;
use crate::prompts;
use crate::providers::{Message, Provider};

/// Classify the latest user utterance into an intent label
///
/// Sends the fixed routing instructions plus the utterance to the provider
/// and normalizes its single-token answer. Any answer outside the label set
/// degrades to [`Intent::Chat`]; that fallback is the only local recovery,
/// so a degraded classification never surfaces as an error.
///
/// # Errors
///
/// Returns error only when the provider call itself fails
pub async fn classify(provider: &dyn Provider, text: &str) -> Result<Intent> {
    let messages = vec![
        Message::system(prompts::ROUTER_INSTRUCTIONS),
        Message::user(text),
    ];

    let response = provider.complete(&messages).await?;
    let label = response.text().trim().to_lowercase();

    let intent = Intent::from_label(&label).unwrap_or(Intent::Chat);
    tracing::debug!(label = %label, intent = %intent, "Classified utterance");

    Ok(intent)
}
