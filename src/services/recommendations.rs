use std::{io::Write, path::PathBuf, sync::Arc};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::RecommendationItem,
    services::{
        prompt::{preview, PromptPair},
        providers::RecommendationProvider,
    },
    storage::SnapshotStore,
};

const SYSTEM_PREVIEW_CHARS: usize = 200;

/// An upstream entry that did not match the recommendation shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedItem {
    /// Position in the model's array
    pub index: usize,
    pub reason: String,
}

/// Validated model output: accepted items in ranking order plus what was dropped
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationBatch {
    pub items: Vec<RecommendationItem>,
    pub rejected: Vec<RejectedItem>,
}

/// Turns the model's raw reply into a validated batch.
///
/// The reply must be a JSON array, optionally wrapped in a Markdown code
/// fence. Each element is checked on its own; bad elements are reported in
/// `rejected` and the rest are kept. A reply that yields no usable item is an
/// error, never an empty batch.
pub fn parse_recommendations(raw: &str) -> AppResult<RecommendationBatch> {
    let body = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::MalformedResponse(format!("response is not valid JSON: {}", e)))?;

    let Value::Array(entries) = value else {
        return Err(AppError::MalformedResponse(
            "response is not a JSON array".to_string(),
        ));
    };

    if entries.is_empty() {
        return Err(AppError::MalformedResponse(
            "response contains no recommendations".to_string(),
        ));
    }

    let total = entries.len();
    let mut items = Vec::with_capacity(total);
    let mut rejected = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<RecommendationItem>(entry) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Rejected malformed recommendation");
                rejected.push(RejectedItem {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    if items.is_empty() {
        return Err(AppError::MalformedResponse(format!(
            "none of the {} recommendations were valid (first problem: {})",
            total, rejected[0].reason
        )));
    }

    Ok(RecommendationBatch { items, rejected })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Produces recommendation batches from a viewer profile
///
/// The provider is injected so that the service can run against a fake in
/// tests.
pub struct RecommendationService {
    provider: Arc<dyn RecommendationProvider>,
}

impl RecommendationService {
    pub fn new(provider: Arc<dyn RecommendationProvider>) -> Self {
        Self { provider }
    }

    /// Asks the model for recommendations and validates the reply
    pub async fn get_recommendations(&self, prompt: &PromptPair) -> AppResult<RecommendationBatch> {
        let raw = self.provider.complete(&prompt.system, &prompt.user).await?;
        let batch = parse_recommendations(&raw)?;

        tracing::info!(
            provider = self.provider.name(),
            accepted = batch.items.len(),
            rejected = batch.rejected.len(),
            "Recommendations parsed"
        );

        Ok(batch)
    }

    /// Runs the whole producer stage: request, print, save.
    ///
    /// The batch file is stamped with `clock()` once the model has replied.
    /// Returns the path of the new batch file.
    pub async fn produce<W: Write>(
        &self,
        prompt: &PromptPair,
        store: &SnapshotStore,
        mut output: W,
        clock: impl Fn() -> NaiveDateTime,
    ) -> AppResult<PathBuf> {
        writeln!(output, "=== System Prompt ===")?;
        writeln!(output, "{}...\n", preview(&prompt.system, SYSTEM_PREVIEW_CHARS))?;
        writeln!(output, "=== Sending to {} ===\n", self.provider.name())?;

        let batch = self.get_recommendations(prompt).await?;

        writeln!(output, "=== Recommendations ===")?;
        writeln!(output, "{}", serde_json::to_string_pretty(&batch.items)?)?;
        for rejected in &batch.rejected {
            writeln!(
                output,
                "Skipped entry {}: {}",
                rejected.index + 1,
                rejected.reason
            )?;
        }

        let path = store.write_batch_at(&batch.items, clock())?;
        writeln!(output, "\n=== Saved to {} ===", path.display())?;

        Ok(path)
    }
}
