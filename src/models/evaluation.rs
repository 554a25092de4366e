use serde::{Deserialize, Serialize};

use super::{Rating, RecommendationItem};

/// Message stored when a run finishes without any rated items
pub const NO_ITEMS_RATED: &str = "No items were rated.";

/// Per-item comparison of prediction and reality
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDetail {
    pub title: String,
    pub predicted: Rating,
    pub actual: Rating,
    /// `index(predicted) - index(actual)`
    pub level_diff: i8,
}

/// Accuracy and calibration over the rated subset of a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub total_rated: usize,
    pub exact_match: usize,
    /// Percentage with one decimal place, e.g. `"66.7%"`
    pub exact_match_rate: String,
    /// Mean absolute level difference with two decimal places, e.g. `"0.33"`
    pub avg_level_diff: String,
    pub details: Vec<ItemDetail>,
}

/// Result of evaluating a batch: either a summary or the reason there is none
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EvaluationOutcome {
    Summary(EvaluationSummary),
    Error { error: String },
}

impl EvaluationOutcome {
    /// Outcome recorded when the viewer skipped every item
    pub fn no_items_rated() -> Self {
        EvaluationOutcome::Error {
            error: NO_ITEMS_RATED.to_string(),
        }
    }

    pub fn summary(&self) -> Option<&EvaluationSummary> {
        match self {
            EvaluationOutcome::Summary(summary) => Some(summary),
            EvaluationOutcome::Error { .. } => None,
        }
    }
}

/// Immutable record of one evaluation run, written once and never updated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationSnapshot {
    /// File name (no directory) of the batch that was evaluated
    pub source: String,
    /// Run timestamp, `YYYYmmdd_HHMMSS`
    pub evaluated_at: String,
    pub summary: EvaluationOutcome,
    pub recommendations: Vec<RecommendationItem>,
}
