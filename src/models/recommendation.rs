use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Rating;

/// A single recommended title, in ranking order within its batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    /// Name of the recommended movie or show
    pub title: String,
    /// Rating the model expects the viewer to give
    pub predicted_rating: Rating,
    /// Model's justification, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Viewer's real reaction; `None` until rated or when skipped
    #[serde(default)]
    pub actual_rating: Option<Rating>,
    /// Any other fields the model returned, kept so a reload is lossless
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecommendationItem {
    /// Creates an unrated recommendation
    pub fn new(title: impl Into<String>, predicted_rating: Rating) -> Self {
        Self {
            title: title.into(),
            predicted_rating,
            reasoning: None,
            actual_rating: None,
            extra: Map::new(),
        }
    }

    /// Attaches the model's reasoning
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}
