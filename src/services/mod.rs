pub mod collector;
pub mod evaluation;
pub mod evaluator;
pub mod prompt;
pub mod providers;
pub mod recommendations;

pub use collector::{RatingCollector, RatingResponse};
pub use evaluation::{EvaluationEngine, EvaluationRun};
pub use evaluator::evaluate;
pub use prompt::{load_prompt, split_prompt, PromptPair};
pub use recommendations::{parse_recommendations, RecommendationBatch, RecommendationService};
