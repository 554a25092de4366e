pub mod evaluation;
pub mod rating;
pub mod recommendation;

pub use evaluation::{
    EvaluationOutcome, EvaluationSnapshot, EvaluationSummary, ItemDetail, NO_ITEMS_RATED,
};
pub use rating::{level_diff, ParseRatingError, Rating};
pub use recommendation::RecommendationItem;
