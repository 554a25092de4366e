use crate::models::{level_diff, EvaluationOutcome, EvaluationSummary, ItemDetail, RecommendationItem};

/// Compares predicted and actual ratings across a batch.
///
/// Only items carrying an `actual_rating` count towards any metric. When no
/// item was rated the result is [`EvaluationOutcome::Error`] rather than a
/// summary, so callers can still persist a record of the run.
pub fn evaluate(items: &[RecommendationItem]) -> EvaluationOutcome {
    let details: Vec<ItemDetail> = items
        .iter()
        .filter_map(|item| {
            item.actual_rating.map(|actual| ItemDetail {
                title: item.title.clone(),
                predicted: item.predicted_rating,
                actual,
                level_diff: level_diff(item.predicted_rating, actual),
            })
        })
        .collect();

    if details.is_empty() {
        return EvaluationOutcome::no_items_rated();
    }

    let total_rated = details.len();
    let exact_match = details.iter().filter(|d| d.predicted == d.actual).count();
    let total_distance: u32 = details
        .iter()
        .map(|d| u32::from(d.level_diff.unsigned_abs()))
        .sum();

    let rate = exact_match as f64 / total_rated as f64 * 100.0;
    let avg = f64::from(total_distance) / total_rated as f64;

    tracing::debug!(total_rated, exact_match, total_distance, "Evaluation computed");

    EvaluationOutcome::Summary(EvaluationSummary {
        total_rated,
        exact_match,
        exact_match_rate: format!("{:.1}%", rate),
        avg_level_diff: format!("{:.2}", avg),
        details,
    })
}
