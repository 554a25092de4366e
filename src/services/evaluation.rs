use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use chrono::NaiveDateTime;

use crate::{
    error::AppResult,
    models::EvaluationSnapshot,
    services::{collector::RatingCollector, evaluator::evaluate},
    storage::{file_name_of, format_timestamp, SnapshotStore},
};

/// Outcome of one evaluation run
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub snapshot: EvaluationSnapshot,
}

/// Drives an interactive evaluation of the newest recommendation batch
pub struct EvaluationEngine<'a> {
    store: &'a SnapshotStore,
}

impl<'a> EvaluationEngine<'a> {
    pub fn new(store: &'a SnapshotStore) -> Self {
        Self { store }
    }

    /// Loads the latest batch, collects ratings from `input`, and writes a
    /// new snapshot stamped with `clock()` as read once rating is finished.
    ///
    /// Nothing is written unless every item has been answered. A run where
    /// every item was skipped still produces a snapshot holding the error
    /// summary.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
        clock: impl Fn() -> NaiveDateTime,
    ) -> AppResult<EvaluationRun> {
        let (source_path, mut items) = self.store.latest_batch()?;
        writeln!(
            output,
            "Loaded: {} ({} items)",
            source_path.display(),
            items.len()
        )?;

        RatingCollector::new(input, &mut output).collect(&mut items)?;

        let summary = evaluate(&items);
        writeln!(output, "=== Evaluation Summary ===")?;
        writeln!(output, "{}", serde_json::to_string_pretty(&summary)?)?;

        let snapshot = EvaluationSnapshot {
            source: file_name_of(&source_path),
            evaluated_at: format_timestamp(clock()),
            summary,
            recommendations: items,
        };
        let output_path = self.store.write_evaluation(&snapshot)?;
        writeln!(output, "\n=== Saved to {} ===", output_path.display())?;

        Ok(EvaluationRun {
            source_path,
            output_path,
            snapshot,
        })
    }
}
