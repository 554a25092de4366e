use std::{fs, io::Cursor, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use watch_eval::{
    error::{AppError, AppResult},
    models::{EvaluationOutcome, Rating},
    services::{
        providers::RecommendationProvider, split_prompt, EvaluationEngine, RecommendationService,
    },
    storage::SnapshotStore,
};

/// Provider that replays a canned model reply
struct FakeProvider {
    reply: String,
}

#[async_trait::async_trait]
impl RecommendationProvider for FakeProvider {
    async fn complete(&self, _system: &str, _user: &str) -> AppResult<String> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

const TEMPLATE: &str = "[SYSTEM]\nRecommend four shows as a JSON array.\n[USER WATCH PROFILE]\nLoved: Dark\n";

fn model_reply() -> String {
    json!([
        {"title": "Severance", "predicted_rating": "very_liked", "reasoning": "Mind-bending workplace mystery", "genre": "thriller"},
        {"title": "Friends", "predicted_rating": "disliked"},
        {"title": "1899", "predicted_rating": "liked", "reasoning": "Same creators as Dark"},
        {"title": "Broken", "predicted_rating": "hated"},
        {"title": "The Crown", "predicted_rating": "okay_neutral"}
    ])
    .to_string()
}

async fn produce(store: &SnapshotStore, reply: String, when: NaiveDateTime) -> AppResult<std::path::PathBuf> {
    let service = RecommendationService::new(Arc::new(FakeProvider { reply }));
    let prompt = split_prompt(TEMPLATE)?;
    service.produce(&prompt, store, Vec::new(), move || when).await
}

#[tokio::test]
async fn test_produce_then_evaluate() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("outputs"));

    let batch_path = produce(&store, model_reply(), at(19, 0, 0)).await.unwrap();
    let batch: Value = serde_json::from_str(&fs::read_to_string(&batch_path).unwrap()).unwrap();
    // The malformed entry is dropped, the rest keep their order
    let titles: Vec<&str> = batch
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Severance", "Friends", "1899", "The Crown"]);

    let input = "very_liked\nnope\n  Liked \nskip\nDISLIKED\n";
    let run = EvaluationEngine::new(&store)
        .run(Cursor::new(input), Vec::new(), || at(21, 30, 0))
        .unwrap();

    assert_eq!(run.source_path, batch_path);
    let summary = run.snapshot.summary.summary().unwrap();
    assert_eq!(summary.total_rated, 3);
    assert_eq!(summary.exact_match, 1);
    assert_eq!(summary.exact_match_rate, "33.3%");
    // Severance 0, Friends 3-1 = 2, The Crown 2-3 = -1
    assert_eq!(summary.avg_level_diff, "1.00");
    let diffs: Vec<(&str, i8)> = summary
        .details
        .iter()
        .map(|d| (d.title.as_str(), d.level_diff))
        .collect();
    assert_eq!(diffs, vec![("Severance", 0), ("Friends", 2), ("The Crown", -1)]);

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&run.output_path).unwrap()).unwrap();
    assert_eq!(written["source"], "recommendations_20261019_190000.json");
    assert_eq!(written["evaluated_at"], "20261019_213000");
    assert_eq!(written["summary"]["exact_match_rate"], "33.3%");
    assert_eq!(written["recommendations"][0]["genre"], "thriller");
    assert_eq!(written["recommendations"][1]["actual_rating"], "liked");
    assert_eq!(written["recommendations"][2]["actual_rating"], Value::Null);
    assert_eq!(written["summary"]["details"][2]["level_diff"], -1);
}

#[tokio::test]
async fn test_snapshot_reload_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    produce(&store, model_reply(), at(8, 0, 0)).await.unwrap();

    let run = EvaluationEngine::new(&store)
        .run(Cursor::new("liked\nliked\nliked\nliked\n"), Vec::new(), || at(9, 0, 0))
        .unwrap();

    let reloaded = store.read_evaluation(&run.output_path).unwrap();
    assert_eq!(reloaded, run.snapshot);
    assert_eq!(reloaded.recommendations[0].predicted_rating, Rating::VeryLiked);
    assert_eq!(
        reloaded.recommendations[0].reasoning.as_deref(),
        Some("Mind-bending workplace mystery")
    );
}

#[tokio::test]
async fn test_evaluations_in_same_second_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    produce(&store, model_reply(), at(8, 0, 0)).await.unwrap();

    let engine = EvaluationEngine::new(&store);
    let first = engine
        .run(Cursor::new("skip\nskip\nskip\nskip\n"), Vec::new(), || at(9, 0, 0))
        .unwrap();
    let second = engine
        .run(Cursor::new("liked\nliked\nliked\nliked\n"), Vec::new(), || at(9, 0, 0))
        .unwrap();

    assert_ne!(first.output_path, second.output_path);
    assert_eq!(
        store.read_evaluation(&first.output_path).unwrap().summary,
        EvaluationOutcome::no_items_rated()
    );
    assert!(store
        .read_evaluation(&second.output_path)
        .unwrap()
        .summary
        .summary()
        .is_some());
}

#[tokio::test]
async fn test_newest_batch_is_evaluated() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    produce(&store, json!([{"title": "Old", "predicted_rating": "liked"}]).to_string(), at(7, 0, 0))
        .await
        .unwrap();
    produce(&store, json!([{"title": "New", "predicted_rating": "liked"}]).to_string(), at(7, 0, 1))
        .await
        .unwrap();

    let run = EvaluationEngine::new(&store)
        .run(Cursor::new("liked\n"), Vec::new(), || at(10, 0, 0))
        .unwrap();
    assert_eq!(run.snapshot.recommendations[0].title, "New");
    assert_eq!(run.snapshot.source, "recommendations_20261019_070001.json");
}

#[tokio::test]
async fn test_malformed_reply_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());

    let err = produce(&store, "I'd recommend Dark!".to_string(), at(7, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));

    let err = EvaluationEngine::new(&store)
        .run(Cursor::new(""), Vec::new(), || at(7, 0, 1))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
