//! Retrieval engine behavior against offline model-service doubles

mod common;

use std::sync::Arc;

use common::{
    chunk, test_config, FailingGenerator, KeywordEmbedder, RecordingGenerator,
    UnreachableGenerator,
};
use docqa::engine::RetrievalEngine;
use docqa::error::Error;

async fn engine_with(
    config: docqa::AppConfig,
    generator: Arc<dyn docqa::engine::GenerativeProvider>,
) -> RetrievalEngine {
    RetrievalEngine::connect(config, Arc::new(KeywordEmbedder), generator)
        .await
        .expect("engine connects against healthy stubs")
}

#[tokio::test]
async fn connect_fails_hard_when_service_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let result = RetrievalEngine::connect(
        test_config(&dir),
        Arc::new(KeywordEmbedder),
        Arc::new(UnreachableGenerator),
    )
    .await;

    assert!(matches!(result, Err(Error::ServiceUnreachable(_))));
}

#[tokio::test]
async fn answer_on_empty_engine_returns_the_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(test_config(&dir), Arc::new(RecordingGenerator::new("hi"))).await;

    assert!(!engine.is_ready());
    let outcome = engine.answer("anything at all?").await;
    assert!(outcome.answer.contains("No documents loaded"));
    assert!(outcome.sources.is_empty());
    assert!(!outcome.error);
}

#[tokio::test]
async fn ingest_rejects_an_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(test_config(&dir), Arc::new(RecordingGenerator::new("hi"))).await;

    let err = engine.ingest(Vec::new()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyInput(_)));
    assert!(!engine.is_ready());
}

#[tokio::test]
async fn ingest_then_stats_counts_chunks_and_grows_on_reingest() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(test_config(&dir), Arc::new(RecordingGenerator::new("hi"))).await;

    let batch = vec![
        chunk("France is a country in Europe.", "facts.txt", 0),
        chunk("Paris is its largest city.", "facts.txt", 1),
        chunk("Rust is a systems programming language.", "facts.txt", 2),
    ];

    let added = engine.ingest(batch.clone()).await.unwrap();
    assert_eq!(added, 3);
    assert!(engine.is_ready());
    assert_eq!(engine.stats(), 3);

    // Append semantics: identical content is stored again, not deduplicated
    engine.ingest(batch).await.unwrap();
    assert_eq!(engine.stats(), 6);
}

#[tokio::test]
async fn clear_then_stats_is_zero() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(test_config(&dir), Arc::new(RecordingGenerator::new("hi"))).await;

    engine
        .ingest(vec![chunk("some content", "a.txt", 0)])
        .await
        .unwrap();
    assert!(engine.stats() > 0);

    assert!(engine.clear());
    assert_eq!(engine.stats(), 0);
    assert!(!engine.is_ready());

    // Clearing an already-empty engine still succeeds
    assert!(engine.clear());
}

#[tokio::test]
async fn retrieval_surfaces_the_matching_chunk_and_prompts_with_it() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(RecordingGenerator::new(
        "The capital of France is Paris.",
    ));
    let engine = engine_with(test_config(&dir), generator.clone()).await;

    engine
        .ingest(vec![
            chunk("The capital of France is Paris.", "geography.txt", 0),
            chunk("Rust is a systems programming language.", "rust.txt", 0),
        ])
        .await
        .unwrap();

    let question = "What is the capital of France?";
    let outcome = engine.answer(question).await;

    assert!(outcome.answer.contains("Paris"));
    assert!(!outcome.error);
    assert!(!outcome.sources.is_empty());
    assert!(outcome.sources[0].content.contains("Paris"));
    assert_eq!(outcome.sources[0].metadata.filename, "geography.txt");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(question));
    assert!(prompts[0].contains("The capital of France is Paris."));
}

#[tokio::test]
async fn generation_failure_is_reported_as_data_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_with(test_config(&dir), Arc::new(FailingGenerator)).await;

    engine
        .ingest(vec![chunk("some facts", "a.txt", 0)])
        .await
        .unwrap();

    let outcome = engine.answer("what facts?").await;
    assert!(outcome.error);
    assert!(outcome.answer.starts_with("Error:"));
    assert!(outcome.answer.contains("connection reset by peer"));
    assert!(outcome.sources.is_empty());
}

#[tokio::test]
async fn persisted_collection_is_reopened_on_connect() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    {
        let engine =
            engine_with(config.clone(), Arc::new(RecordingGenerator::new("hi"))).await;
        engine
            .ingest(vec![
                chunk("first", "a.txt", 0),
                chunk("second", "a.txt", 1),
            ])
            .await
            .unwrap();
    }

    let reopened = engine_with(config, Arc::new(RecordingGenerator::new("hi"))).await;
    assert!(reopened.is_ready());
    assert_eq!(reopened.stats(), 2);
}

// Documented hazard from the design: a clear racing an answer against the
// same collection. The answer may degrade to the sentinel or an
// error-shaped outcome, but nothing may crash.
#[tokio::test]
async fn clear_racing_answer_never_crashes() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(
        engine_with(test_config(&dir), Arc::new(RecordingGenerator::new("ok"))).await,
    );

    engine
        .ingest(vec![
            chunk("The capital of France is Paris.", "a.txt", 0),
            chunk("More content here.", "a.txt", 1),
        ])
        .await
        .unwrap();

    let asker = {
        let engine = engine.clone();
        tokio::spawn(async move {
            for _ in 0..25 {
                let outcome = engine.answer("What is the capital of France?").await;
                assert!(!outcome.answer.is_empty());
            }
        })
    };

    let clearer = {
        let engine = engine.clone();
        tokio::spawn(async move {
            for _ in 0..25 {
                engine.clear();
                tokio::task::yield_now().await;
            }
        })
    };

    asker.await.expect("answer task must not panic");
    clearer.await.expect("clear task must not panic");
}
