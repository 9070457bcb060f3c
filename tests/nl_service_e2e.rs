mod helpers;

use datacommons_nl::application::use_cases::embedding_store::EmbeddingStore;
use datacommons_nl::application::use_cases::nl_service::NlModel;
use datacommons_nl::domain::error::AppError;
use datacommons_nl::infrastructure::blob_store::LocalBlobSource;
use datacommons_nl::infrastructure::config::{AppConfig, BlobSourceKind};
use helpers::{write_bucket, GazetteerRecognizer, KeywordEmbedder};
use std::sync::Arc;

fn config_for(bucket: &std::path::Path, scratch: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.embeddings.source = BlobSourceKind::Local;
    config.embeddings.local_dir = Some(bucket.to_path_buf());
    config.embeddings.scratch_dir = scratch.to_path_buf();
    config.embeddings.builds = vec!["combined_all".to_string(), "demographics300".to_string()];
    config
}

async fn load_model() -> (NlModel, tempfile::TempDir, tempfile::TempDir) {
    let bucket = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    write_bucket(bucket.path());
    let config = config_for(bucket.path(), scratch.path());

    let source = LocalBlobSource::new(bucket.path());
    let store = EmbeddingStore::load(&source, &config.embeddings).await.unwrap();
    let model = NlModel::new(
        Arc::new(KeywordEmbedder),
        Arc::new(GazetteerRecognizer),
        Arc::new(store),
    );
    (model, bucket, scratch)
}

#[tokio::test]
async fn test_store_loads_every_configured_build() {
    let (model, _bucket, scratch) = load_model().await;
    assert_eq!(
        model.store().build_names(),
        vec!["combined_all", "demographics300"]
    );
    assert!(scratch.path().join("embeddings_combined_all.csv").exists());
}

#[tokio::test]
async fn test_detect_svs_merges_shared_dcids() {
    let (model, _bucket, _scratch) = load_model().await;
    let result = model
        .detect_svs("how many people live here", "combined_all")
        .unwrap();

    assert_eq!(
        result.svs,
        vec!["Count_Person", "Count_Person_Male", "Median_Age_Person"]
    );
    // Count_Person appears in two rows; the exact match row wins.
    assert!((result.scores[0] - 1.0).abs() < 1e-5);
    assert!(result.scores[1] < result.scores[0]);
    assert!(result.scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_detect_svs_uses_requested_build() {
    let (model, _bucket, _scratch) = load_model().await;
    let result = model.detect_svs("people", "demographics300").unwrap();
    assert_eq!(result.svs, vec!["Count_Household"]);
}

#[tokio::test]
async fn test_detect_svs_unknown_build_fails() {
    let (model, _bucket, _scratch) = load_model().await;
    let err = model.detect_svs("people", "uncurated3000").unwrap_err();
    assert_eq!(err, AppError::UnknownBuild("uncurated3000".to_string()));
}

#[tokio::test]
async fn test_detect_place_prefers_geopolitical_entities() {
    let (model, _bucket, _scratch) = load_model().await;
    assert_eq!(
        model
            .detect_place("flights from SFO to California and Texas")
            .unwrap(),
        vec!["California", "Texas"]
    );
    assert_eq!(model.detect_place("delays at SFO").unwrap(), vec!["SFO"]);
    assert!(model.detect_place("median age").unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_build_file_fails_load() {
    let bucket = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    write_bucket(bucket.path());
    let mut config = config_for(bucket.path(), scratch.path());
    config.embeddings.builds.push("uncurated3000".to_string());

    let source = LocalBlobSource::new(bucket.path());
    let err = EmbeddingStore::load(&source, &config.embeddings)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::IoError(_)));
}
