use std::error::Error;
use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::application::use_cases::embedding_store::EmbeddingStore;
use crate::application::use_cases::nl_service::NlModel;
use crate::domain::error::AppError;
use crate::infrastructure::blob_store::{BlobSource, GcsBlobSource, LocalBlobSource};
use crate::infrastructure::config::{AppConfig, BlobSourceKind};
use crate::infrastructure::embedder::{FastEmbedEncoder, SentenceEmbedder};
use crate::infrastructure::ner_client::{EntityRecognizer, HttpEntityRecognizer};
use crate::interfaces::http::{start_server, HttpState};

pub fn run() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        err
    })?;
    let deployment = config.deployment_flags()?;

    // Both clients block; build them before the async runtime starts.
    let embedder: Arc<dyn SentenceEmbedder> =
        Arc::new(FastEmbedEncoder::new(&config.embeddings.model_name)?);
    info!(model = embedder.model_name(), top_k = config.embeddings.top_k, "Query encoder loaded");
    let ner: Arc<dyn EntityRecognizer> = Arc::new(HttpEntityRecognizer::new(
        &config.ner.endpoint,
        config.ner.timeout_secs,
    )?);

    actix_web::rt::System::new().block_on(async move {
        let source = blob_source(&config)?;
        let store = EmbeddingStore::load(source.as_ref(), &config.embeddings)
            .await
            .map_err(|err| {
                error!(error = %err, "Failed to load embeddings");
                err
            })?;
        info!(builds = ?store.build_names(), "Embeddings loaded");

        let model = NlModel::new(embedder, ner, Arc::new(store)).with_top_k(config.embeddings.top_k);
        let state = HttpState {
            model: Arc::new(model),
            deployment,
            default_build: config.embeddings.default_build.clone(),
            logs: Arc::new(Mutex::new(Vec::new())),
        };

        info!(host = %config.server.host, port = config.server.port, "Starting HTTP server");
        start_server(state, &config.server.host, config.server.port)?.await?;
        Ok::<(), Box<dyn Error>>(())
    })
}

fn blob_source(config: &AppConfig) -> std::result::Result<Box<dyn BlobSource>, AppError> {
    match config.embeddings.source {
        BlobSourceKind::Gcs => Ok(Box::new(GcsBlobSource::from_env(&config.embeddings.bucket))),
        BlobSourceKind::Local => {
            let dir = config.embeddings.local_dir.clone().ok_or_else(|| {
                AppError::ConfigError("embeddings.local_dir is not set".to_string())
            })?;
            Ok(Box::new(LocalBlobSource::new(dir)))
        }
    }
}
