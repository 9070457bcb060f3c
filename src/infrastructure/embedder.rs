use crate::domain::error::{AppError, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;
use tracing::info;

pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Sentence embedding model that maps a query into the builds' vector space.
pub trait SentenceEmbedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn model_name(&self) -> &str;
}

/// Local ONNX sentence-transformer served through fastembed.
pub struct FastEmbedEncoder {
    name: String,
    model: Mutex<TextEmbedding>,
}

impl FastEmbedEncoder {
    pub fn new(model_name: &str) -> Result<Self> {
        let model = Self::resolve_model(model_name)?;
        let mut options = InitOptions::default();
        options.model_name = model;
        let embedder = TextEmbedding::try_new(options).map_err(|e| {
            AppError::ModelError(format!("Failed to init embedder {}: {}", model_name, e))
        })?;
        info!(model = model_name, "Sentence embedding model ready");
        Ok(Self {
            name: model_name.to_string(),
            model: Mutex::new(embedder),
        })
    }

    fn resolve_model(model_name: &str) -> Result<EmbeddingModel> {
        match model_name
            .trim()
            .trim_start_matches("sentence-transformers/")
            .to_lowercase()
            .as_str()
        {
            "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            other => Err(AppError::ModelError(format!(
                "Unsupported embedding model: {}",
                other
            ))),
        }
    }
}

impl SentenceEmbedder for FastEmbedEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| AppError::Internal("Embedding model lock poisoned".to_string()))?;
        let embeddings = model
            .embed(vec![text.to_string()], None)
            .map_err(|e| AppError::ModelError(format!("Failed to embed text: {}", e)))?;
        let embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ModelError("Empty embedding response".to_string()))?;
        if embedding.is_empty() {
            return Err(AppError::ModelError("Empty embedding response".to_string()));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
