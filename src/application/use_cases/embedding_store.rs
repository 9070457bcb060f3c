use crate::domain::error::{AppError, Result};
use crate::domain::nl::{BuildEmbeddings, SearchHit};
use crate::infrastructure::blob_store::{download_all, BlobSource};
use crate::infrastructure::config::EmbeddingsConfig;
use crate::infrastructure::csv::EmbeddingsCsvParser;
use crate::infrastructure::storage::{embeddings_file, ensure_scratch_dir};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

impl BuildEmbeddings {
    /// Exact cosine scan; best `top_k` rows, descending, ties in row order.
    pub fn semantic_search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        if query_embedding.len() != self.dim {
            return Err(AppError::ModelError(format!(
                "Query embedding has {} dimensions, build expects {}",
                query_embedding.len(),
                self.dim
            )));
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(corpus_id, vector)| SearchHit {
                corpus_id,
                score: cosine_similarity(query_embedding, vector),
            })
            .filter(|hit| hit.score.is_finite())
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));

        hits.truncate(top_k);
        Ok(hits)
    }
}

/// Every loaded embeddings build, keyed by build name. Read-only once built.
#[derive(Debug, Default)]
pub struct EmbeddingStore {
    builds: HashMap<String, BuildEmbeddings>,
}

impl EmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads the embeddings objects and loads every configured build.
    pub async fn load(source: &dyn BlobSource, config: &EmbeddingsConfig) -> Result<Self> {
        let scratch_dir = ensure_scratch_dir(&config.scratch_dir)?;
        download_all(source, &config.prefix, &scratch_dir).await?;
        Self::from_dir(&scratch_dir, &config.builds)
    }

    /// Loads `embeddings_<build>.csv` for each build from `dir`.
    pub fn from_dir(dir: &Path, builds: &[String]) -> Result<Self> {
        let parser = EmbeddingsCsvParser::new();
        let mut store = Self::new();
        for build in builds {
            info!(build = %build, "Loading build");
            let path = embeddings_file(dir, build);
            let embeddings = parser.parse_file(&path)?;
            info!(build = %build, rows = embeddings.len(), dim = embeddings.dim, "Loaded build");
            store.insert(build, embeddings);
        }
        Ok(store)
    }

    pub fn insert(&mut self, build: &str, embeddings: BuildEmbeddings) {
        self.builds.insert(build.to_string(), embeddings);
    }

    pub fn build(&self, build: &str) -> Result<&BuildEmbeddings> {
        self.builds
            .get(build)
            .ok_or_else(|| AppError::UnknownBuild(build.to_string()))
    }

    pub fn build_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builds.keys().cloned().collect();
        names.sort();
        names
    }
}
