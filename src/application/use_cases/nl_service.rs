//! Natural-language query service: stat var detection and place detection.

use crate::application::use_cases::embedding_store::EmbeddingStore;
use crate::domain::error::Result;
use crate::domain::nl::{SearchHit, SvDetection};
use crate::infrastructure::embedder::SentenceEmbedder;
use crate::infrastructure::ner_client::EntityRecognizer;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 10;

/// Holds the model handles and the loaded embeddings.
pub struct NlModel {
    embedder: Arc<dyn SentenceEmbedder>,
    ner: Arc<dyn EntityRecognizer>,
    store: Arc<EmbeddingStore>,
    top_k: usize,
}

impl NlModel {
    pub fn new(
        embedder: Arc<dyn SentenceEmbedder>,
        ner: Arc<dyn EntityRecognizer>,
        store: Arc<EmbeddingStore>,
    ) -> Self {
        Self {
            embedder,
            ner,
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Ranks the stat vars of `embeddings_build` against `query`.
    pub fn detect_svs(&self, query: &str, embeddings_build: &str) -> Result<SvDetection> {
        let build = self.store.build(embeddings_build)?;
        let query_embedding = self.embedder.encode(query)?;
        let hits = build.semantic_search(&query_embedding, self.top_k)?;
        debug!(build = embeddings_build, hits = hits.len(), "Stat var search done");
        Ok(aggregate_scores(&hits, &build.dcids))
    }

    /// Place names in `query`; GPE/LOC entities win over facilities.
    pub fn detect_place(&self, query: &str) -> Result<Vec<String>> {
        let entities = self.ner.recognize(query)?;

        let mut places_found_loc_gpe = Vec::new();
        let mut places_found_fac = Vec::new();
        for entity in entities {
            if entity.label.is_location() {
                places_found_loc_gpe.push(entity.text);
            } else if entity.label.is_facility() {
                places_found_fac.push(entity.text);
            }
        }

        if !places_found_loc_gpe.is_empty() {
            return Ok(places_found_loc_gpe);
        }
        Ok(places_found_fac)
    }
}

/// Folds hits into per-dcid scores.
///
/// A row may stand for several comma-joined dcids, and a dcid may appear in
/// several rows; the first (highest ranked) score seen for a dcid is kept.
pub fn aggregate_scores(hits: &[SearchHit], dcid_rows: &[String]) -> SvDetection {
    let mut seen = HashSet::new();
    let mut sv2score: Vec<(String, f32)> = Vec::new();

    for hit in hits {
        let Some(row) = dcid_rows.get(hit.corpus_id) else {
            continue;
        };
        for dcid in row.split(',') {
            if seen.insert(dcid.to_string()) {
                sv2score.push((dcid.to_string(), hit.score));
            }
        }
    }

    // Stable: equal scores keep insertion order.
    sv2score.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (svs, scores) = sv2score.into_iter().unzip();
    SvDetection { svs, scores }
}
