use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Stat vars matched for a query, ordered by descending cosine score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SvDetection {
    #[serde(rename = "SV")]
    pub svs: Vec<String>,
    #[serde(rename = "CosineScore")]
    pub scores: Vec<f32>,
}

/// One row of a build's embedding matrix and its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub corpus_id: usize,
    pub score: f32,
}

/// spaCy-style entity labels; only the place-like ones are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Gpe,
    Loc,
    Fac,
    Other(String),
}

impl EntityLabel {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "GPE" => EntityLabel::Gpe,
            "LOC" => EntityLabel::Loc,
            "FAC" => EntityLabel::Fac,
            other => EntityLabel::Other(other.to_string()),
        }
    }

    pub fn is_location(&self) -> bool {
        matches!(self, EntityLabel::Gpe | EntityLabel::Loc)
    }

    pub fn is_facility(&self) -> bool {
        matches!(self, EntityLabel::Fac)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn new(text: &str, label: &str) -> Self {
        Self {
            text: text.to_string(),
            label: EntityLabel::from_label(label),
        }
    }
}

/// One embeddings build: row `i` of `vectors` embeds the comma-joined ids in `dcids[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildEmbeddings {
    pub dcids: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
    pub dim: usize,
}

impl BuildEmbeddings {
    pub fn new(dcids: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if dcids.len() != vectors.len() {
            return Err(AppError::ParseError(format!(
                "{} dcid rows but {} embedding rows",
                dcids.len(),
                vectors.len()
            )));
        }
        let dim = vectors.first().map(|v| v.len()).unwrap_or(0);
        if dim == 0 {
            return Err(AppError::ParseError(
                "Embeddings build has no rows or no columns".to_string(),
            ));
        }
        if let Some(row) = vectors.iter().position(|v| v.len() != dim) {
            return Err(AppError::ParseError(format!(
                "Embedding row {} has {} columns, expected {}",
                row + 1,
                vectors[row].len(),
                dim
            )));
        }
        Ok(Self { dcids, vectors, dim })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
