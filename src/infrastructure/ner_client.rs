use crate::domain::error::{AppError, Result};
use crate::domain::nl::Entity;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named-entity recognizer; entities come back in document order.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct NerResponse {
    #[serde(default)]
    ents: Vec<NerEntity>,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    text: String,
    label: String,
}

/// Client for a spaCy-style NER endpoint returning `{"ents": [{"text", "label"}]}`.
///
/// Built on the blocking client, so construct it outside the async runtime.
pub struct HttpEntityRecognizer {
    client: Client,
    endpoint: String,
}

impl HttpEntityRecognizer {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::ModelError(format!("Failed to build NER client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl EntityRecognizer for HttpEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NerRequest { text })
            .send()
            .map_err(|e| {
                AppError::ModelError(format!("Failed to call NER ({}): {}", self.endpoint, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ModelError(format!(
                "NER returned error {} (URL: {}): {}",
                status, self.endpoint, error_text
            )));
        }

        let parsed: NerResponse = response
            .json()
            .map_err(|e| AppError::ModelError(format!("Failed to parse NER response: {}", e)))?;

        Ok(parsed
            .ents
            .into_iter()
            .map(|ent| Entity::new(&ent.text, &ent.label))
            .collect())
    }
}
