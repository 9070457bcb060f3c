#![allow(dead_code)]

use datacommons_nl::domain::error::Result;
use datacommons_nl::domain::nl::Entity;
use datacommons_nl::infrastructure::embedder::SentenceEmbedder;
use datacommons_nl::infrastructure::ner_client::EntityRecognizer;
use std::path::Path;

/// Embeds a query by keyword: "people" points at axis 0, "age" at axis 1.
pub struct KeywordEmbedder;

impl SentenceEmbedder for KeywordEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let text = text.to_lowercase();
        let people = if text.contains("people") { 1.0 } else { 0.0 };
        let age = if text.contains("age") { 1.0 } else { 0.0 };
        Ok(vec![people, age, 0.1])
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Tags capitalised words found in a fixed gazetteer.
pub struct GazetteerRecognizer;

impl EntityRecognizer for GazetteerRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        Ok(text
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter_map(|word| match word {
                "California" | "Texas" => Some(Entity::new(word, "GPE")),
                "Pacific" => Some(Entity::new(word, "LOC")),
                "SFO" => Some(Entity::new(word, "FAC")),
                _ => None,
            })
            .collect())
    }
}

pub const COMBINED_ALL_CSV: &str = "dcid,0,1,2\n\
Count_Person,1.0,0.0,0.1\n\
\"Count_Person,Count_Person_Male\",0.9,0.1,0.1\n\
Median_Age_Person,0.0,1.0,0.1\n";

pub const DEMOGRAPHICS_CSV: &str = "dcid,0,1,2\n\
Count_Household,1.0,0.0,0.0\n";

/// Lays out `<root>/embeddings/embeddings_<build>.csv` like the bucket.
pub fn write_bucket(root: &Path) {
    let dir = root.join("embeddings");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("embeddings_combined_all.csv"), COMBINED_ALL_CSV).unwrap();
    std::fs::write(dir.join("embeddings_demographics300.csv"), DEMOGRAPHICS_CSV).unwrap();
}
