// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Embeddings file parsing

mod csv_parser;

pub use csv_parser::EmbeddingsCsvParser;
