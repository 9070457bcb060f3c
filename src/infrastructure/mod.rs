pub mod blob_store;
pub mod config;
pub mod csv;
pub mod embedder;
pub mod ner_client;
pub mod storage;
