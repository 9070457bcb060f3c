pub mod use_cases;

pub use use_cases::embedding_store::EmbeddingStore;
pub use use_cases::nl_service::NlModel;
pub use use_cases::page_builder::Builder;
