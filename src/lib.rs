pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::use_cases::embedding_store::EmbeddingStore;
pub use application::use_cases::nl_service::NlModel;
pub use application::use_cases::var_correlation::add_chart;
pub use domain::error::{AppError, Result};
