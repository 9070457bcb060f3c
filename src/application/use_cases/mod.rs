pub mod embedding_store;
pub mod nl_service;
pub mod page_builder;
pub mod scatter;
pub mod var_correlation;
