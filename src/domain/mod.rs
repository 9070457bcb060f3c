pub mod chart;
pub mod deployment;
pub mod error;
pub mod nl;
