pub mod batch;
pub mod config;
pub mod errors;
pub mod graph;
pub mod resolution;
pub mod types;
pub mod wire;
