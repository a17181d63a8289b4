// Segclust - Quality-threshold clustering for musical segments
// Main library entry point

pub mod clustering;
pub mod config;
pub mod error;
pub mod export;
pub mod store;
