// Error types shared across the clustering core

use crate::clustering::Feature;

/// Error type for clustering operations
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("Invalid threshold {0}: must be non-negative")]
    InvalidThreshold(f64),

    #[error("Invalid percentile {0}: must be between 1 and 99")]
    InvalidPercentile(u8),

    #[error("No distances recorded for feature '{0}'")]
    EmptyDistribution(Feature),

    #[error("Partition does not cover the universe: {missing} segment(s) missing, {unexpected} unexpected")]
    CoverageViolation { missing: usize, unexpected: usize },

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
