// Quality-threshold clustering of aligned segments

pub mod distances;
pub mod engine;
pub mod feature;
pub mod partition;
pub mod stats;
pub mod threshold;
pub mod union_find;
pub mod verify;

pub use distances::{cluster_distance, cluster_distance_matrix};
pub use engine::cluster_with_qt;
pub use feature::Feature;
pub use partition::{ClusterId, Partition};
pub use stats::{summarize_distribution, DistributionSummary};
pub use threshold::{ThresholdSpec, DEFAULT_PERCENTILE};
pub use verify::{verify_partition, ClusteringReport};
