// JSON output files for a finished clustering run

use crate::clustering::{ClusterId, ClusteringReport, Feature, Partition};
use crate::store::SegmentId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One row of the per-segment results document.
#[derive(Debug, Serialize)]
struct SegmentRow {
    segment_id: SegmentId,
    cluster_id: ClusterId,
}

/// One row of the per-cluster results document.
#[derive(Debug, Serialize)]
struct ClusterRow {
    cluster_id: ClusterId,
    total_segments: usize,
    segments: Vec<SegmentId>,
}

#[derive(Debug, Serialize)]
struct RunMetadata {
    feature: Feature,
    threshold: f64,
    generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct SegmentsDocument<'a> {
    #[serde(flatten)]
    run: &'a RunMetadata,
    report: &'a ClusteringReport,
    segments: Vec<SegmentRow>,
}

#[derive(Debug, Serialize)]
struct ClustersDocument<'a> {
    #[serde(flatten)]
    run: &'a RunMetadata,
    clusters: Vec<ClusterRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_distances: Option<Vec<ClusterDistanceRow>>,
}

#[derive(Debug, Serialize)]
struct ClusterDistanceRow {
    cluster_1: ClusterId,
    cluster_2: ClusterId,
    average_distance: f64,
}

/// Write `<feature>_segments.json` and `<feature>_clusters.json` into
/// `output_dir`, returning the paths written.
pub fn write_results(
    output_dir: &Path,
    feature: Feature,
    threshold: f64,
    partition: &Partition,
    report: &ClusteringReport,
    cluster_distances: Option<&BTreeMap<(ClusterId, ClusterId), f64>>,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(output_dir)?;

    let run = RunMetadata {
        feature,
        threshold,
        generated_at: Utc::now(),
    };

    let segments = SegmentsDocument {
        run: &run,
        report,
        segments: partition
            .iter()
            .map(|(segment_id, cluster_id)| SegmentRow {
                segment_id,
                cluster_id,
            })
            .collect(),
    };

    let clusters = ClustersDocument {
        run: &run,
        clusters: partition
            .clusters()
            .iter()
            .map(|(&cluster_id, members)| ClusterRow {
                cluster_id,
                total_segments: members.len(),
                segments: members.iter().copied().collect(),
            })
            .collect(),
        cluster_distances: cluster_distances.map(|matrix| {
            matrix
                .iter()
                .map(|(&(cluster_1, cluster_2), &average_distance)| ClusterDistanceRow {
                    cluster_1,
                    cluster_2,
                    average_distance,
                })
                .collect()
        }),
    };

    let segments_path = output_dir.join(format!("{feature}_segments.json"));
    let clusters_path = output_dir.join(format!("{feature}_clusters.json"));

    fs::write(&segments_path, serde_json::to_string_pretty(&segments)?)?;
    fs::write(&clusters_path, serde_json::to_string_pretty(&clusters)?)?;

    log::info!(
        "wrote {} and {}",
        segments_path.display(),
        clusters_path.display()
    );

    Ok((segments_path, clusters_path))
}
