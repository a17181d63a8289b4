// Segclust command-line interface

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use segclust::clustering::{
    cluster_distance_matrix, cluster_with_qt, summarize_distribution, verify_partition, Feature,
    ThresholdSpec,
};
use segclust::config::Config;
use segclust::export::write_results;
use segclust::store::{AlignmentDb, DistanceStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "segclust",
    about = "Cluster musical segments by alignment distance using quality-threshold clustering"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "segclust.toml")]
    config: PathBuf,

    /// Path to the alignment database (overrides config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Run quality-threshold clustering for one feature")]
    Cluster {
        /// Feature type for clustering
        #[arg(short, long)]
        feature: Feature,

        /// Distance threshold for clustering
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Percentile to use as threshold when no explicit threshold is given (1-99)
        #[arg(short, long)]
        percentile: Option<u8>,

        /// Directory for result files (overrides config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Include average cross-cluster distances in the cluster output
        #[arg(long)]
        distances: bool,
    },

    #[command(about = "Show distance distribution statistics used to pick thresholds")]
    Stats {
        /// Restrict to one feature (all features by default)
        #[arg(short, long)]
        feature: Option<Feature>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    let db_path = cli.db.unwrap_or_else(|| config.db_path.clone());

    if !db_path.exists() {
        bail!("alignment database not found: {}", db_path.display());
    }
    let db = AlignmentDb::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    match cli.command {
        Command::Cluster {
            feature,
            threshold,
            percentile,
            out,
            distances,
        } => {
            let spec = match (threshold, percentile) {
                (Some(value), _) => ThresholdSpec::Explicit(value),
                (None, Some(p)) => ThresholdSpec::Percentile(p),
                (None, None) => ThresholdSpec::Percentile(config.percentile),
            };
            let threshold = spec.resolve(&db, feature)?;
            if let ThresholdSpec::Percentile(p) = spec {
                log::info!("using {p}th percentile as threshold: {threshold:.2}");
            }

            log::info!("clustering by {feature} (threshold: {threshold})");
            let universe = db.all_segments()?;
            let partition = cluster_with_qt(&db, &universe, feature, threshold)?;
            let report = verify_partition(&partition, &universe)?;

            println!("Clustering statistics:");
            println!("- Total segments: {}", report.total_segments);
            println!("- Total clusters: {}", report.total_clusters);
            println!("- Single-element clusters: {}", report.singleton_clusters);
            println!("- Largest cluster size: {}", report.largest_cluster);

            let matrix = if distances {
                Some(cluster_distance_matrix(&db, feature, &partition)?)
            } else {
                None
            };

            let output_dir = out.unwrap_or_else(|| config.output_dir.clone());
            let output_dir = output_dir.join(format!("{feature}_clustering"));
            write_results(
                &output_dir,
                feature,
                threshold,
                &partition,
                &report,
                matrix.as_ref(),
            )?;
            println!("Results saved to {}", output_dir.display());
        }

        Command::Stats { feature } => {
            let features: Vec<Feature> = match feature {
                Some(feature) => vec![feature],
                None => Feature::ALL.to_vec(),
            };

            for feature in features {
                match summarize_distribution(&db, feature) {
                    Ok(summary) => {
                        println!("{feature}:");
                        println!(
                            "  count {} | mean {:.2} | std {:.2}",
                            summary.count, summary.mean, summary.std_dev
                        );
                        println!(
                            "  min {:.2} | q1 {:.2} | median {:.2} | q3 {:.2} | max {:.2}",
                            summary.min, summary.q1, summary.median, summary.q3, summary.max
                        );
                        println!(
                            "  threshold candidates: p10 {:.2} | iqr {:.2}",
                            summary.threshold_p10, summary.threshold_iqr
                        );
                    }
                    Err(e) => println!("{feature}: {e}"),
                }
            }
        }
    }

    Ok(())
}
