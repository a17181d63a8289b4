// Alignment feature types and their score columns

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alignment score feature used to measure segment distance.
///
/// Each variant selects one score column of the `SegmentAlignment` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Feature {
    Diatonic,
    Chromatic,
    Rhythmic,
    DiatonicRhythmic,
    ChromaticRhythmic,
}

impl Feature {
    /// All features, in the order the alignment pipeline computes them.
    pub const ALL: [Feature; 5] = [
        Feature::Diatonic,
        Feature::Chromatic,
        Feature::Rhythmic,
        Feature::DiatonicRhythmic,
        Feature::ChromaticRhythmic,
    ];

    /// Name of the score column in the `SegmentAlignment` table.
    pub fn score_column(self) -> &'static str {
        match self {
            Feature::Diatonic => "diatonic_score",
            Feature::Chromatic => "chromatic_score",
            Feature::Rhythmic => "rhythmic_score",
            Feature::DiatonicRhythmic => "diatonic_rhythmic_score",
            Feature::ChromaticRhythmic => "chromatic_rhythmic_score",
        }
    }

    /// Short name used in CLI arguments and output file names.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Diatonic => "diatonic",
            Feature::Chromatic => "chromatic",
            Feature::Rhythmic => "rhythmic",
            Feature::DiatonicRhythmic => "diatonic_rhythmic",
            Feature::ChromaticRhythmic => "chromatic_rhythmic",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diatonic" => Ok(Feature::Diatonic),
            "chromatic" => Ok(Feature::Chromatic),
            "rhythmic" => Ok(Feature::Rhythmic),
            "diatonic_rhythmic" => Ok(Feature::DiatonicRhythmic),
            "chromatic_rhythmic" => Ok(Feature::ChromaticRhythmic),
            other => Err(format!("unknown feature '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_columns_match_names() {
        for feature in Feature::ALL {
            assert_eq!(feature.score_column(), format!("{}_score", feature.name()));
        }
    }

    #[test]
    fn parses_from_str() {
        assert_eq!(
            "chromatic_rhythmic".parse::<Feature>().unwrap(),
            Feature::ChromaticRhythmic
        );
        assert!("melodic".parse::<Feature>().is_err());
    }
}
