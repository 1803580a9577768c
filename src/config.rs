use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::score::DEFAULT_DISTANCE_SCALE;

/// Coordinate system of the input geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputCrs {
    /// Longitude/latitude in degrees (WGS84); projected to an equal-area plane.
    Geographic,
    /// Already projected to an area-accurate plane; used as-is.
    Planar,
}

impl Default for InputCrs {
    fn default() -> Self { Self::Geographic }
}

/// Coefficients of the district-alignment score.
///
/// ```text
/// score = adjacency_weight * mean(adjacency fractions)
///       - position_weight  * (assignment cost / n)
///       - balance_weight   * stddev(group areas)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub adjacency_weight: f64,
    pub position_weight: f64,
    pub balance_weight: f64,
    /// Multiplier applied to centroid coordinates before squaring distances.
    pub distance_scale: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            adjacency_weight: 1.0,
            position_weight: 6.0,
            balance_weight: 12.0,
            distance_scale: DEFAULT_DISTANCE_SCALE,
        }
    }
}

/// Parameters of the partition search (ensemble sampling + burst search).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of independent optimizer runs.
    pub runs: usize,
    /// Moves proposed per burst.
    pub burst_size: usize,
    /// Number of bursts per run.
    pub max_bursts: usize,
    /// Allowed relative deviation of a part's size from the ideal size.
    pub pop_tolerance: f64,
    /// Base seed; run `r` uses `seed + r`.
    pub seed: u64,
    /// Maximum number of starting partitions drawn per run.
    pub sampler_attempts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            runs: 8,
            burst_size: 10,
            max_bursts: 250,
            pop_tolerance: 0.25,
            seed: 0,
            sampler_attempts: 20,
        }
    }
}

/// Top-level configuration for building a hex map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexmapConfig {
    /// Target number of grid cells per district.
    pub cells_per_district: f64,
    /// Multiplier on the target cell count.
    pub inflation: f64,
    /// Coordinate system of the inputs.
    pub crs: InputCrs,
    /// Upper bound on sizing-loop retries.
    pub max_sizing_attempts: usize,
    /// Buffer distance (projected units) used when relating real districts.
    pub adjacency_tolerance: f64,
    /// Bucket width (projected square units) for the typical cell area.
    pub area_bucket: f64,
    pub score: ScoreConfig,
    pub search: SearchConfig,
    /// Verbosity of stderr progress lines (0 = silent).
    pub verbose: u8,
}

impl Default for HexmapConfig {
    fn default() -> Self {
        Self {
            cells_per_district: 5.0,
            inflation: 1.05,
            crs: InputCrs::default(),
            max_sizing_attempts: 60,
            adjacency_tolerance: 5.0,
            area_bucket: 1e6,
            score: ScoreConfig::default(),
            search: SearchConfig::default(),
            verbose: 0,
        }
    }
}

impl HexmapConfig {
    /// Parse a configuration from a JSON string; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .context("[HexmapConfig] failed to parse JSON configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("[HexmapConfig] failed to read {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Reject tunables that would make the grid or search ill-defined.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.cells_per_district > 0.0 && self.cells_per_district.is_finite(),
            "[HexmapConfig] cells_per_district must be positive, got {}", self.cells_per_district);
        ensure!(self.inflation > 0.0 && self.inflation.is_finite(),
            "[HexmapConfig] inflation must be positive, got {}", self.inflation);
        ensure!(self.max_sizing_attempts > 0,
            "[HexmapConfig] max_sizing_attempts must be at least 1");
        ensure!(self.adjacency_tolerance >= 0.0 && self.adjacency_tolerance.is_finite(),
            "[HexmapConfig] adjacency_tolerance must be non-negative, got {}", self.adjacency_tolerance);
        ensure!(self.area_bucket > 0.0 && self.area_bucket.is_finite(),
            "[HexmapConfig] area_bucket must be positive, got {}", self.area_bucket);
        ensure!(self.score.distance_scale > 0.0 && self.score.distance_scale.is_finite(),
            "[HexmapConfig] score.distance_scale must be positive, got {}", self.score.distance_scale);
        ensure!(self.search.runs > 0, "[HexmapConfig] search.runs must be at least 1");
        ensure!(self.search.sampler_attempts > 0, "[HexmapConfig] search.sampler_attempts must be at least 1");
        ensure!(self.search.pop_tolerance >= 0.0 && self.search.pop_tolerance.is_finite(),
            "[HexmapConfig] search.pop_tolerance must be non-negative, got {}", self.search.pop_tolerance);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = HexmapConfig::default();
        assert_eq!(config.cells_per_district, 5.0);
        assert_eq!(config.inflation, 1.05);
        assert_eq!(config.crs, InputCrs::Geographic);
        assert_eq!(config.score.position_weight, 6.0);
        assert_eq!(config.score.balance_weight, 12.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = HexmapConfig::from_json_str(r#"{
            "cells_per_district": 7,
            "crs": "planar",
            "search": { "runs": 2 }
        }"#).unwrap();

        assert_eq!(config.cells_per_district, 7.0);
        assert_eq!(config.crs, InputCrs::Planar);
        assert_eq!(config.search.runs, 2);
        assert_eq!(config.search.burst_size, SearchConfig::default().burst_size);
        assert_eq!(config.inflation, 1.05);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = HexmapConfig::from_json_str(r#"{ "inflation": -1.0 }"#).unwrap_err();
        assert!(err.to_string().contains("inflation"));

        let err = HexmapConfig::from_json_str(r#"{ "search": { "runs": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("runs"));
    }

    #[test]
    fn malformed_json_reports_context() {
        let err = HexmapConfig::from_json_str("{ not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn reads_config_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "verbose": 2, "area_bucket": 500.0 }}"#).unwrap();

        let config = HexmapConfig::from_path(file.path()).unwrap();
        assert_eq!(config.verbose, 2);
        assert_eq!(config.area_bucket, 500.0);
    }
}
