//! Detection configuration

use crate::postprocess::PostProcessingConfig;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window size must be > 0 in both dimensions, got {0}x{1}")]
    InvalidWindow(u32, u32),

    #[error("stride must be > 0 in both dimensions, got {0}x{1}")]
    InvalidStride(u32, u32),

    #[error("at least one scale is required")]
    NoScales,

    #[error("scales must be finite and > 0, got {0}")]
    InvalidScale(f64),

    #[error("score threshold must be finite, got {0}")]
    InvalidThreshold(f64),
}

/// Sliding-window scan parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Window (width, height) in pixels of the rescaled image
    pub window: (u32, u32),
    /// Step (x, y) between neighbouring windows
    pub stride: (u32, u32),
    /// Image resize factors, scanned in ascending order
    pub scales: Vec<f64>,
    /// Windows scoring at or above this become detections
    pub score_threshold: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: (64, 64),
            stride: (8, 8),
            scales: vec![0.5, 0.75, 1.0],
            score_threshold: 0.5,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let (w, h) = self.window;
        if w == 0 || h == 0 {
            return Err(ConfigError::InvalidWindow(w, h));
        }
        let (sx, sy) = self.stride;
        if sx == 0 || sy == 0 {
            return Err(ConfigError::InvalidStride(sx, sy));
        }
        if self.scales.is_empty() {
            return Err(ConfigError::NoScales);
        }
        if let Some(&bad) = self.scales.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(ConfigError::InvalidScale(bad));
        }
        if !self.score_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.score_threshold));
        }
        Ok(())
    }

    /// Scales sorted ascending with duplicates removed
    pub fn sorted_scales(&self) -> Vec<f64> {
        let mut scales = self.scales.clone();
        scales.sort_by(f64::total_cmp);
        scales.dedup();
        scales
    }
}

/// Main detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub scan: ScanConfig,
    pub template_path: PathBuf,
    #[serde(default)]
    pub post_processing: PostProcessingConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            template_path: "assets/template.png".into(),
            post_processing: PostProcessingConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Record every above-threshold window to `output` for retraining
    pub fn for_hard_negative_mining<P: Into<PathBuf>>(output: P) -> Self {
        Self {
            post_processing: PostProcessingConfig::HardNegative {
                output: output.into(),
            },
            ..Default::default()
        }
    }

    /// Histogram all window scores over `[-1, 1]` in steps of 0.01
    pub fn for_threshold_calibration<P: Into<PathBuf>>(output: P) -> Self {
        Self {
            post_processing: PostProcessingConfig::ScoreHistogram {
                min_th: -1.0,
                extent_th: 2.01,
                bandwidth: 0.01,
                output: Some(output.into()),
            },
            ..Default::default()
        }
    }

    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {:?}", path.as_ref()))?;
        config
            .scan
            .validate()
            .with_context(|| format!("Invalid scan configuration in {:?}", path.as_ref()))?;
        Ok(config)
    }
}
