//! Post-processing of the per-window score stream
//!
//! A [`PostProcessor`] sees every classifier score through `observe` while an
//! image is scanned, and the thresholded detections of that image through
//! `finalize` once the scan is complete. Output files are opened when the
//! processor is built, so a bad destination fails before any image is read.

pub mod hard_negative;
pub mod histogram;

pub use hard_negative::HardNegativeRecorder;
pub use histogram::{ScoreHistogramAccumulator, read_bins};

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use winscan_core::{ResultCollection, ScoreHistogram};

/// Strategy contract driven by the scan loop.
pub trait PostProcessor {
    /// Called once per evaluated window, in scan order.
    fn observe(&mut self, score: f64);

    /// Called once per image after every window was scored.
    fn finalize(&mut self, results: &ResultCollection, image_name: &str) -> Result<()>;

    /// Human-readable identifier for logs
    fn describe(&self) -> String;

    /// Flush run-level output. Safe to call again after a failure.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<P: PostProcessor + ?Sized> PostProcessor for Box<P> {
    fn observe(&mut self, score: f64) {
        (**self).observe(score)
    }

    fn finalize(&mut self, results: &ResultCollection, image_name: &str) -> Result<()> {
        (**self).finalize(results, image_name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }
}

/// In-memory accumulation with no output, used by per-worker scans.
impl PostProcessor for ScoreHistogram {
    fn observe(&mut self, score: f64) {
        ScoreHistogram::observe(self, score);
    }

    fn finalize(&mut self, _results: &ResultCollection, _image_name: &str) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "in-memory histogram [{}, {}] x {}",
            self.min_th(),
            self.max_th(),
            self.bandwidth()
        )
    }
}

/// Post-processing strategy selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PostProcessingConfig {
    /// Log every detection of every image for hard-negative mining
    HardNegative { output: PathBuf },
    /// Histogram of all window scores for threshold calibration
    ScoreHistogram {
        min_th: f64,
        extent_th: f64,
        bandwidth: f64,
        #[serde(default)]
        output: Option<PathBuf>,
    },
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        PostProcessingConfig::ScoreHistogram {
            min_th: -1.0,
            extent_th: 2.0,
            bandwidth: 0.01,
            output: None,
        }
    }
}

impl PostProcessingConfig {
    /// Open the configured strategy and its output destination
    pub fn build(&self) -> Result<Box<dyn PostProcessor>> {
        let processor: Box<dyn PostProcessor> = match self {
            PostProcessingConfig::HardNegative { output } => {
                Box::new(HardNegativeRecorder::new(output)?)
            }
            PostProcessingConfig::ScoreHistogram {
                min_th,
                extent_th,
                bandwidth,
                output,
            } => Box::new(ScoreHistogramAccumulator::new(
                *min_th,
                *extent_th,
                *bandwidth,
                output.as_deref(),
            )?),
        };
        Ok(processor)
    }
}
