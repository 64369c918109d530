//! Clamped score histogram for threshold calibration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack added before flooring so values sitting on a bin edge are not
/// pushed into the lower bin by rounding noise.
const EDGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistogramError {
    #[error("bandwidth must be finite and > 0, got {0}")]
    InvalidBandwidth(f64),

    #[error("extent {extent} must be finite and at least one bandwidth ({bandwidth})")]
    InvalidExtent { extent: f64, bandwidth: f64 },

    #[error("lower bound must be finite, got {0}")]
    InvalidMin(f64),

    #[error("cannot merge histograms with different binning")]
    BinningMismatch,
}

/// Clamp `x` into `[lo, hi]`. NaN maps to `lo`.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() || x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Fixed-range histogram over `[min_th, max_th]` with bins of `bandwidth`.
///
/// `max_th = min_th + extent_th - bandwidth`, so the top bin starts at
/// `max_th`. Every observation lands in some bin: out-of-range scores are
/// clamped onto the boundary bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistogram {
    min_th: f64,
    max_th: f64,
    bandwidth: f64,
    bins: Vec<u64>,
}

impl ScoreHistogram {
    pub fn new(min_th: f64, extent_th: f64, bandwidth: f64) -> Result<Self, HistogramError> {
        if !min_th.is_finite() {
            return Err(HistogramError::InvalidMin(min_th));
        }
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(HistogramError::InvalidBandwidth(bandwidth));
        }
        if !extent_th.is_finite() || extent_th < bandwidth {
            return Err(HistogramError::InvalidExtent {
                extent: extent_th,
                bandwidth,
            });
        }

        // The bin holding max_th is the last one, same rule as bin_index
        let max_th = min_th + extent_th - bandwidth;
        let num_bins = ((max_th - min_th) / bandwidth + EDGE_EPSILON).floor() as usize + 1;

        Ok(Self {
            min_th,
            max_th,
            bandwidth,
            bins: vec![0; num_bins],
        })
    }

    pub fn min_th(&self) -> f64 {
        self.min_th
    }

    pub fn max_th(&self) -> f64 {
        self.max_th
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    /// Number of observations accumulated so far
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Bin that a (possibly out of range) score is counted in
    pub fn bin_index(&self, score: f64) -> usize {
        let d = clamp(score, self.min_th, self.max_th);
        let idx = ((d - self.min_th) / self.bandwidth + EDGE_EPSILON).floor();
        (idx.max(0.0) as usize).min(self.bins.len() - 1)
    }

    /// Lower edge of bin `idx`
    pub fn bin_start(&self, idx: usize) -> f64 {
        self.min_th + idx as f64 * self.bandwidth
    }

    pub fn observe(&mut self, score: f64) {
        let idx = self.bin_index(score);
        self.bins[idx] += 1;
    }

    /// Bin-wise sum of another histogram with the same binning.
    pub fn merge(&mut self, other: &ScoreHistogram) -> Result<(), HistogramError> {
        if self.bins.len() != other.bins.len()
            || self.min_th != other.min_th
            || self.bandwidth != other.bandwidth
        {
            return Err(HistogramError::BinningMismatch);
        }
        for (dst, src) in self.bins.iter_mut().zip(&other.bins) {
            *dst += src;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0);
    }
}
