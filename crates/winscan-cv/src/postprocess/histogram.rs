//! Score histogram accumulation for threshold calibration

use super::PostProcessor;
use crate::Result;
use anyhow::Context;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use winscan_core::{ResultCollection, ScoreHistogram};

/// Output destination, opened at construction
struct HistogramOutput {
    path: PathBuf,
    file: File,
    flushed: bool,
}

/// Clamps every observed score into `[min_th, max_th]` and counts it.
///
/// The histogram spans the whole run; nothing happens per image. The bins
/// are written once, as a JSON array of counts, by [`PostProcessor::shutdown`].
/// Without an output path the accumulator is a no-op sink.
pub struct ScoreHistogramAccumulator {
    histogram: ScoreHistogram,
    output: Option<HistogramOutput>,
}

impl ScoreHistogramAccumulator {
    pub fn new(
        min_th: f64,
        extent_th: f64,
        bandwidth: f64,
        output: Option<&Path>,
    ) -> Result<Self> {
        let histogram = ScoreHistogram::new(min_th, extent_th, bandwidth)
            .context("Invalid score histogram configuration")?;

        let output = match output.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create histogram output: {:?}", path))?;
                Some(HistogramOutput {
                    path: path.to_path_buf(),
                    file,
                    flushed: false,
                })
            }
            None => None,
        };

        Ok(Self { histogram, output })
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn histogram(&self) -> &ScoreHistogram {
        &self.histogram
    }

    /// Add the counts of a worker's histogram
    pub fn absorb(&mut self, other: &ScoreHistogram) -> Result<()> {
        if self.is_enabled() {
            self.histogram
                .merge(other)
                .context("Failed to merge score histogram")?;
        }
        Ok(())
    }

    fn write_bins(file: &mut File, bins: &[u64]) -> Result<()> {
        // Rewrite from the start so a retried flush replaces a partial one
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, bins)?;
        writer.flush()?;
        Ok(())
    }
}

impl PostProcessor for ScoreHistogramAccumulator {
    fn observe(&mut self, score: f64) {
        if self.output.is_some() {
            self.histogram.observe(score);
        }
    }

    fn finalize(&mut self, _results: &ResultCollection, _image_name: &str) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.output {
            Some(out) => format!(
                "score histogram [{}, {}] bandwidth {} -> {}",
                self.histogram.min_th(),
                self.histogram.max_th(),
                self.histogram.bandwidth(),
                out.path.display()
            ),
            None => "score histogram (disabled)".to_string(),
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        let Some(out) = self.output.as_mut() else {
            return Ok(());
        };
        if out.flushed {
            return Ok(());
        }

        Self::write_bins(&mut out.file, self.histogram.bins())
            .with_context(|| format!("Failed to write histogram to: {:?}", out.path))?;
        out.flushed = true;

        info!(
            "Histogram of {} scores written to {:?}",
            self.histogram.total(),
            out.path
        );
        Ok(())
    }
}

impl Drop for ScoreHistogramAccumulator {
    fn drop(&mut self) {
        let pending = self.output.as_ref().is_some_and(|out| !out.flushed);
        if pending {
            if let Err(e) = self.shutdown() {
                warn!("Histogram was not persisted: {:#}", e);
            }
        }
    }
}

/// Read back bins written by [`ScoreHistogramAccumulator`]
pub fn read_bins<P: AsRef<Path>>(path: P) -> Result<Vec<u64>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open histogram: {:?}", path.as_ref()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse histogram: {:?}", path.as_ref()))
}
