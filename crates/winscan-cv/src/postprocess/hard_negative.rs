//! Hard-negative mining log

use super::PostProcessor;
use crate::Result;
use anyhow::Context;
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use winscan_core::ResultCollection;

/// Separates the image name from the record fields on each line
pub const SEPARATOR: char = '\t';

/// Appends every detection of every image to a text log.
///
/// Each line is `<image name>\t<record>`, in the order of the result
/// collection. All lines of one image go out in a single append.
pub struct HardNegativeRecorder {
    path: PathBuf,
    file: File,
    lines_written: u64,
}

impl HardNegativeRecorder {
    /// Open (or create) the log for appending
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open hard-negative log: {:?}", path))?;

        Ok(Self {
            path,
            file,
            lines_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written by this recorder since it was opened
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    fn format_lines(results: &ResultCollection, image_name: &str) -> String {
        let mut chunk = String::new();
        for record in results {
            chunk.push_str(image_name);
            chunk.push(SEPARATOR);
            chunk.push_str(&record.render());
            chunk.push('\n');
        }
        chunk
    }
}

impl PostProcessor for HardNegativeRecorder {
    fn observe(&mut self, _score: f64) {}

    fn finalize(&mut self, results: &ResultCollection, image_name: &str) -> Result<()> {
        if results.is_empty() {
            return Ok(());
        }

        let chunk = Self::format_lines(results, image_name);
        self.file
            .write_all(chunk.as_bytes())
            .and_then(|_| self.file.flush())
            .with_context(|| format!("Failed to write hard negatives to: {:?}", self.path))?;

        self.lines_written += results.len() as u64;
        debug!(
            "{}: {} hard negatives appended to {:?}",
            image_name,
            results.len(),
            self.path
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("hard-negative recorder -> {}", self.path.display())
    }
}
