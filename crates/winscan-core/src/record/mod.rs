//! Detection records and their canonical log rendering
//!
//! The rendering produced here is read back by tooling that parses
//! hard-negative logs by field position and width, so the layout is fixed:
//!
//! ```text
//! loc.x  loc.y  ext.x  ext.y  scale      score
//! %6d    %6d    %6d    %6d    %9 (5 sig) %13 (8 sig, scientific)
//! ```

pub mod collection;
mod format;

pub use collection::ResultCollection;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer 2D point, used for window anchors and extents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Location {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A window the detector accepted as positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    location: Location,
    extent: Location,
    scale: f64,
    score: f64,
}

impl DetectionRecord {
    pub fn new(location: Location, extent: Location, scale: f64, score: f64) -> Self {
        Self {
            location,
            extent,
            scale,
            score,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn extent(&self) -> Location {
        self.extent
    }

    /// Resize factor of the pyramid level the detection came from
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Canonical six-field rendering, identical to the `Display` output
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DetectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6} {:>6} {:>6} {:>6} {:>9} {:>13}",
            self.location.x,
            self.location.y,
            self.extent.x,
            self.extent.y,
            format::fixed_significant(self.scale, 5),
            format::scientific(self.score, 8),
        )
    }
}
