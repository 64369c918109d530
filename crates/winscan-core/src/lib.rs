//! Winscan core data model
//!
//! Dense scan grids for sliding-window detection, detection records with
//! their canonical log rendering, and the score histogram used for
//! threshold calibration.

pub mod grid;
pub mod histogram;
pub mod record;

pub use grid::{GridError, ScanAxis, ScanGrid, cartesian_product, compute_axis};
pub use histogram::{HistogramError, ScoreHistogram, clamp};
pub use record::{DetectionRecord, Location, ResultCollection};
