//! High-level detection module

#[cfg(feature = "parallel")]
pub mod batch;
pub mod config;
pub mod detector;

pub use config::{ConfigError, DetectionConfig, ScanConfig};
pub use detector::{ImageScan, ScanReport, SlidingWindowDetector};
