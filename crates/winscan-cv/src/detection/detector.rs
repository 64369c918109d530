//! Multi-scale sliding-window detector

use super::config::ScanConfig;
use crate::postprocess::PostProcessor;
use crate::traits::{Classifier, WindowView};
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use image::GrayImage;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use winscan_core::{DetectionRecord, Location, ResultCollection, ScanGrid};

/// Summary of one image scan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub windows_evaluated: usize,
    pub scales_scanned: usize,
    pub scales_skipped: usize,
    pub detections: usize,
    pub processing_time_ms: u64,
}

/// Detections and statistics of one image
#[derive(Debug, Clone, Default)]
pub struct ImageScan {
    pub results: ResultCollection,
    pub report: ScanReport,
}

/// Scans images window by window, scale by scale.
///
/// Scales run in ascending order and, within a scale, windows run in raster
/// order, so the sequence of `observe` calls is reproducible.
pub struct SlidingWindowDetector<C> {
    config: ScanConfig,
    scales: Vec<f64>,
    classifier: C,
}

impl<C: Classifier> SlidingWindowDetector<C> {
    /// Create new detector
    pub fn new(config: ScanConfig, classifier: C) -> Result<Self> {
        config.validate().context("Invalid scan configuration")?;
        let scales = config.sorted_scales();
        Ok(Self {
            config,
            scales,
            classifier,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Score every window of `image`, feeding each score to `processor`.
    pub fn scan_image<P>(&self, image: &GrayImage, processor: &mut P) -> Result<ImageScan>
    where
        P: PostProcessor + ?Sized,
    {
        let start_time = Instant::now();
        let (win_w, win_h) = self.config.window;
        let (stride_x, stride_y) = self.config.stride;

        let mut results = ResultCollection::new();
        let mut report = ScanReport::default();

        for &scale in &self.scales {
            let (scaled_w, scaled_h) = ImageUtils::scaled_dimensions(image.dimensions(), scale);
            if scaled_w < win_w || scaled_h < win_h {
                debug!(
                    "scale {}: {}x{} smaller than {}x{} window, skipped",
                    scale, scaled_w, scaled_h, win_w, win_h
                );
                report.scales_skipped += 1;
                continue;
            }

            let scaled = ImageUtils::resize_by(image, scale)?;
            let (scaled_w, scaled_h) = scaled.dimensions();
            let grid = ScanGrid::new(
                [scaled_w as usize, scaled_h as usize],
                [win_w as usize, win_h as usize],
                [stride_x as usize, stride_y as usize],
            )
            .with_context(|| format!("Failed to build scan grid at scale {}", scale))?;

            let before = results.len();
            for [x, y] in grid.positions() {
                let (x, y) = (x as u32, y as u32);
                let window = WindowView::new(&scaled, x, y, win_w, win_h)?;
                let score = self.classifier.score(&window).with_context(|| {
                    format!(
                        "{} failed at ({}, {}) scale {}",
                        self.classifier.name(),
                        x,
                        y,
                        scale
                    )
                })?;

                processor.observe(score);
                report.windows_evaluated += 1;

                if score >= self.config.score_threshold {
                    results.push(self.to_record(x, y, scale, score));
                }
            }

            debug!(
                "scale {}: {} windows, {} detections",
                scale,
                grid.len(),
                results.len() - before
            );
            report.scales_scanned += 1;
        }

        report.detections = results.len();
        report.processing_time_ms = start_time.elapsed().as_millis() as u64;
        Ok(ImageScan { results, report })
    }

    /// Scan `image` and hand its detections to `processor.finalize`.
    pub fn process_image<P>(
        &self,
        image: &GrayImage,
        image_name: &str,
        processor: &mut P,
    ) -> Result<ScanReport>
    where
        P: PostProcessor + ?Sized,
    {
        let scan = self.scan_image(image, processor)?;
        processor
            .finalize(&scan.results, image_name)
            .with_context(|| format!("Failed to finalize results of {}", image_name))?;

        info!(
            "{}: {} windows over {} scales, {} detections in {}ms",
            image_name,
            scan.report.windows_evaluated,
            scan.report.scales_scanned,
            scan.report.detections,
            scan.report.processing_time_ms
        );
        Ok(scan.report)
    }

    /// Load an image from disk and process it under its file name
    pub fn process_file<P, Q>(&self, path: Q, processor: &mut P) -> Result<ScanReport>
    where
        P: PostProcessor + ?Sized,
        Q: AsRef<Path>,
    {
        let path = path.as_ref();
        let image = ImageUtils::load_grayscale(path)?;
        let image_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        self.process_image(&image, &image_name, processor)
    }

    /// Map a window of the rescaled image back to original coordinates
    fn to_record(&self, x: u32, y: u32, scale: f64, score: f64) -> DetectionRecord {
        let unscale = |v: u32| (v as f64 / scale).round() as i32;
        let (win_w, win_h) = self.config.window;
        DetectionRecord::new(
            Location::new(unscale(x), unscale(y)),
            Location::new(unscale(win_w), unscale(win_h)),
            scale,
            score,
        )
    }
}
