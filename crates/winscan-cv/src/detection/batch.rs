//! Parallel score histograms over many images
//!
//! Each worker scans into its own [`ScoreHistogram`]; the partial
//! histograms are then summed bin by bin.

use super::detector::SlidingWindowDetector;
use crate::traits::Classifier;
use crate::utils::ImageUtils;
use crate::Result;
use log::info;
use rayon::prelude::*;
use std::path::PathBuf;
use winscan_core::ScoreHistogram;

impl<C: Classifier + Sync> SlidingWindowDetector<C> {
    /// Histogram every window score of `images`, binned like `template`.
    pub fn histogram_batch(
        &self,
        images: &[PathBuf],
        template: &ScoreHistogram,
    ) -> Result<ScoreHistogram> {
        let mut empty = template.clone();
        empty.reset();

        let merged = images
            .par_iter()
            .map(|path| -> Result<ScoreHistogram> {
                let image = ImageUtils::load_grayscale(path)?;
                let mut partial = empty.clone();
                self.scan_image(&image, &mut partial)?;
                Ok(partial)
            })
            .try_reduce(
                || empty.clone(),
                |mut acc, partial| -> Result<ScoreHistogram> {
                    acc.merge(&partial)?;
                    Ok(acc)
                },
            )?;

        info!(
            "Parallel histogram over {} images: {} scores",
            images.len(),
            merged.total()
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::ScanConfig;
    use crate::traits::WindowView;
    use image::{GrayImage, Luma};

    struct CornerClassifier;

    impl Classifier for CornerClassifier {
        fn score(&self, window: &WindowView<'_>) -> Result<f64> {
            Ok(f64::from(window.pixel(0, 0)) / 255.0)
        }
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = std::env::temp_dir().join(format!("winscan-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;

        let mut paths = Vec::new();
        for i in 0..4u32 {
            let img = GrayImage::from_fn(32, 32, |x, y| {
                Luma([((x * 7 + y * 3 + i * 11) % 256) as u8])
            });
            let path = dir.join(format!("img{i}.png"));
            img.save(&path)?;
            paths.push(path);
        }

        let config = ScanConfig {
            window: (8, 8),
            stride: (4, 4),
            scales: vec![1.0],
            score_threshold: 2.0,
        };
        let detector = SlidingWindowDetector::new(config, CornerClassifier)?;
        let template = ScoreHistogram::new(0.0, 1.0, 0.1)?;

        let parallel = detector.histogram_batch(&paths, &template)?;

        let mut sequential = template.clone();
        for path in &paths {
            let image = ImageUtils::load_grayscale(path)?;
            detector.scan_image(&image, &mut sequential)?;
        }

        assert_eq!(parallel.bins(), sequential.bins());
        assert_eq!(parallel.total(), 4 * 49);

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
