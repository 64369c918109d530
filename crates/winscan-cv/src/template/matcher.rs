//! Zero-mean normalized cross-correlation against a template

use super::Template;
use crate::traits::{Classifier, WindowView};
use crate::Result;
use anyhow::ensure;
use image::imageops::{self, FilterType};

/// Below this norm a patch is treated as flat and scores 0
const FLAT_NORM: f64 = 1e-9;

/// Scores windows by ZNCC with a template resized to the window size.
///
/// Scores lie in `[-1, 1]`; flat windows or templates score 0.
pub struct TemplateClassifier {
    name: String,
    width: u32,
    height: u32,
    /// Template pixels minus their mean, row-major
    centered: Vec<f64>,
    norm: f64,
}

impl TemplateClassifier {
    pub fn new(template: &Template, window: (u32, u32)) -> Result<Self> {
        let (width, height) = window;
        ensure!(width > 0 && height > 0, "window must be non-empty");

        let resized = imageops::resize(&template.image, width, height, FilterType::Triangle);
        let values: Vec<f64> = resized.pixels().map(|p| f64::from(p[0])).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let norm = centered.iter().map(|v| v * v).sum::<f64>().sqrt();

        Ok(Self {
            name: format!("template '{}'", template.name),
            width,
            height,
            centered,
            norm,
        })
    }
}

impl Classifier for TemplateClassifier {
    fn score(&self, window: &WindowView<'_>) -> Result<f64> {
        ensure!(
            window.width() == self.width && window.height() == self.height,
            "window {}x{} does not match template {}x{}",
            window.width(),
            window.height(),
            self.width,
            self.height
        );
        if self.norm < FLAT_NORM {
            return Ok(0.0);
        }

        let values: Vec<f64> = window.pixels().map(f64::from).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        let mut dot = 0.0;
        let mut energy = 0.0;
        for (v, t) in values.iter().zip(&self.centered) {
            let c = v - mean;
            dot += c * t;
            energy += c * c;
        }

        let norm = energy.sqrt();
        if norm < FLAT_NORM {
            return Ok(0.0);
        }
        Ok((dot / (norm * self.norm)).clamp(-1.0, 1.0))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gradient(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([(x * 10 + y * 3) as u8]))
    }

    #[test]
    fn test_identical_window_scores_one() -> Result<()> {
        let template = Template::new("grad".into(), gradient(16, 16));
        let classifier = TemplateClassifier::new(&template, (16, 16))?;

        let image = gradient(16, 16);
        let window = WindowView::new(&image, 0, 0, 16, 16)?;
        assert!((classifier.score(&window)? - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_inverted_window_scores_minus_one() -> Result<()> {
        let template = Template::new("grad".into(), gradient(16, 16));
        let classifier = TemplateClassifier::new(&template, (16, 16))?;

        let mut image = gradient(16, 16);
        image::imageops::invert(&mut image);
        let window = WindowView::new(&image, 0, 0, 16, 16)?;
        assert!((classifier.score(&window)? + 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_flat_window_scores_zero() -> Result<()> {
        let template = Template::new("grad".into(), gradient(8, 8));
        let classifier = TemplateClassifier::new(&template, (8, 8))?;

        let image = GrayImage::from_pixel(8, 8, Luma([90]));
        let window = WindowView::new(&image, 0, 0, 8, 8)?;
        assert_eq!(classifier.score(&window)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_window_size_mismatch_is_error() -> Result<()> {
        let template = Template::new("grad".into(), gradient(8, 8));
        let classifier = TemplateClassifier::new(&template, (8, 8))?;

        let image = gradient(16, 16);
        let window = WindowView::new(&image, 0, 0, 16, 16)?;
        assert!(classifier.score(&window).is_err());
        assert_eq!(classifier.name(), "template 'grad'");
        Ok(())
    }
}
