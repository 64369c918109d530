//! Winscan detection library
//!
//! Multi-scale sliding-window scanning on top of `winscan-core`, with
//! pluggable post-processing of the per-window score stream.

pub mod detection;
pub mod postprocess;
pub mod template;
pub mod utils;

// Re-export commonly used types
pub use detection::{
    DetectionConfig, ImageScan, ScanConfig, ScanReport, SlidingWindowDetector,
};
pub use postprocess::{
    HardNegativeRecorder, PostProcessingConfig, PostProcessor, ScoreHistogramAccumulator,
};
pub use template::{Template, TemplateClassifier};
pub use traits::{Classifier, WindowView};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the scanning system
pub mod traits {
    use super::*;
    use anyhow::bail;
    use image::GrayImage;

    /// One classifier evaluation window inside a (possibly rescaled) image.
    #[derive(Debug, Clone, Copy)]
    pub struct WindowView<'a> {
        image: &'a GrayImage,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    }

    impl<'a> WindowView<'a> {
        pub fn new(image: &'a GrayImage, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
            let (img_w, img_h) = image.dimensions();
            if width == 0 || height == 0 || x + width > img_w || y + height > img_h {
                bail!(
                    "window {}x{} at ({}, {}) outside {}x{} image",
                    width,
                    height,
                    x,
                    y,
                    img_w,
                    img_h
                );
            }
            Ok(Self {
                image,
                x,
                y,
                width,
                height,
            })
        }

        pub fn anchor(&self) -> (u32, u32) {
            (self.x, self.y)
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Pixel at window-relative coordinates
        pub fn pixel(&self, x: u32, y: u32) -> u8 {
            self.image.get_pixel(self.x + x, self.y + y)[0]
        }

        /// Window pixels in row-major order
        pub fn pixels(&self) -> impl Iterator<Item = u8> + '_ {
            (0..self.height).flat_map(move |y| (0..self.width).map(move |x| self.pixel(x, y)))
        }

        /// Copy the window out as its own image
        pub fn to_image(&self) -> GrayImage {
            image::imageops::crop_imm(self.image, self.x, self.y, self.width, self.height)
                .to_image()
        }
    }

    /// Scores one window; higher means more likely a positive.
    pub trait Classifier {
        fn score(&self, window: &WindowView<'_>) -> Result<f64>;

        fn name(&self) -> &str {
            "classifier"
        }
    }

    impl<C: Classifier + ?Sized> Classifier for &C {
        fn score(&self, window: &WindowView<'_>) -> Result<f64> {
            (**self).score(window)
        }

        fn name(&self) -> &str {
            (**self).name()
        }
    }

}
