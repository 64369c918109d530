//! Image loading and pyramid resizing using the image crate

use crate::Result;
use anyhow::{Context, ensure};
use image::GrayImage;
use image::imageops::{self, FilterType};
use std::borrow::Cow;
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load image as 8-bit grayscale
    pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
        Ok(img.to_luma8())
    }

    /// Resize by `scale`, borrowing the input when the scale is 1.
    pub fn resize_by(image: &GrayImage, scale: f64) -> Result<Cow<'_, GrayImage>> {
        ensure!(
            scale.is_finite() && scale > 0.0,
            "scale must be finite and > 0, got {}",
            scale
        );
        if (scale - 1.0).abs() < f64::EPSILON {
            return Ok(Cow::Borrowed(image));
        }

        let (width, height) = Self::scaled_dimensions(image.dimensions(), scale);
        Ok(Cow::Owned(imageops::resize(
            image,
            width,
            height,
            FilterType::Triangle,
        )))
    }

    /// Dimensions after resizing by `scale`, at least 1x1
    pub fn scaled_dimensions((width, height): (u32, u32), scale: f64) -> (u32, u32) {
        let w = (width as f64 * scale).round().max(1.0) as u32;
        let h = (height as f64 * scale).round().max(1.0) as u32;
        (w, h)
    }
}
