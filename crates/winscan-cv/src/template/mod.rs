//! Template-correlation reference classifier

pub mod matcher;

pub use matcher::TemplateClassifier;

use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use image::GrayImage;
use std::path::Path;

/// Template data structure
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub image: GrayImage,
}

impl Template {
    pub fn new(name: String, image: GrayImage) -> Self {
        Self { name, image }
    }

    /// Load a grayscale template, named after the file stem
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = ImageUtils::load_grayscale(path)
            .with_context(|| format!("Failed to load template: {:?}", path))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template".to_string());
        Ok(Self::new(name, image))
    }
}
