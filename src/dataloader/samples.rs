use image::RgbImage;
use ndarray::Array1;

use super::error::{DatasetError, Result};

/// Images of one domain with their labels, index-aligned.
#[derive(Clone, Debug, Default)]
pub struct DomainSamples {
    images: Vec<RgbImage>,
    labels: Vec<i32>,
    categories: Vec<String>,
}

impl DomainSamples {
    pub fn new(images: Vec<RgbImage>, labels: Vec<i32>) -> Result<Self> {
        if images.len() != labels.len() {
            return Err(DatasetError::LengthMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }

        Ok(Self {
            images,
            labels,
            categories: Vec::new(),
        })
    }

    /// Category names in label order.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn images(&self) -> &[RgbImage] {
        &self.images
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn labels_array(&self) -> Array1<i32> {
        Array1::from(self.labels.clone())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
