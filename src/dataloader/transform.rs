use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{Array3, Array4};

use super::error::Result;

/// Batched image preprocessing supplied by a feature-extraction network.
pub trait Preprocess {
    fn preprocess_many(&self, images: &[RgbImage]) -> Result<Array4<f32>>;
}

/// Single-image resize to an `H x W x C` array.
pub trait Resize {
    fn resize(&self, image: &RgbImage) -> Result<Array3<f32>>;
}

impl<F> Preprocess for F
where
    F: Fn(&[RgbImage]) -> Result<Array4<f32>>,
{
    fn preprocess_many(&self, images: &[RgbImage]) -> Result<Array4<f32>> {
        self(images)
    }
}

/// Resizes to a fixed size and scales channels to `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct ImageResize {
    pub width: u32,
    pub height: u32,
    pub filter: FilterType,
}

impl ImageResize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: FilterType::Triangle,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl Resize for ImageResize {
    fn resize(&self, image: &RgbImage) -> Result<Array3<f32>> {
        let resized = imageops::resize(image, self.width, self.height, self.filter);
        let (width, height) = resized.dimensions();
        let data = resized.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
        Ok(Array3::from_shape_vec((height as usize, width as usize, 3), data)?)
    }
}
