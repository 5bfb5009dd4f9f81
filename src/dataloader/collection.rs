use std::collections::HashMap;

use image::RgbImage;
use ndarray::{Array1, Array3, Array4, ArrayView3, Axis};

use super::config::DatasetConfig;
use super::domain::Office31Domain;
use super::error::Result;
use super::office31::load_office31_domain;
use super::transform::{Preprocess, Resize};

/// All three Office-31 domains after post-processing.
#[derive(Clone, Debug, Default)]
pub struct Office31Collection {
    pub domains: Vec<Office31Domain>,
    pub images: HashMap<Office31Domain, Array4<f32>>,
    pub labels: HashMap<Office31Domain, Array1<i32>>,
}

impl Office31Collection {
    fn insert(&mut self, domain: Office31Domain, images: Array4<f32>, labels: Array1<i32>) {
        self.domains.push(domain);
        self.images.insert(domain, images);
        self.labels.insert(domain, labels);
    }
}

/// Loads every domain and runs its images through `network` as one batch.
pub fn load_and_preprocess_office31(config: &DatasetConfig, network: &impl Preprocess) -> Result<Office31Collection> {
    load_office31_with(config, |images| network.preprocess_many(images))
}

/// Loads every domain and resizes each image with `resizer`.
pub fn load_and_resize_office31(config: &DatasetConfig, resizer: &impl Resize) -> Result<Office31Collection> {
    load_office31_with(config, |images| {
        let resized = images
            .iter()
            .map(|image| resizer.resize(image))
            .collect::<Result<Vec<_>>>()?;
        stack_images(&resized)
    })
}

fn load_office31_with(
    config: &DatasetConfig,
    process: impl Fn(&[RgbImage]) -> Result<Array4<f32>>,
) -> Result<Office31Collection> {
    let mut collection = Office31Collection::default();

    for domain in Office31Domain::ALL {
        let samples = load_office31_domain(config, domain)?;
        let labels = samples.labels_array();
        let images = process(samples.images())?;
        log::debug!("{}: processed images have shape {:?}", domain, images.shape());
        collection.insert(domain, images, labels);
    }

    Ok(collection)
}

/// Stacks `H x W x C` arrays along a new leading axis. No images gives a `(0, 0, 0, 0)` array.
pub fn stack_images(images: &[Array3<f32>]) -> Result<Array4<f32>> {
    if images.is_empty() {
        return Ok(Array4::zeros((0, 0, 0, 0)));
    }
    let views: Vec<ArrayView3<f32>> = images.iter().map(|image| image.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}
