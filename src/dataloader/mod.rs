pub mod collection;
pub mod config;
pub mod domain;
pub mod error;
pub mod image_io;
pub mod info;
pub mod mat;
pub mod names;
pub mod office31;
pub mod office_caltech;
pub mod samples;
pub mod transform;

pub use collection::{load_and_preprocess_office31, load_and_resize_office31, Office31Collection};
pub use config::DatasetConfig;
pub use domain::{Office31Domain, OfficeCaltechDomain};
pub use error::{DatasetError, Result};
pub use image_io::{load_image, load_image_url};
pub use mat::{MatFileReader, MetadataReader};
pub use names::{resolve_image_path, ImageName};
pub use office31::load_office31_domain;
pub use office_caltech::{load_office_caltech_domain, load_office_caltech_domain_with};
pub use samples::DomainSamples;
pub use transform::{ImageResize, Preprocess, Resize};
