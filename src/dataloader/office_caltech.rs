use std::path::PathBuf;

use super::config::DatasetConfig;
use super::domain::OfficeCaltechDomain;
use super::error::{DatasetError, Result};
use super::image_io::load_image;
use super::mat::{MatFileReader, MetadataReader};
use super::names::resolve_image_path;
use super::samples::DomainSamples;

/// `(labels file, image index file)` of `domain`.
pub fn office_caltech_mat_paths(config: &DatasetConfig, domain: OfficeCaltechDomain) -> (PathBuf, PathBuf) {
    let stem = domain.mat_stem();
    (
        config.office10_root.join(format!("{stem}_SURF_L10.mat")),
        config.office10_root.join(format!("{stem}_SURF_L10_imgs.mat")),
    )
}

pub fn load_office_caltech_domain(config: &DatasetConfig, domain: OfficeCaltechDomain) -> Result<DomainSamples> {
    load_office_caltech_domain_with(config, domain, &MatFileReader)
}

/// Loads `domain` in the order of its image index, reading metadata through `reader`.
pub fn load_office_caltech_domain_with(
    config: &DatasetConfig,
    domain: OfficeCaltechDomain,
    reader: &impl MetadataReader,
) -> Result<DomainSamples> {
    let (labels_file, index_file) = office_caltech_mat_paths(config, domain);

    let labels = reader.labels(&labels_file)?;
    let names = reader.image_names(&index_file)?;
    if names.len() != labels.len() {
        return Err(DatasetError::LengthMismatch {
            images: names.len(),
            labels: labels.len(),
        });
    }

    // Resolve every name before touching the filesystem so a bad index fails fast
    let paths = names
        .iter()
        .map(|name| resolve_image_path(config, domain, name))
        .collect::<Result<Vec<_>>>()?;

    let images = paths
        .iter()
        .map(|path| load_image(path))
        .collect::<Result<Vec<_>>>()?;

    log::info!("{}: loaded {} images from {}", domain, images.len(), index_file.display());
    DomainSamples::new(images, labels)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn caltech_uses_caltech10_files() {
        let config = DatasetConfig::default().with_office10_root("/data/office10");
        let (labels, index) = office_caltech_mat_paths(&config, OfficeCaltechDomain::Caltech);
        assert_eq!(labels, PathBuf::from("/data/office10/Caltech10_SURF_L10.mat"));
        assert_eq!(index, PathBuf::from("/data/office10/Caltech10_SURF_L10_imgs.mat"));
    }

    #[test]
    fn office_domains_use_their_name() {
        let config = DatasetConfig::default().with_office10_root("/data/office10");
        let (labels, _) = office_caltech_mat_paths(&config, OfficeCaltechDomain::Amazon);
        assert_eq!(labels, PathBuf::from("/data/office10/amazon_SURF_L10.mat"));
    }

    struct FixedReader {
        labels: Vec<i32>,
        names: Vec<&'static str>,
    }

    impl MetadataReader for FixedReader {
        fn labels(&self, _: &Path) -> Result<Vec<i32>> {
            Ok(self.labels.clone())
        }

        fn image_names(&self, _: &Path) -> Result<Vec<String>> {
            Ok(self.names.iter().map(|name| name.to_string()).collect())
        }
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let reader = FixedReader {
            labels: vec![0, 1],
            names: vec!["amazon_mug_frame_0001"],
        };
        let err = load_office_caltech_domain_with(&DatasetConfig::default(), OfficeCaltechDomain::Amazon, &reader)
            .unwrap_err();
        assert!(matches!(err, DatasetError::LengthMismatch { images: 1, labels: 2 }));
    }

    #[test]
    fn malformed_name_fails_before_loading() {
        let reader = FixedReader {
            labels: vec![0, 0],
            names: vec!["amazon_mug_frame_0001", "amazon_mug_0002"],
        };
        let err = load_office_caltech_domain_with(&DatasetConfig::default(), OfficeCaltechDomain::Amazon, &reader)
            .unwrap_err();
        match err {
            DatasetError::NameMismatch { domain, name } => {
                assert_eq!(domain, "amazon");
                assert_eq!(name, "amazon_mug_0002");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_index_gives_empty_samples() {
        let reader = FixedReader {
            labels: Vec::new(),
            names: Vec::new(),
        };
        let samples =
            load_office_caltech_domain_with(&DatasetConfig::default(), OfficeCaltechDomain::Caltech, &reader).unwrap();
        assert!(samples.is_empty());
    }
}
