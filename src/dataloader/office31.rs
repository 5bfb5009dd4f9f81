use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::config::DatasetConfig;
use super::domain::Office31Domain;
use super::error::Result;
use super::image_io::load_image;
use super::samples::DomainSamples;

/// `<office31_root>/<domain>/images`, one subdirectory per category.
pub fn office31_images_dir(config: &DatasetConfig, domain: Office31Domain) -> PathBuf {
    config.office31_root.join(domain.as_str()).join("images")
}

/// Loads every image of `domain`, labelled by the position of its category
/// directory in sorted order.
///
/// Samples are grouped by category and sorted by file name within a category.
/// A missing domain directory or an empty category contributes no samples.
pub fn load_office31_domain(config: &DatasetConfig, domain: Office31Domain) -> Result<DomainSamples> {
    let images_dir = office31_images_dir(config, domain);
    if !images_dir.is_dir() {
        log::warn!("{} does not exist, {} has no samples", images_dir.display(), domain);
        return DomainSamples::new(Vec::new(), Vec::new());
    }

    let categories = sorted_entries(&images_dir, |path| path.is_dir())?;

    let mut images = Vec::new();
    let mut labels = Vec::new();
    let mut names = Vec::with_capacity(categories.len());

    for (label, category_dir) in categories.iter().enumerate() {
        let files = sorted_entries(category_dir, |path| {
            path.is_file() && has_extension(path, &config.image_extension)
        })?;
        log::debug!("{}: {} images in {}", domain, files.len(), category_dir.display());

        for file in &files {
            images.push(load_image(file)?);
            labels.push(label as i32);
        }

        names.push(
            category_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }

    log::info!("{}: loaded {} images in {} categories", domain, images.len(), names.len());
    Ok(DomainSamples::new(images, labels)?.with_categories(names))
}

// read_dir makes no ordering promise, so entries are sorted by file name
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()?;
    // Dot entries are skipped, as a `*` glob would
    entries.retain(|path| !is_hidden(path) && keep(path));
    entries.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

// Exact, case-sensitive match, like a `*.jpg` glob
fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == ext)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_sensitive() {
        assert!(has_extension(Path::new("a/frame_0001.jpg"), "jpg"));
        assert!(!has_extension(Path::new("a/frame_0001.JPG"), "jpg"));
        assert!(!has_extension(Path::new("a/frame_0001"), "jpg"));
    }

    #[test]
    fn dot_entries_are_hidden() {
        assert!(is_hidden(Path::new("mug/._frame_0001.jpg")));
        assert!(is_hidden(Path::new("images/.thumbs")));
        assert!(!is_hidden(Path::new("mug/frame_0001.jpg")));
    }

    #[test]
    fn images_dir_layout() {
        let config = DatasetConfig::default().with_office31_root("/data/office31");
        assert_eq!(
            office31_images_dir(&config, Office31Domain::Dslr),
            PathBuf::from("/data/office31/dslr/images")
        );
    }

    #[test]
    fn missing_domain_is_empty() {
        let config = DatasetConfig::default().with_office31_root("/definitely/not/here");
        let samples = load_office31_domain(&config, Office31Domain::Webcam).unwrap();
        assert!(samples.is_empty());
        assert!(samples.labels().is_empty());
    }
}
