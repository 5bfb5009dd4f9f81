use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::error::{DatasetError, Result};

/// Filesystem locations of the Office-31, Office-Caltech and Caltech-256 data.
#[derive(Clone, Debug)]
pub struct DatasetConfig {
    /// Holds `<domain>/images/<category>/*.<ext>`.
    pub office31_root: PathBuf,
    /// Holds the `*_SURF_L10.mat` and `*_SURF_L10_imgs.mat` files.
    pub office10_root: PathBuf,
    /// Holds the `<code>.<category>` directories of Caltech-256.
    pub caltech256_root: PathBuf,
    /// Extension matched by the directory loader, without the dot.
    pub image_extension: String,
}

impl DatasetConfig {
    pub fn build(self) -> Result<Self> {
        check_root("office31_root", &self.office31_root)?;
        check_root("office10_root", &self.office10_root)?;
        check_root("caltech256_root", &self.caltech256_root)?;
        check_extension(&self.image_extension)?;

        Ok(self)
    }

    pub fn with_office31_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.office31_root = root.into();
        self
    }

    pub fn with_office10_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.office10_root = root.into();
        self
    }

    pub fn with_caltech256_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.caltech256_root = root.into();
        self
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let data = home_dir().join("data");
        Self {
            office31_root: data.join("office31"),
            office10_root: PathBuf::from("../data/office10"),
            caltech256_root: data.join("caltech256").join("256_ObjectCategories"),
            image_extension: "jpg".to_string(),
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .unwrap_or_else(|| OsString::from("~"))
        .into()
}

fn check_root(name: &str, root: &Path) -> Result<()> {
    if root.as_os_str().is_empty() {
        return Err(DatasetError::InvalidConfig(format!("{name} is empty")));
    }
    Ok(())
}

fn check_extension(ext: &str) -> Result<()> {
    if ext.starts_with('.') || ImageFormat::from_extension(ext).is_none() {
        return Err(DatasetError::InvalidConfig(format!(
            "image_extension {ext:?} is not a known image extension"
        )));
    }
    Ok(())
}
