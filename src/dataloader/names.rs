use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::config::DatasetConfig;
use super::domain::OfficeCaltechDomain;
use super::error::{DatasetError, Result};

// Caltech256_<category>_<code>_<image_id>, the category may contain underscores
static CALTECH_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Caltech256_(.*)_([^_]*)_([^_]*)$").unwrap());

// <prefix>_<category>_frame_<num>
static OFFICE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^_]*)_(.*)_(frame_[^_]*)$").unwrap());

/// Caltech-256 directory names for the codes whose Office-Caltech name differs.
pub const CALTECH_CATEGORY_NAMES: [(&str, &str); 9] = [
    ("003", "backpack"),
    ("041", "coffee-mug"),
    ("045", "computer-keyboard"),
    ("046", "computer-monitor"),
    ("047", "computer-mouse"),
    ("101", "head-phones"),
    ("127", "laptop-101"),
    ("224", "touring-bike"),
    ("238", "video-projector"),
];

pub fn caltech_category_name(code: &str) -> Option<&'static str> {
    CALTECH_CATEGORY_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// An image identifier from an Office-Caltech `imgNames` array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageName {
    Caltech {
        category: String,
        code: String,
        image_id: String,
    },
    Office {
        domain: OfficeCaltechDomain,
        prefix: String,
        category: String,
        frame: String,
    },
}

impl ImageName {
    /// Parses `name` with the rule of `domain`. A name that does not fit is an error.
    pub fn parse(domain: OfficeCaltechDomain, name: &str) -> Result<Self> {
        let mismatch = || DatasetError::NameMismatch {
            domain: domain.to_string(),
            name: name.to_string(),
        };

        match domain {
            OfficeCaltechDomain::Caltech => {
                let caps = CALTECH_NAME.captures(name).ok_or_else(mismatch)?;
                let code = caps[2].to_string();
                let category = caltech_category_name(&code)
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[1].to_string());
                Ok(ImageName::Caltech {
                    category,
                    code,
                    image_id: caps[3].to_string(),
                })
            }
            _ => {
                let caps = OFFICE_NAME.captures(name).ok_or_else(mismatch)?;
                Ok(ImageName::Office {
                    domain,
                    prefix: caps[1].to_string(),
                    category: caps[2].to_string(),
                    frame: caps[3].to_string(),
                })
            }
        }
    }

    pub fn path(&self, config: &DatasetConfig) -> PathBuf {
        match self {
            ImageName::Caltech {
                category,
                code,
                image_id,
            } => config
                .caltech256_root
                .join(format!("{code}.{category}"))
                .join(format!("{code}_{image_id}.jpg")),
            // The path uses the requested domain, not the prefix embedded in the name
            ImageName::Office {
                domain,
                category,
                frame,
                ..
            } => config
                .office31_root
                .join(domain.as_str())
                .join("images")
                .join(category)
                .join(format!("{frame}.jpg")),
        }
    }
}

/// Parses `name` and maps it to the file it refers to.
pub fn resolve_image_path(
    config: &DatasetConfig,
    domain: OfficeCaltechDomain,
    name: &str,
) -> Result<PathBuf> {
    Ok(ImageName::parse(domain, name)?.path(config))
}
