use std::fmt;
use std::str::FromStr;

use super::error::DatasetError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Office31Domain {
    Amazon,
    Dslr,
    Webcam,
}

impl Office31Domain {
    pub const ALL: [Office31Domain; 3] = [
        Office31Domain::Amazon,
        Office31Domain::Dslr,
        Office31Domain::Webcam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Office31Domain::Amazon => "amazon",
            Office31Domain::Dslr => "dslr",
            Office31Domain::Webcam => "webcam",
        }
    }
}

/// Domains of the ten-category Office-Caltech subset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OfficeCaltechDomain {
    Amazon,
    Dslr,
    Webcam,
    Caltech,
}

impl OfficeCaltechDomain {
    pub const ALL: [OfficeCaltechDomain; 4] = [
        OfficeCaltechDomain::Amazon,
        OfficeCaltechDomain::Dslr,
        OfficeCaltechDomain::Webcam,
        OfficeCaltechDomain::Caltech,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfficeCaltechDomain::Amazon => "amazon",
            OfficeCaltechDomain::Dslr => "dslr",
            OfficeCaltechDomain::Webcam => "webcam",
            OfficeCaltechDomain::Caltech => "Caltech",
        }
    }

    /// File stem of the `*_SURF_L10*.mat` files for this domain.
    pub fn mat_stem(&self) -> &'static str {
        match self {
            OfficeCaltechDomain::Caltech => "Caltech10",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Office31Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OfficeCaltechDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Office31Domain {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Office31Domain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| DatasetError::UnknownDomain(s.to_string()))
    }
}

impl FromStr for OfficeCaltechDomain {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OfficeCaltechDomain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| DatasetError::UnknownDomain(s.to_string()))
    }
}
