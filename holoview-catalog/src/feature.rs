//! Grantable feature identifiers.

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A capability that can be unlocked on a Holoview unit.
///
/// The wire form (JSON and catalog keys) uses the kebab-case names shown on
/// each variant. Ordered so feature sets iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureId {
    /// Rendering of uploaded 3D model files.
    #[serde(rename = "3d-models")]
    ThreeDModels,
    /// Depth-parallax playback mode.
    #[serde(rename = "parallax")]
    Parallax,
    /// Compositing still images into a running scene.
    #[serde(rename = "image-addition")]
    ImageAddition,
    /// NDI network video input.
    #[serde(rename = "ndi")]
    Ndi,
}

impl FeatureId {
    /// All features, in canonical order.
    pub const ALL: [FeatureId; 4] = [
        FeatureId::ThreeDModels,
        FeatureId::Parallax,
        FeatureId::ImageAddition,
        FeatureId::Ndi,
    ];

    /// Returns the wire name of this feature.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeDModels => "3d-models",
            Self::Parallax => "parallax",
            Self::ImageAddition => "image-addition",
            Self::Ndi => "ndi",
        }
    }

    /// Parses a wire name. Unknown names are rejected.
    pub fn parse(s: &str) -> CatalogResult<Self> {
        match s {
            "3d-models" => Ok(Self::ThreeDModels),
            "parallax" => Ok(Self::Parallax),
            "image-addition" => Ok(Self::ImageAddition),
            "ndi" => Ok(Self::Ndi),
            other => Err(CatalogError::UnknownFeature(other.to_string())),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
