//! Purchasable products and the static price table.

use crate::error::{CatalogError, CatalogResult};
use crate::feature::FeatureId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A product that can appear on a completed checkout.
///
/// Each product unlocks one or more features. The set is closed; checkout
/// events naming anything else are rejected at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductId {
    #[serde(rename = "3d-models")]
    ThreeDModels,
    #[serde(rename = "parallax")]
    Parallax,
    #[serde(rename = "image-addition")]
    ImageAddition,
    #[serde(rename = "ndi")]
    Ndi,
    /// Everything except NDI, at a discount.
    #[serde(rename = "creator-bundle")]
    CreatorBundle,
}

/// The kind of checkout option a product represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionCategory {
    SingleFeature,
    Bundle,
}

impl ProductId {
    /// All products, in catalog order.
    pub const ALL: [ProductId; 5] = [
        ProductId::ThreeDModels,
        ProductId::Parallax,
        ProductId::ImageAddition,
        ProductId::Ndi,
        ProductId::CreatorBundle,
    ];

    /// Returns the wire name of this product.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeDModels => "3d-models",
            Self::Parallax => "parallax",
            Self::ImageAddition => "image-addition",
            Self::Ndi => "ndi",
            Self::CreatorBundle => "creator-bundle",
        }
    }

    /// Parses a wire name. Unknown names are rejected.
    pub fn parse(s: &str) -> CatalogResult<Self> {
        match s {
            "3d-models" => Ok(Self::ThreeDModels),
            "parallax" => Ok(Self::Parallax),
            "image-addition" => Ok(Self::ImageAddition),
            "ndi" => Ok(Self::Ndi),
            "creator-bundle" => Ok(Self::CreatorBundle),
            other => Err(CatalogError::UnknownProduct(other.to_string())),
        }
    }

    /// Returns the list price in cents (USD).
    #[must_use]
    pub fn price_cents(&self) -> u32 {
        match self {
            Self::ThreeDModels => 4_900,
            Self::Parallax => 2_900,
            Self::ImageAddition => 1_900,
            Self::Ndi => 9_900,
            Self::CreatorBundle => 7_900,
        }
    }

    /// Returns the features this product unlocks.
    #[must_use]
    pub fn features(&self) -> &'static [FeatureId] {
        match self {
            Self::ThreeDModels => &[FeatureId::ThreeDModels],
            Self::Parallax => &[FeatureId::Parallax],
            Self::ImageAddition => &[FeatureId::ImageAddition],
            Self::Ndi => &[FeatureId::Ndi],
            Self::CreatorBundle => &[
                FeatureId::ThreeDModels,
                FeatureId::Parallax,
                FeatureId::ImageAddition,
            ],
        }
    }

    /// Returns the checkout option category.
    #[must_use]
    pub fn category(&self) -> OptionCategory {
        match self {
            Self::CreatorBundle => OptionCategory::Bundle,
            _ => OptionCategory::SingleFeature,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
