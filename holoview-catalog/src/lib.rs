//! Product, feature, and price catalog for Holoview licensing.
//!
//! Everything purchasable is a closed enumeration with exhaustive lookup
//! tables: unknown identifiers are rejected with a typed error instead of
//! being carried around as free-form strings. The catalog is static — prices
//! and product/feature mappings change only with a release.

mod error;
mod feature;
mod product;

pub use error::{CatalogError, CatalogResult};
pub use feature::FeatureId;
pub use product::{OptionCategory, ProductId};
