//! Error types for the catalog.

use thiserror::Error;

/// Catalog-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Feature identifier not in the closed feature set.
    #[error("unknown feature id: {0}")]
    UnknownFeature(String),

    /// Product identifier not in the closed product set.
    #[error("unknown product id: {0}")]
    UnknownProduct(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
