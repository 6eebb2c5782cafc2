use thiserror::Error;
use wavedeck_core::WavedeckError;

/// Errors that can occur in the catalog layer
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Cache capacity must be at least one entry
    #[error("Invalid cache capacity: {0}")]
    InvalidCapacity(usize),

    /// The wrapped resolver failed
    #[error(transparent)]
    Resolver(#[from] WavedeckError),
}

impl From<CatalogError> for WavedeckError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Resolver(inner) => inner,
            other => WavedeckError::Other(other.to_string()),
        }
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
