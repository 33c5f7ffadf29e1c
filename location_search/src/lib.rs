use async_trait::async_trait;
use shared_kernel::location::Location;
use thiserror::Error as ThisError;

pub mod nominatim;

pub use nominatim::{NominatimConfig, NominatimSearcher};

#[derive(ThisError, Debug)]
pub enum SearchError {
    #[error("Cannot search for location with empty text")]
    EmptyQuery,
    #[error("geocoder responded with status {0}")]
    Status(u16),
    #[error("invalid coordinates in geocoder response: {0}")]
    InvalidCoordinates(String),
    #[error(transparent)]
    Request(#[from] anyhow::Error),
}

/// Resolves free-form address text to the single best matching point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider has no match.
    async fn locate_address(&self, address: &str) -> Result<Option<Location>, SearchError>;
}
