use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use shared_kernel::location::Location;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error as ThisError;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// How old a previously obtained position may be and still be reused.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("User denied Geolocation")]
    PermissionDenied,
    #[error("Position unavailable: {0}")]
    Unavailable(String),
    #[error("Timeout expired")]
    Timeout,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Location, GeolocationError>;
}

/// Runs a position request under `options.timeout`.
pub async fn locate(
    provider: &dyn GeolocationProvider,
    options: PositionOptions,
) -> Result<Location, GeolocationError> {
    tokio::time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| GeolocationError::Timeout)?
}

/// A device whose position is known up front, e.g. set in configuration.
pub struct FixedPosition(Location);

impl FixedPosition {
    pub fn new(location: Location) -> Self {
        Self(location)
    }
}

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Location, GeolocationError> {
        Ok(self.0)
    }
}

/// Reuses the last position while it is younger than `maximum_age`.
pub struct CachedGeolocation {
    inner: Arc<dyn GeolocationProvider>,
    last: Mutex<Option<(Location, Instant)>>,
}

impl CachedGeolocation {
    pub fn new(inner: Arc<dyn GeolocationProvider>) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl GeolocationProvider for CachedGeolocation {
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Location, GeolocationError> {
        let mut last = self.last.lock().await;
        if let Some((location, obtained_at)) = *last {
            if obtained_at.elapsed() <= options.maximum_age {
                tracing::debug!("reusing cached position");
                return Ok(location);
            }
        }
        let location = self.inner.current_position(options).await?;
        *last = Some((location, Instant::now()));
        Ok(location)
    }
}
