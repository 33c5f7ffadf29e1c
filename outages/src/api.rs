use crate::record::OutageRecord;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shared_kernel::http_client::HttpClient;
use shared_kernel::location::Location;
use thiserror::Error as ThisError;
use url::Url;

pub const OUTAGES_PATH: &str = "/api/outages";
pub const GENERIC_SERVER_ERROR: &str = "Ошибка сервера";

#[derive(ThisError, Debug)]
pub enum OutageFetchError {
    /// Non-success status. Holds the server's message or a fallback.
    #[error("{0}")]
    Server(String),
    #[error(transparent)]
    Transport(anyhow::Error),
    #[error(transparent)]
    Decode(anyhow::Error),
}

#[async_trait]
pub trait OutageFetcher: Send + Sync {
    async fn fetch_outages(&self, location: Location)
        -> Result<Vec<OutageRecord>, OutageFetchError>;
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutagesApiConfig {
    pub base_url: String,
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    OUTAGES_PATH.to_owned()
}

/// Client for `GET /api/outages?lat=..&lon=..`.
#[derive(Clone)]
pub struct OutagesApi {
    client: HttpClient,
    endpoint: Url,
}

impl OutagesApi {
    pub fn new(client: HttpClient, config: &OutagesApiConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.base_url)
            .and_then(|base| base.join(&config.path))
            .with_context(|| {
                format!(
                    "Failed to build outages url from {} and {}",
                    config.base_url, config.path
                )
            })?;
        Ok(Self { client, endpoint })
    }

    pub fn query_url(&self, location: Location) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &location.latitude.to_string())
            .append_pair("lon", &location.longitude.to_string());
        url
    }
}

/// Message for a non-success response: the `error` string of a JSON body, the
/// status line when the body is JSON without one, the generic text otherwise.
fn server_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP error! status: {status}")),
        Err(_) => GENERIC_SERVER_ERROR.to_owned(),
    }
}

#[async_trait]
impl OutageFetcher for OutagesApi {
    #[tracing::instrument(skip(self), level = "info")]
    async fn fetch_outages(
        &self,
        location: Location,
    ) -> Result<Vec<OutageRecord>, OutageFetchError> {
        let url = self.query_url(location);
        let response = self
            .client
            .get(url)
            .await
            .map_err(OutageFetchError::Transport)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read outages response")
            .map_err(OutageFetchError::Transport)?;

        if !status.is_success() {
            return Err(OutageFetchError::Server(server_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let value = serde_json::from_str::<Value>(&body)
            .context("Failed to parse outages response")
            .map_err(OutageFetchError::Decode)?;
        let records = OutageRecord::list_from_json(&value);
        tracing::debug!(count = records.len(), "outages received");
        Ok(records)
    }
}
