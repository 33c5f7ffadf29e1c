use anyhow::Context;
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use thiserror::Error as ThisError;
use url::Url;

/// Thin wrapper over a traced reqwest client. Failed requests are not retried,
/// every failure is reported straight back to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: ClientWithMiddleware,
}

#[derive(ThisError, Debug)]
pub enum HttpClientError {
    #[error("httpBuilderError {0}")]
    HTTPBuilderError(String),
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self, HttpClientError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|err| HttpClientError::HTTPBuilderError(format!("{err} {user_agent}")))?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| HttpClientError::HTTPBuilderError(err.to_string()))?;

        Ok(Self {
            client: ClientBuilder::new(client)
                .with(TracingMiddleware::default())
                .build(),
        })
    }

    /// Sends a GET request and hands back the raw response, whatever its status.
    pub async fn get(&self, url: Url) -> anyhow::Result<Response> {
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch request from {url}"))
    }

    pub async fn get_json<DTO: DeserializeOwned>(&self, url: Url) -> anyhow::Result<DTO> {
        let response = self.get(url).await?;
        let err_msg = format!("Failed to deserialize response {response:?}");
        response.json::<DTO>().await.context(err_msg)
    }
}
