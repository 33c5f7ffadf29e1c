use crate::{Geocoder, SearchError};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shared_kernel::http_client::HttpClient;
use shared_kernel::location::Location;
use shared_kernel::non_empty_string;
use url::Url;

const SEARCH_PATH: &str = "/search";

non_empty_string!(LocationSearchText);

#[derive(Debug, Deserialize, Clone)]
pub struct NominatimConfig {
    pub host: String,
    /// Appended to every query to keep results inside the served city.
    pub area_suffix: String,
}

#[derive(Deserialize, Debug)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl TryFrom<NominatimPlace> for Location {
    type Error = SearchError;

    fn try_from(place: NominatimPlace) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| SearchError::InvalidCoordinates(format!("{}, {}", place.lat, place.lon)))
        };
        Ok(Location::new(parse(&place.lat)?, parse(&place.lon)?))
    }
}

#[derive(Clone)]
pub struct NominatimSearcher {
    client: HttpClient,
    config: NominatimConfig,
}

impl NominatimSearcher {
    pub fn new(client: HttpClient, config: NominatimConfig) -> Self {
        Self { client, config }
    }

    pub fn generate_search_url(&self, text: &LocationSearchText) -> anyhow::Result<Url> {
        let query = if self.config.area_suffix.is_empty() {
            text.inner()
        } else {
            format!("{}, {}", text, self.config.area_suffix)
        };
        Url::parse_with_params(
            &format!("{}{}", self.config.host.trim_end_matches('/'), SEARCH_PATH),
            &[("format", "json"), ("q", query.as_str()), ("limit", "1")],
        )
        .context("Failed to parse url")
    }
}

#[async_trait]
impl Geocoder for NominatimSearcher {
    #[tracing::instrument(skip(self), level = "info")]
    async fn locate_address(&self, address: &str) -> Result<Option<Location>, SearchError> {
        let text = LocationSearchText::try_from(address).map_err(|_| SearchError::EmptyQuery)?;
        let url = self.generate_search_url(&text)?;

        let response = self.client.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }
        let body = response
            .json::<Value>()
            .await
            .context("Failed to deserialize geocoder response")?;
        let places = serde_json::from_value::<Vec<NominatimPlace>>(body)
            .context("Geocoder response is not a list of places")?;

        let Some(place) = places.into_iter().next() else {
            tracing::info!("no place found");
            return Ok(None);
        };
        tracing::debug!(display_name = ?place.display_name, "place found");
        Location::try_from(place).map(Some)
    }
}
