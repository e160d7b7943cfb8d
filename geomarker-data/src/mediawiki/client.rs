use std::time::Duration;

use async_trait::async_trait;
use geomarker_core::{
    Article, CoordinateResolver, Coordinates, Cursor, FetchError, ListingPage, ListingSource,
    PageSize, Resolution,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::config::MediaWikiConfig;
use super::response::{AllPagesResponse, ApiErrorBody, CoordinatesResponse};

/// Errors raised while constructing a [`MediaWikiClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured endpoint is not a valid URL.
    #[error("invalid MediaWiki endpoint '{endpoint}'")]
    Endpoint {
        /// Rejected endpoint text.
        endpoint: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Client for the MediaWiki action API.
///
/// One `reqwest::Client` is shared by listing and lookup calls so connections
/// are pooled across the crawl. Each request carries its own deadline.
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    client: Client,
    endpoint: Url,
    config: MediaWikiConfig,
}

impl MediaWikiClient {
    /// Create a client for `endpoint` with default deadlines.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the HTTP client fails
    /// to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(MediaWikiConfig::new(endpoint))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or the HTTP client fails
    /// to build.
    pub fn with_config(config: MediaWikiConfig) -> Result<Self, ClientBuildError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|source| ClientBuildError::Endpoint {
                endpoint: config.endpoint.clone(),
                source,
            })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.listing_timeout.max(config.lookup_timeout))
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &MediaWikiConfig {
        &self.config
    }

    /// Build the `list=allpages` URL for one page.
    ///
    /// `apfrom` is always sent; the empty value starts at the beginning.
    fn listing_url(&self, cursor: &Cursor, page_size: PageSize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("list", "allpages")
            .append_pair("aplimit", &page_size.get().to_string())
            .append_pair("apfrom", cursor.as_str());
        url
    }

    /// Build the `prop=coordinates` URL for one title.
    fn coordinates_url(&self, title: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("titles", title)
            .append_pair("prop", "coordinates");
        url
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T>(&self, url: Url, timeout: Duration) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url_text = url.to_string();
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url_text, timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url_text, timeout))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url_text, timeout))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode {
            url: url_text,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl ListingSource for MediaWikiClient {
    async fn fetch_page(
        &self,
        cursor: &Cursor,
        page_size: PageSize,
    ) -> Result<ListingPage, FetchError> {
        let url = self.listing_url(cursor, page_size);
        let url_text = url.to_string();
        let response: AllPagesResponse = self.get_json(url, self.config.listing_timeout).await?;
        convert_listing(response, &url_text)
    }
}

#[async_trait]
impl CoordinateResolver for MediaWikiClient {
    async fn resolve(&self, article: &Article) -> Result<Resolution, FetchError> {
        let url = self.coordinates_url(&article.title);
        let url_text = url.to_string();
        let response: CoordinatesResponse =
            self.get_json(url, self.config.lookup_timeout).await?;
        convert_coordinates(response, article.page_id, &url_text)
    }
}

/// Map a reqwest failure onto [`FetchError`].
fn convert_reqwest_error(error: &reqwest::Error, url: &str, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_owned(),
            timeout,
        };
    }

    if let Some(status) = error.status() {
        return FetchError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
        };
    }

    FetchError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

fn api_error(body: ApiErrorBody, url: &str) -> FetchError {
    FetchError::Api {
        url: url.to_owned(),
        code: body.code,
        info: body.info,
    }
}

/// Convert a decoded listing into a page.
///
/// A missing `query` block is an empty page; a missing or empty `apcontinue`
/// ends the walk.
fn convert_listing(response: AllPagesResponse, url: &str) -> Result<ListingPage, FetchError> {
    if let Some(error) = response.error {
        return Err(api_error(error, url));
    }

    let articles = response
        .query
        .map(|query| query.allpages)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| Article::new(entry.pageid, entry.title))
        .collect();
    let next = response
        .continuation
        .and_then(|continuation| continuation.apcontinue)
        .unwrap_or_default();

    Ok(ListingPage::new(articles, next))
}

/// Extract the first coordinate pair reported for `page_id`.
fn convert_coordinates(
    response: CoordinatesResponse,
    page_id: u64,
    url: &str,
) -> Result<Resolution, FetchError> {
    if let Some(error) = response.error {
        return Err(api_error(error, url));
    }

    let Some(entry) = response
        .query
        .and_then(|mut query| query.pages.remove(&page_id.to_string()))
        .and_then(|page| page.coordinates.into_iter().next())
    else {
        return Ok(Resolution::NotFound);
    };

    Coordinates::new(entry.lat, entry.lon)
        .map(Resolution::Found)
        .map_err(|err| FetchError::Decode {
            url: url.to_owned(),
            message: err.to_string(),
        })
}
