//! HTTP page source for paginated JSON collection endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

use super::PageSource;
use crate::error::FetchError;
use crate::model::Item;
use crate::model::Page;

const USER_AGENT: &str = concat!("pageselect/", env!("CARGO_PKG_VERSION"));

/// Fetches pages from a REST collection endpoint.
///
/// Each request is `GET {url}?page={n}` (plus `limit` and `fields` when
/// configured). The body must look like:
///
/// ```json
/// { "data": [ { "id": 1, ... }, ... ], "pagination": { "total": 123 } }
/// ```
///
/// Anything else is reported as [`FetchError::Parse`].
///
/// This source is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use pageselect_lib::source::HttpPageSource;
///
/// let source = HttpPageSource::builder()
///     .url("https://api.artic.edu/api/v1/artworks")
///     .limit(12)
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpPageSource {
    inner: Arc<HttpPageSourceInner>,
}

struct HttpPageSourceInner {
    base_url: Url,
    limit: Option<usize>,
    fields: Vec<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpPageSource {
    /// Creates a new builder for constructing a source.
    pub fn builder() -> HttpPageSourceBuilder<Missing> {
        HttpPageSourceBuilder::new()
    }

    /// Returns the collection endpoint without paging parameters.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Returns the configured `limit` (page size), if any.
    pub fn limit(&self) -> Option<usize> {
        self.inner.limit
    }

    /// Builds the request URL for a page.
    ///
    /// Query parameters already on the base URL are kept, except the paging
    /// parameters this source controls.
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.inner.base_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !matches!(key.as_ref(), "page" | "limit" | "fields"))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in &kept {
                query.append_pair(key, value);
            }
            query.append_pair("page", &page.to_string());
            if let Some(limit) = self.inner.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if !self.inner.fields.is_empty() {
                query.append_pair("fields", &self.inner.fields.join(","));
            }
        }
        url
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout(self.inner.timeout.unwrap_or_default());
        }
        FetchError::from(err)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, page: u32) -> Result<Page, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidPage(page));
        }

        let url = self.page_url(page);
        debug!("GET {}", url);

        let mut request = self
            .inner
            .http_client
            .get(url)
            .header(ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(FetchError::http(status.as_u16(), message));
        }

        let envelope: PageEnvelope = serde_json::from_str(&body)
            .map_err(|e| FetchError::parse_with_body(e.to_string(), body.as_str()))?;

        if let Some(current) = envelope.pagination.current_page {
            if current != page {
                warn!("requested page {} but endpoint reported page {}", page, current);
            }
        }

        debug!(
            "page {}: {} items, {} total",
            page,
            envelope.data.len(),
            envelope.pagination.total
        );

        Ok(Page::new(page, envelope.data, envelope.pagination.total))
    }
}

impl std::fmt::Debug for HttpPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageSource")
            .field("base_url", &self.inner.base_url.as_str())
            .field("limit", &self.inner.limit)
            .field("fields", &self.inner.fields)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

/// Response body of a collection endpoint.
#[derive(Debug, Deserialize)]
struct PageEnvelope {
    /// The items on this page.
    data: Vec<Item>,
    pagination: Pagination,
}

/// Pagination block of a collection response.
#[derive(Debug, Deserialize)]
struct Pagination {
    /// Total number of items in the dataset.
    total: u64,
    /// Page the server actually served.
    current_page: Option<u32>,
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpPageSource`].
///
/// # Required Fields
///
/// - `url` - The collection endpoint
pub struct HttpPageSourceBuilder<U> {
    url: U,
    limit: Option<usize>,
    fields: Vec<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<Client>,
}

impl HttpPageSourceBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            limit: None,
            fields: Vec::new(),
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            http_client: None,
        }
    }

    /// Sets the collection endpoint URL.
    ///
    /// # Example
    ///
    /// ```ignore
    /// .url("https://api.artic.edu/api/v1/artworks")
    /// ```
    pub fn url(self, url: impl Into<String>) -> HttpPageSourceBuilder<Set<String>> {
        HttpPageSourceBuilder {
            url: Set(url.into()),
            limit: self.limit,
            fields: self.fields,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpPageSourceBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpPageSourceBuilder<U> {
    /// Sets the page size sent as the `limit` parameter.
    ///
    /// Without it the endpoint's default page size applies.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restricts the returned fields (`fields=a,b,c`).
    ///
    /// `id` is always requested since selection depends on it.
    pub fn fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        let mut fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_string()).collect();
        if !fields.is_empty() && !fields.iter().any(|f| f == "id") {
            fields.insert(0, "id".to_string());
        }
        self.fields = fields;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header of the default client.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpPageSourceBuilder<Set<String>> {
    /// Builds the [`HttpPageSource`].
    ///
    /// Fails with [`FetchError::InvalidUrl`] if the URL does not parse, and
    /// with [`FetchError::Network`] if the default client cannot be created.
    pub fn build(self) -> Result<HttpPageSource, FetchError> {
        let base_url = Url::parse(&self.url.0)?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(self.url.0));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder()
                    .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(FetchError::Network)?
            }
        };

        Ok(HttpPageSource {
            inner: Arc::new(HttpPageSourceInner {
                base_url,
                limit: self.limit,
                fields: self.fields,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
