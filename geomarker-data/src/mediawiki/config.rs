use std::time::Duration;

/// English Wikipedia's action API.
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Default user agent; Wikimedia asks clients to identify themselves.
pub const DEFAULT_USER_AGENT: &str = "geomarker/0.1";

/// Deadline for one listing page.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for one coordinate lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`super::MediaWikiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaWikiConfig {
    /// Action API endpoint (the `api.php` URL).
    pub endpoint: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Deadline applied to listing requests.
    pub listing_timeout: Duration,
    /// Deadline applied to coordinate lookups.
    pub lookup_timeout: Duration,
}

impl Default for MediaWikiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            listing_timeout: DEFAULT_LISTING_TIMEOUT,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

impl MediaWikiConfig {
    /// Create a configuration pointing at `endpoint` with default deadlines.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the listing deadline.
    #[must_use]
    pub fn with_listing_timeout(mut self, timeout: Duration) -> Self {
        self.listing_timeout = timeout;
        self
    }

    /// Set the lookup deadline.
    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}
