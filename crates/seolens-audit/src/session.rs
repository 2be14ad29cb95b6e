use std::time::{Duration, Instant};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::AuditError;

/// Settings for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Timeout for the main page load and the search-results fetch.
    pub page_timeout_secs: u64,
    /// Shorter timeout for auxiliary probes (robots.txt, sitemap, links).
    pub probe_timeout_secs: u64,
    pub user_agent: String,
    /// Search endpoint the competitive extractor queries. Points at a mock
    /// server in tests.
    pub search_base_url: String,
    /// Upper bound on anchors sampled for the broken-link check.
    pub link_check_limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: 30,
            probe_timeout_secs: 10,
            user_agent: "seolens/0.1 (site-audit)".to_string(),
            search_base_url: "https://www.google.com/search".to_string(),
            link_check_limit: 20,
        }
    }
}

impl AuditConfig {
    /// Builds audit settings from the application config.
    #[must_use]
    pub fn from_app(config: &seolens_core::AppConfig) -> Self {
        Self {
            page_timeout_secs: config.page_timeout_secs,
            probe_timeout_secs: config.probe_timeout_secs,
            user_agent: config.user_agent.clone(),
            search_base_url: config.search_base_url.clone(),
            link_check_limit: config.link_check_limit,
        }
    }
}

/// The target page as fetched, before any interpretation.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub status: u16,
    /// URL after redirects; informational, the pipeline keys everything
    /// off the normalized input URL.
    pub final_url: String,
    pub timing: PageTiming,
}

/// Wall-clock measurements taken around the page fetch.
#[derive(Debug, Clone, Copy)]
pub struct PageTiming {
    /// Request start until the full body arrived.
    pub load_time_ms: u64,
    /// Request start until response headers arrived.
    pub first_byte_ms: u64,
    pub transfer_size_bytes: u64,
}

/// What an auxiliary fetch came back with. Probes never raise: transport
/// failures (DNS, refused connection, timeout) collapse into
/// [`ProbeOutcome::TransportError`], which callers read as "resource absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 2xx response.
    Success(u16),
    /// Any non-2xx response.
    HttpError(u16),
    TransportError,
}

impl ProbeOutcome {
    /// Whether the probe proved the resource exists (exactly HTTP 200).
    #[must_use]
    pub fn found(&self) -> bool {
        matches!(self, ProbeOutcome::Success(200))
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Success(status) | ProbeOutcome::HttpError(status) => Some(*status),
            ProbeOutcome::TransportError => None,
        }
    }
}

/// One page-loading session, scoped to a single audit.
///
/// The orchestrator owns the session for the audit's duration and lends it
/// to extractors; dropping it releases the connection pool on every exit
/// path, including mid-audit failure.
pub struct AuditSession {
    client: Client,
    probe_timeout: Duration,
    search_base_url: String,
}

impl AuditSession {
    /// Opens a session with configured timeouts and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn open(config: &AuditConfig) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.page_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            search_base_url: config.search_base_url.clone(),
        })
    }

    /// Loads a page and measures wall-clock timing around the fetch.
    ///
    /// Non-2xx statuses are NOT errors here: a 404 page still has auditable
    /// markup. Only transport-level failures surface.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::PageLoad`] when the request cannot complete at
    /// all (DNS failure, refused connection, timeout, body read failure).
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, AuditError> {
        let started = Instant::now();
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| AuditError::PageLoad {
                    url: url.to_string(),
                    source,
                })?;

        let first_byte_ms = elapsed_ms(started);
        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .map_err(|source| AuditError::PageLoad {
                url: url.to_string(),
                source,
            })?;
        let load_time_ms = elapsed_ms(started);

        Ok(FetchedPage {
            status,
            final_url,
            timing: PageTiming {
                load_time_ms,
                first_byte_ms,
                transfer_size_bytes: body.len() as u64,
            },
            html: body,
        })
    }

    /// Status probe for an auxiliary resource, with the short probe timeout.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self
            .client
            .get(url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    ProbeOutcome::Success(status.as_u16())
                } else {
                    ProbeOutcome::HttpError(status.as_u16())
                }
            }
            Err(error) => {
                tracing::debug!(url, error = %error, "probe transport failure");
                ProbeOutcome::TransportError
            }
        }
    }

    /// Fetches the search-results page for a keyword from the configured
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::PageLoad`] on transport failure; callers fold
    /// this into the competitive error marker rather than propagating it.
    pub async fn fetch_search_results(&self, keyword: &str) -> Result<FetchedPage, AuditError> {
        let url = self.search_url(keyword);
        self.fetch_page(&url).await
    }

    /// Builds the search URL for a keyword, percent-encoding the query.
    pub(crate) fn search_url(&self, keyword: &str) -> String {
        let base = self.search_base_url.trim_end_matches('/');
        let query = utf8_percent_encode(keyword, NON_ALPHANUMERIC);
        format!("{base}?q={query}&num=10&hl=en")
    }
}

#[allow(clippy::cast_possible_truncation)] // audit timeouts cap elapsed far below u64::MAX ms
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
