use thiserror::Error;

/// Audit-level failures. Only the initial page load (and session setup
/// before it) can fail an audit; every auxiliary check degrades into a
/// typed value on the record instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid audit URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to load {url}: {source}")]
    PageLoad {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
