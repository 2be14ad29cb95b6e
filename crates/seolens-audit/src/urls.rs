//! URL normalization and classification helpers for the audit pipeline.

use url::Url;

use crate::error::AuditError;

/// Normalizes user-submitted input into an absolute, protocol-qualified URL.
///
/// Bare domains get an `https://` prefix; anything without a resolvable host
/// is rejected.
///
/// # Errors
///
/// Returns [`AuditError::InvalidUrl`] when the input does not parse as an
/// absolute http(s) URL or lacks a host.
pub fn normalize_audit_url(raw: &str) -> Result<Url, AuditError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidUrl {
            url: raw.to_string(),
            reason: "empty input".to_string(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| AuditError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AuditError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(AuditError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}

/// Host portion of the URL, including any port.
///
/// The `url` crate lower-cases hosts during parsing, so comparisons against
/// this value are case-insensitive by construction.
#[must_use]
pub fn domain_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Count of non-empty path segments.
#[must_use]
pub fn path_depth(url: &Url) -> usize {
    url.path_segments()
        .map_or(0, |segments| segments.filter(|s| !s.is_empty()).count())
}

/// Whether an anchor href is worth probing: fragments, script pseudo-links,
/// and mail/phone links are skipped.
#[must_use]
pub fn is_checkable_href(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:"))
}

/// Resolves an href against the page URL; `None` for unresolvable or
/// non-http(s) targets.
#[must_use]
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let joined = base.join(href.trim()).ok()?;
    matches!(joined.scheme(), "http" | "https").then_some(joined)
}

/// A link is internal when it is root-relative or mentions the audited
/// domain anywhere in the href; external when it carries an absolute
/// scheme and is not internal.
#[must_use]
pub fn classify_href(href: &str, domain: &str) -> LinkKind {
    let href = href.trim();
    if href.starts_with('/') || href.contains(domain) {
        return LinkKind::Internal;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return LinkKind::External;
    }
    LinkKind::Other
}

/// Classification of a page link relative to the audited domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    /// Relative paths, fragments, and pseudo-links that are neither.
    Other,
}
