use std::collections::HashSet;

use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

use seolens_core::record::{
    BrokenLinkSample, BrokenLinks, HeadingStructure, LinkStatus, SchemaMarkup,
};

use crate::session::{AuditSession, ProbeOutcome};
use crate::urls;

/// Directive assumed when the page carries no robots meta tag.
const DEFAULT_ROBOTS_DIRECTIVE: &str = "index, follow";

/// Markup-level findings from one parse of the page, plus the candidate
/// URLs queued for the broken-link check.
#[derive(Debug, Clone)]
pub struct MarkupScan {
    pub headings: HeadingStructure,
    pub schema_markup: SchemaMarkup,
    pub mobile_responsive: bool,
    pub robots_meta_directive: String,
    pub canonical_url: Option<String>,
    /// Absolute http(s) URLs to probe, deduplicated in document order and
    /// capped at the configured limit.
    pub link_candidates: Vec<String>,
}

/// Reads every markup-derived technical signal in a single pass over the
/// parsed document.
#[must_use]
pub fn scan_markup(doc: &Html, page_url: &Url, link_check_limit: usize) -> MarkupScan {
    MarkupScan {
        headings: collect_headings(doc),
        schema_markup: collect_schema(doc),
        mobile_responsive: viewport_is_responsive(doc),
        robots_meta_directive: robots_directive(doc),
        canonical_url: canonical_href(doc),
        link_candidates: collect_link_candidates(doc, page_url, link_check_limit),
    }
}

/// Probes every candidate sequentially and tallies the broken ones. A link
/// is broken on a 4xx/5xx response or when the request cannot complete;
/// the sample keeps at most the first ten.
pub async fn check_links(session: &AuditSession, candidates: &[String]) -> BrokenLinks {
    let mut broken_count = 0;
    let mut sample = Vec::new();

    for url in candidates {
        let status = match session.probe(url).await {
            ProbeOutcome::Success(_) => continue,
            ProbeOutcome::HttpError(code) if code >= 400 => LinkStatus::Http(code),
            ProbeOutcome::HttpError(_) => continue,
            ProbeOutcome::TransportError => LinkStatus::Unreachable,
        };
        broken_count += 1;
        if sample.len() < 10 {
            sample.push(BrokenLinkSample {
                url: url.clone(),
                status,
            });
        }
    }

    tracing::debug!(
        checked = candidates.len(),
        broken = broken_count,
        "link check complete"
    );

    BrokenLinks {
        checked_count: candidates.len(),
        broken_count,
        sample,
    }
}

fn collect_headings(doc: &Html) -> HeadingStructure {
    HeadingStructure {
        h1: heading_texts(doc, "h1"),
        h2: heading_texts(doc, "h2"),
        h3: heading_texts(doc, "h3"),
        h4: heading_texts(doc, "h4"),
        h5: heading_texts(doc, "h5"),
        h6: heading_texts(doc, "h6"),
    }
}

fn heading_texts(doc: &Html, level: &str) -> Vec<String> {
    let selector = Selector::parse(level).expect("valid heading selector");
    doc.select(&selector).map(|el| element_text(&el)).collect()
}

/// Concatenated text of an element with whitespace collapsed to single
/// spaces.
pub(crate) fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_schema(doc: &Html) -> SchemaMarkup {
    let selector =
        Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector");
    let types = doc
        .select(&selector)
        .map(|el| {
            let raw = el.text().collect::<String>();
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => declared_schema_type(&value),
                Err(_) => SchemaMarkup::INVALID_TYPE.to_string(),
            }
        })
        .collect();
    SchemaMarkup { types }
}

/// The `@type` a JSON-LD block declares: the string itself, the first entry
/// of a type list, or the unknown marker when neither is present.
fn declared_schema_type(value: &Value) -> String {
    match value.get("@type") {
        Some(Value::String(declared)) => declared.clone(),
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or(SchemaMarkup::UNKNOWN_TYPE)
            .to_string(),
        _ => SchemaMarkup::UNKNOWN_TYPE.to_string(),
    }
}

fn viewport_is_responsive(doc: &Html) -> bool {
    let selector = Selector::parse(r#"meta[name="viewport"]"#).expect("valid selector");
    doc.select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .any(|content| content.contains("width=device-width"))
}

fn robots_directive(doc: &Html) -> String {
    let selector = Selector::parse(r#"meta[name="robots"]"#).expect("valid selector");
    doc.select(&selector)
        .find_map(|el| el.value().attr("content"))
        .map_or_else(
            || DEFAULT_ROBOTS_DIRECTIVE.to_string(),
            |content| content.trim().to_string(),
        )
}

fn canonical_href(doc: &Html) -> Option<String> {
    let selector = Selector::parse(r#"link[rel="canonical"]"#).expect("valid selector");
    doc.select(&selector)
        .find_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(ToString::to_string)
}

fn collect_link_candidates(doc: &Html, page_url: &Url, limit: usize) -> Vec<String> {
    let selector = Selector::parse("a[href]").expect("valid selector");
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for element in doc.select(&selector) {
        if candidates.len() >= limit {
            break;
        }
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !urls::is_checkable_href(href) {
            continue;
        }
        let Some(resolved) = urls::resolve_href(page_url, href) else {
            continue;
        };
        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            candidates.push(resolved);
        }
    }

    candidates
}
