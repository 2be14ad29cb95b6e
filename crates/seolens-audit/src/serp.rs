use scraper::{Html, Selector};

use seolens_core::record::{CompetitiveSignals, CompetitorEntry};

use crate::session::AuditSession;
use crate::technical::element_text;

/// How many ranked entries are read off the results page.
const MAX_RESULTS: usize = 10;

/// One ranked entry as it appears on the results page.
#[derive(Debug, Clone)]
pub(crate) struct SearchResult {
    /// 1-based rank in page order.
    pub position: u32,
    pub url: String,
    pub title: String,
    pub description: String,
}

/// Searches for the detected keyword and compares the audited domain
/// against the ranked results.
///
/// Best-effort throughout: a failed or non-success search fetch folds into
/// [`CompetitiveSignals::Unavailable`] so the audit carries on without
/// competitive data.
pub async fn collect_competitive(
    session: &AuditSession,
    keyword: &str,
    domain: &str,
) -> CompetitiveSignals {
    let page = match session.fetch_search_results(keyword).await {
        Ok(page) => page,
        Err(error) => {
            tracing::warn!(keyword, error = %error, "competitive fetch failed");
            return CompetitiveSignals::Unavailable {
                keyword: keyword.to_string(),
                error: error.to_string(),
            };
        }
    };
    if !(200..300).contains(&page.status) {
        tracing::warn!(keyword, status = page.status, "search returned non-success status");
        return CompetitiveSignals::Unavailable {
            keyword: keyword.to_string(),
            error: format!("search returned HTTP {}", page.status),
        };
    }

    // Parsed document is dropped before the function's next await point.
    let results = {
        let doc = Html::parse_document(&page.html);
        parse_search_results(&doc)
    };

    tracing::debug!(
        keyword,
        results = results.len(),
        "competitive results parsed"
    );
    analyze_results(keyword, domain, &results)
}

/// Reads up to ten ranked entries from a results page. Containers without
/// a heading or link are skipped and do not consume a position.
pub(crate) fn parse_search_results(doc: &Html) -> Vec<SearchResult> {
    let container = Selector::parse("div.g").expect("valid selector");
    let heading = Selector::parse("h3").expect("valid selector");
    let anchor = Selector::parse("a[href]").expect("valid selector");
    let snippet = Selector::parse("[data-sncf]").expect("valid selector");
    let snippet_fallback = Selector::parse("div.VwiC3b").expect("valid selector");

    let mut results = Vec::new();
    let mut position: u32 = 0;

    for entry in doc.select(&container) {
        if results.len() >= MAX_RESULTS {
            break;
        }
        let Some(title_el) = entry.select(&heading).next() else {
            continue;
        };
        let Some(href) = entry
            .select(&anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        let description = entry
            .select(&snippet)
            .next()
            .or_else(|| entry.select(&snippet_fallback).next())
            .map(|el| element_text(&el))
            .unwrap_or_default();

        position += 1;
        results.push(SearchResult {
            position,
            url: href.to_string(),
            title: element_text(&title_el),
            description,
        });
    }

    results
}

fn analyze_results(keyword: &str, domain: &str, results: &[SearchResult]) -> CompetitiveSignals {
    let current_position = results
        .iter()
        .find(|result| result.url.contains(domain))
        .map(|result| result.position);

    let top_competitors = results
        .iter()
        .filter(|result| !result.url.contains(domain))
        .take(3)
        .map(|result| CompetitorEntry {
            position: result.position,
            url: result.url.clone(),
            title: result.title.clone(),
            description: result.description.clone(),
        })
        .collect();

    CompetitiveSignals::Collected {
        keyword: keyword.to_string(),
        current_position,
        top_competitors,
        total_results_analyzed: results.len(),
    }
}
