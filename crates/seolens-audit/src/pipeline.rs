use chrono::Utc;
use scraper::Html;

use seolens_core::record::{AuditRecord, TechnicalSignals};

use crate::error::AuditError;
use crate::session::{AuditConfig, AuditSession};
use crate::{keyword, onpage, performance, serp, technical, urls};

/// Runs one full audit against a page URL.
///
/// Stages:
/// 1. normalize the URL and load the page (the only fatal step);
/// 2. parse the markup once and read technical plus on-page signals;
/// 3. probe robots.txt, sitemap.xml and sampled links, folding failures
///    into the record;
/// 4. derive performance signals from fetch timing;
/// 5. detect the primary keyword and collect competitive signals for it.
///
/// # Errors
///
/// Returns [`AuditError::InvalidUrl`] for an unusable input URL and
/// [`AuditError::PageLoad`] when the target page cannot be fetched at all.
/// Auxiliary failures never surface here.
pub async fn run_audit(config: &AuditConfig, raw_url: &str) -> Result<AuditRecord, AuditError> {
    let page_url = urls::normalize_audit_url(raw_url)?;
    let domain = urls::domain_of(&page_url);
    let session = AuditSession::open(config)?;

    tracing::info!(url = %page_url, "starting audit");

    let page = session.fetch_page(page_url.as_str()).await?;
    tracing::info!(
        status = page.status,
        load_ms = page.timing.load_time_ms,
        "page loaded"
    );

    // Parsed document stays inside this block; everything downstream works
    // on owned signal data.
    let (scan, onpage) = {
        let doc = Html::parse_document(&page.html);
        (
            technical::scan_markup(&doc, &page_url, config.link_check_limit),
            onpage::extract_onpage(&doc, &page_url, &domain),
        )
    };

    let scheme = page_url.scheme();
    let robots_txt_exists = session
        .probe(&format!("{scheme}://{domain}/robots.txt"))
        .await
        .found();
    let sitemap_exists = session
        .probe(&format!("{scheme}://{domain}/sitemap.xml"))
        .await
        .found();
    let broken_links = technical::check_links(&session, &scan.link_candidates).await;

    let performance = performance::derive_performance(&page.timing);

    let primary_keyword = keyword::detect_primary_keyword(scan.headings.first_h1(), &onpage.title);
    let competitive = match primary_keyword.as_deref() {
        Some(keyword) => Some(serp::collect_competitive(&session, keyword, &domain).await),
        None => None,
    };

    let technical = TechnicalSignals {
        https: scheme == "https",
        mobile_responsive: scan.mobile_responsive,
        robots_meta_directive: scan.robots_meta_directive,
        canonical_url: scan.canonical_url,
        headings: scan.headings,
        robots_txt_exists,
        sitemap_exists,
        schema_markup: scan.schema_markup,
        broken_links,
    };

    tracing::info!(
        url = %page_url,
        keyword = ?primary_keyword,
        broken_links = technical.broken_links.broken_count,
        "audit complete"
    );

    Ok(AuditRecord {
        url: page_url.to_string(),
        domain,
        audit_timestamp: Utc::now(),
        technical,
        onpage,
        performance,
        primary_keyword,
        competitive,
    })
}
