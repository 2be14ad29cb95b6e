//! Technical category: crawlability, markup health, and load speed.
//!
//! Point budget (sums to 100): https 5, mobile 10, robots.txt 5, sitemap 5,
//! schema 5, headings 10, canonical 5, page speed 25, LCP 8, CLS 7,
//! broken links 15.

use std::collections::BTreeMap;

use seolens_core::{CategoryScore, PerformanceSignals, TechnicalSignals};

use crate::bands::{points_below, points_below_f64};
use crate::TECHNICAL_WEIGHT;

/// `< bound ms → points`; slower pages fall through to the fallback tier.
/// The unmeasured-load sentinel (10000 ms) lands there by construction.
const SPEED_BANDS: &[(u64, u32)] = &[(2000, 25), (3000, 20), (5000, 15), (7000, 10)];
const SPEED_FALLBACK: u32 = 5;

/// `< bound ms → points`; the unmeasured sentinel (5000 ms) falls through.
const LCP_BANDS: &[(u64, u32)] = &[(2500, 8), (4000, 5)];
const LCP_FALLBACK: u32 = 2;

/// `< bound → points`; the unmeasured sentinel (1.0) falls through.
const CLS_BANDS: &[(f64, u32)] = &[(0.1, 7), (0.25, 4)];
const CLS_FALLBACK: u32 = 1;

const BROKEN_LINK_BUDGET: u32 = 15;
const BROKEN_LINK_PENALTY: u32 = 3;

#[must_use]
pub fn score_technical(
    technical: &TechnicalSignals,
    performance: &PerformanceSignals,
) -> CategoryScore {
    let mut details = BTreeMap::new();

    details.insert("https".to_string(), if technical.https { 5 } else { 0 });
    details.insert(
        "mobile_responsive".to_string(),
        if technical.mobile_responsive { 10 } else { 0 },
    );
    details.insert(
        "robots_txt".to_string(),
        if technical.robots_txt_exists { 5 } else { 0 },
    );
    details.insert(
        "sitemap".to_string(),
        if technical.sitemap_exists { 5 } else { 0 },
    );
    details.insert(
        "schema_markup".to_string(),
        if technical.schema_markup.has_schema() { 5 } else { 0 },
    );
    details.insert("headings".to_string(), heading_points(technical));
    details.insert(
        "canonical".to_string(),
        if technical.canonical_url.is_some() { 5 } else { 0 },
    );
    details.insert(
        "page_speed".to_string(),
        points_below(SPEED_BANDS, performance.load_time_ms, SPEED_FALLBACK),
    );
    details.insert(
        "lcp".to_string(),
        points_below(LCP_BANDS, performance.lcp_ms, LCP_FALLBACK),
    );
    details.insert(
        "cls".to_string(),
        points_below_f64(CLS_BANDS, performance.cls, CLS_FALLBACK),
    );
    details.insert("broken_links".to_string(), broken_link_points(technical));

    let score = details.values().sum();
    CategoryScore {
        score,
        weight: TECHNICAL_WEIGHT,
        details,
    }
}

/// Exactly one h1 earns full points; an h1 present in a broken hierarchy
/// earns half; no h1 earns nothing.
fn heading_points(technical: &TechnicalSignals) -> u32 {
    if technical.headings.has_proper_hierarchy() {
        10
    } else if technical.headings.h1_count() > 0 {
        5
    } else {
        0
    }
}

/// Full budget at zero broken links, minus a fixed penalty per broken link,
/// floored at zero.
fn broken_link_points(technical: &TechnicalSignals) -> u32 {
    let broken = u32::try_from(technical.broken_links.broken_count).unwrap_or(u32::MAX);
    BROKEN_LINK_BUDGET.saturating_sub(broken.saturating_mul(BROKEN_LINK_PENALTY))
}

#[cfg(test)]
mod tests {
    use seolens_core::{BrokenLinks, HeadingStructure, SchemaMarkup};

    use super::*;

    fn clean_technical() -> TechnicalSignals {
        TechnicalSignals {
            https: true,
            mobile_responsive: true,
            robots_meta_directive: "index, follow".to_string(),
            canonical_url: Some("https://example.com/".to_string()),
            headings: HeadingStructure {
                h1: vec!["Welcome".to_string()],
                ..HeadingStructure::default()
            },
            robots_txt_exists: true,
            sitemap_exists: true,
            schema_markup: SchemaMarkup {
                types: vec!["Organization".to_string()],
            },
            broken_links: BrokenLinks {
                checked_count: 12,
                broken_count: 0,
                sample: vec![],
            },
        }
    }

    fn fast_performance() -> PerformanceSignals {
        PerformanceSignals {
            load_time_ms: 1500,
            dom_content_loaded_ms: 900,
            first_paint_ms: 700,
            transfer_size_bytes: 200_000,
            lcp_ms: 2000,
            cls: 0.05,
        }
    }

    #[test]
    fn clean_record_scores_full_hundred() {
        let result = score_technical(&clean_technical(), &fast_performance());
        assert_eq!(result.score, 100, "details: {:?}", result.details);
        assert_eq!(result.weight, 40);
    }

    #[test]
    fn details_sum_to_score() {
        let mut technical = clean_technical();
        technical.https = false;
        technical.sitemap_exists = false;
        let result = score_technical(&technical, &fast_performance());
        let sum: u32 = result.details.values().sum();
        assert_eq!(result.score, sum);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn unmeasured_performance_lands_in_lowest_tiers() {
        let result = score_technical(&clean_technical(), &PerformanceSignals::unmeasured());
        assert_eq!(result.details["page_speed"], 5);
        assert_eq!(result.details["lcp"], 2);
        assert_eq!(result.details["cls"], 1);
    }

    #[test]
    fn speed_tier_edges() {
        let mut perf = fast_performance();
        for (ms, expected) in [(1999, 25), (2000, 20), (2999, 20), (4999, 15), (6999, 10), (7000, 5)] {
            perf.load_time_ms = ms;
            let result = score_technical(&clean_technical(), &perf);
            assert_eq!(
                result.details["page_speed"], expected,
                "load_time_ms={ms}"
            );
        }
    }

    #[test]
    fn broken_link_points_floor_at_zero() {
        let mut technical = clean_technical();
        for (broken, expected) in [(0usize, 15u32), (1, 12), (4, 3), (5, 0), (10, 0)] {
            technical.broken_links.broken_count = broken;
            let result = score_technical(&technical, &fast_performance());
            assert_eq!(result.details["broken_links"], expected, "broken={broken}");
        }
    }

    #[test]
    fn broken_link_points_monotone_non_increasing() {
        let mut technical = clean_technical();
        let mut last = u32::MAX;
        for broken in 0..12 {
            technical.broken_links.broken_count = broken;
            let points = score_technical(&technical, &fast_performance()).details["broken_links"];
            assert!(points <= last, "points rose at broken={broken}");
            last = points;
        }
    }

    #[test]
    fn heading_points_half_credit_for_improper_hierarchy() {
        let mut technical = clean_technical();

        technical.headings.h1 = vec!["One".to_string(), "Two".to_string()];
        let result = score_technical(&technical, &fast_performance());
        assert_eq!(result.details["headings"], 5);

        technical.headings.h1 = vec![];
        let result = score_technical(&technical, &fast_performance());
        assert_eq!(result.details["headings"], 0);
    }

    #[test]
    fn missing_canonical_drops_five_points() {
        let mut technical = clean_technical();
        technical.canonical_url = None;
        let result = score_technical(&technical, &fast_performance());
        assert_eq!(result.details["canonical"], 0);
        assert_eq!(result.score, 95);
    }
}
