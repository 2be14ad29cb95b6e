//! Deterministic scoring engine for audit records.
//!
//! Pure functions from an [`AuditRecord`] to a [`ScoreResult`]: three
//! category scores on 100-point budgets, combined 40/40/20, plus a letter
//! grade and prioritized recommendations. Total over any well-formed record;
//! scoring never fails, every missing measurement has a defined sentinel or
//! fallback tier.

use std::collections::BTreeMap;

use seolens_core::{AuditRecord, Grade, ScoreResult};

mod bands;
mod competitive;
mod onpage;
mod recommend;
mod technical;

pub use competitive::score_competitive;
pub use onpage::score_onpage;
pub use recommend::generate_recommendations;
pub use technical::score_technical;

/// Category weights; must sum to 100.
pub const TECHNICAL_WEIGHT: u32 = 40;
pub const ONPAGE_WEIGHT: u32 = 40;
pub const COMPETITIVE_WEIGHT: u32 = 20;

/// Score one audit record.
///
/// `total_score = round(technical*0.4 + onpage*0.4 + competitive*0.2)`,
/// with each category already clamped to 0–100 by its point budget.
#[must_use]
pub fn calculate_score(record: &AuditRecord) -> ScoreResult {
    let technical = technical::score_technical(&record.technical, &record.performance);
    let onpage = onpage::score_onpage(&record.onpage);
    let competitive = competitive::score_competitive(record.competitive.as_ref(), &record.onpage);

    let total_score = weighted_total(technical.score, onpage.score, competitive.score);
    let grade = Grade::for_score(total_score);
    let recommendations = recommend::generate_recommendations(record);

    let mut breakdown = BTreeMap::new();
    breakdown.insert("technical".to_string(), technical);
    breakdown.insert("onpage".to_string(), onpage);
    breakdown.insert("competitive".to_string(), competitive);

    ScoreResult {
        total_score,
        grade,
        breakdown,
        recommendations,
    }
}

fn weighted_total(technical: u32, onpage: u32, competitive: u32) -> u32 {
    let weighted = f64::from(technical) * f64::from(TECHNICAL_WEIGHT) / 100.0
        + f64::from(onpage) * f64::from(ONPAGE_WEIGHT) / 100.0
        + f64::from(competitive) * f64::from(COMPETITIVE_WEIGHT) / 100.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // rounded, bounded by 100
    let total = weighted.round() as u32;
    total.min(100)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use seolens_core::{
        BrokenLinks, HeadingStructure, ImageSignals, LinkProfile, OnPageSignals,
        PerformanceSignals, Priority, SchemaMarkup, TechnicalSignals, UrlStructure,
    };

    use super::*;

    /// A record that hits full marks in both the technical and on-page
    /// categories, with no competitive data.
    fn clean_record() -> AuditRecord {
        AuditRecord {
            url: "https://example.com/leather-boots".to_string(),
            domain: "example.com".to_string(),
            audit_timestamp: Utc::now(),
            technical: TechnicalSignals {
                https: true,
                mobile_responsive: true,
                robots_meta_directive: "index, follow".to_string(),
                canonical_url: Some("https://example.com/leather-boots".to_string()),
                headings: HeadingStructure {
                    h1: vec!["Handmade Leather Boots".to_string()],
                    ..HeadingStructure::default()
                },
                robots_txt_exists: true,
                sitemap_exists: true,
                schema_markup: SchemaMarkup {
                    types: vec!["Product".to_string()],
                },
                broken_links: BrokenLinks {
                    checked_count: 15,
                    broken_count: 0,
                    sample: vec![],
                },
            },
            onpage: OnPageSignals {
                // 44 chars
                title: "Handmade Leather Boots | Free Shipping Today".to_string(),
                meta_description: "x".repeat(140),
                word_count: 1600,
                images: ImageSignals {
                    total: 20,
                    with_alt: 19,
                },
                internal_links: LinkProfile {
                    count: 12,
                    sample: vec![],
                },
                external_links: LinkProfile {
                    count: 3,
                    sample: vec![],
                },
                url_structure: UrlStructure {
                    length: 33,
                    has_query_parameters: false,
                    path_depth: 1,
                    uses_hyphens: true,
                    uses_underscores: false,
                },
            },
            performance: PerformanceSignals {
                load_time_ms: 1500,
                dom_content_loaded_ms: 900,
                first_paint_ms: 700,
                transfer_size_bytes: 180_000,
                lcp_ms: 2000,
                cls: 0.05,
            },
            primary_keyword: Some("handmade leather boots".to_string()),
            competitive: None,
        }
    }

    /// A record where everything that can fail has failed.
    fn worst_record() -> AuditRecord {
        AuditRecord {
            url: "http://example.com/".to_string(),
            domain: "example.com".to_string(),
            audit_timestamp: Utc::now(),
            technical: TechnicalSignals {
                https: false,
                mobile_responsive: false,
                robots_meta_directive: "index, follow".to_string(),
                canonical_url: None,
                headings: HeadingStructure::default(),
                robots_txt_exists: false,
                sitemap_exists: false,
                schema_markup: SchemaMarkup::default(),
                broken_links: BrokenLinks {
                    checked_count: 20,
                    broken_count: 20,
                    sample: vec![],
                },
            },
            onpage: OnPageSignals {
                title: String::new(),
                meta_description: String::new(),
                word_count: 0,
                images: ImageSignals {
                    total: 8,
                    with_alt: 0,
                },
                internal_links: LinkProfile::default(),
                external_links: LinkProfile::default(),
                url_structure: UrlStructure {
                    length: 120,
                    has_query_parameters: true,
                    path_depth: 6,
                    uses_hyphens: false,
                    uses_underscores: true,
                },
            },
            performance: PerformanceSignals::unmeasured(),
            primary_keyword: None,
            competitive: None,
        }
    }

    #[test]
    fn clean_record_with_neutral_competitive_scores_ninety() {
        let result = calculate_score(&clean_record());
        assert_eq!(
            result.breakdown["technical"].score, 100,
            "technical details: {:?}",
            result.breakdown["technical"].details
        );
        assert_eq!(
            result.breakdown["onpage"].score, 100,
            "onpage details: {:?}",
            result.breakdown["onpage"].details
        );
        assert_eq!(result.breakdown["competitive"].score, 50);
        // round(100*0.4 + 100*0.4 + 50*0.2)
        assert_eq!(result.total_score, 90);
        assert_eq!(result.grade, Grade::A);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn total_stays_in_range_for_worst_record() {
        let result = calculate_score(&worst_record());
        assert!(result.total_score <= 100);
        assert_eq!(result.grade, Grade::F);
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn total_matches_weighted_formula() {
        for record in [clean_record(), worst_record()] {
            let result = calculate_score(&record);
            let expected = (f64::from(result.breakdown["technical"].score) * 0.4
                + f64::from(result.breakdown["onpage"].score) * 0.4
                + f64::from(result.breakdown["competitive"].score) * 0.2)
                .round();
            assert!(
                (f64::from(result.total_score) - expected).abs() < f64::EPSILON,
                "total {} != weighted {expected}",
                result.total_score
            );
        }
    }

    #[test]
    fn breakdown_carries_all_three_categories_with_weights() {
        let result = calculate_score(&clean_record());
        assert_eq!(result.breakdown.len(), 3);
        assert_eq!(result.breakdown["technical"].weight, 40);
        assert_eq!(result.breakdown["onpage"].weight, 40);
        assert_eq!(result.breakdown["competitive"].weight, 20);
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        assert_eq!(TECHNICAL_WEIGHT + ONPAGE_WEIGHT + COMPETITIVE_WEIGHT, 100);
    }

    #[test]
    fn worst_record_recommendations_lead_with_critical() {
        let result = calculate_score(&worst_record());
        assert!(result.recommendations.len() <= 10);
        assert_eq!(result.recommendations[0].priority, Priority::Critical);
        for pair in result.recommendations.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
        }
    }
}
