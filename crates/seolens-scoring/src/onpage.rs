//! On-page category: content quality and markup of the page itself.
//!
//! Point budget (sums to 100): title 15, meta description 15, word count 20,
//! image alt coverage 15, internal links 20, URL structure 15.

use std::collections::BTreeMap;

use seolens_core::{CategoryScore, OnPageSignals, UrlStructure};

use crate::bands::{points_at_least, points_at_least_f64, points_in_range};
use crate::ONPAGE_WEIGHT;

/// `[min, max] chars → points`, tightest band first; any non-empty title
/// outside both bands earns the fallback, an empty title earns zero.
const TITLE_BANDS: &[(usize, usize, u32)] = &[(30, 60, 15), (20, 70, 10)];
const TITLE_FALLBACK: u32 = 5;

const META_BANDS: &[(usize, usize, u32)] = &[(120, 160, 15), (100, 180, 10)];
const META_FALLBACK: u32 = 5;

/// `>= bound words → points`.
const WORD_BANDS: &[(usize, u32)] = &[(1500, 20), (1000, 16), (500, 12), (300, 8)];
const WORD_FALLBACK: u32 = 4;

/// `>= bound percent → points`.
const ALT_BANDS: &[(f64, u32)] = &[(90.0, 15), (70.0, 12), (50.0, 8), (30.0, 5)];
const ALT_FALLBACK: u32 = 2;

/// `>= bound links → points`.
const INTERNAL_LINK_BANDS: &[(usize, u32)] = &[(10, 20), (5, 15), (3, 10), (1, 5)];
const INTERNAL_LINK_FALLBACK: u32 = 0;

const URL_BUDGET: u32 = 15;
const URL_LENGTH_LIMIT: usize = 100;
const URL_LENGTH_PENALTY: u32 = 5;
const URL_NO_HYPHEN_PENALTY: u32 = 3;
const URL_DEPTH_LIMIT: usize = 4;
const URL_DEPTH_PENALTY: u32 = 4;

#[must_use]
pub fn score_onpage(onpage: &OnPageSignals) -> CategoryScore {
    let mut details = BTreeMap::new();

    details.insert(
        "title".to_string(),
        length_points(onpage.title_length(), TITLE_BANDS, TITLE_FALLBACK),
    );
    details.insert(
        "meta_description".to_string(),
        length_points(
            onpage.meta_description_length(),
            META_BANDS,
            META_FALLBACK,
        ),
    );
    details.insert(
        "word_count".to_string(),
        points_at_least(WORD_BANDS, onpage.word_count, WORD_FALLBACK),
    );
    details.insert(
        "image_alt_coverage".to_string(),
        points_at_least_f64(ALT_BANDS, onpage.images.alt_percentage(), ALT_FALLBACK),
    );
    details.insert(
        "internal_links".to_string(),
        points_at_least(
            INTERNAL_LINK_BANDS,
            onpage.internal_links.count,
            INTERNAL_LINK_FALLBACK,
        ),
    );
    details.insert(
        "url_structure".to_string(),
        url_structure_points(&onpage.url_structure),
    );

    let score = details.values().sum();
    CategoryScore {
        score,
        weight: ONPAGE_WEIGHT,
        details,
    }
}

/// Banded length score where absence scores zero, not the fallback.
fn length_points(length: usize, bands: &[(usize, usize, u32)], fallback: u32) -> u32 {
    if length == 0 {
        return 0;
    }
    points_in_range(bands, length, fallback)
}

/// Starts at the full budget and stacks penalties for an over-long URL,
/// a hyphen-less path, and excessive depth; floored at zero.
fn url_structure_points(url: &UrlStructure) -> u32 {
    let mut points = URL_BUDGET;
    if url.length > URL_LENGTH_LIMIT {
        points = points.saturating_sub(URL_LENGTH_PENALTY);
    }
    if !url.uses_hyphens && url.path_depth > 0 {
        points = points.saturating_sub(URL_NO_HYPHEN_PENALTY);
    }
    if url.path_depth > URL_DEPTH_LIMIT {
        points = points.saturating_sub(URL_DEPTH_PENALTY);
    }
    points
}

#[cfg(test)]
mod tests {
    use seolens_core::{ImageSignals, LinkProfile};

    use super::*;

    fn clean_onpage() -> OnPageSignals {
        OnPageSignals {
            // 44 chars, inside the ideal 30-60 band
            title: "Handmade Leather Boots | Free Shipping Today".to_string(),
            // 143 chars, inside the ideal 120-160 band
            meta_description: "Shop handmade leather boots crafted from full-grain hide. \
                               Free shipping on every order, easy returns, and a lifetime \
                               repair guarantee included."
                .to_string(),
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
                count: 4,
                sample: vec![],
            },
            url_structure: UrlStructure {
                length: 38,
                has_query_parameters: false,
                path_depth: 1,
                uses_hyphens: true,
                uses_underscores: false,
            },
        }
    }

    #[test]
    fn clean_record_scores_full_hundred() {
        let onpage = clean_onpage();
        assert_eq!(onpage.title_length(), 44);
        let result = score_onpage(&onpage);
        assert_eq!(result.score, 100, "details: {:?}", result.details);
        assert_eq!(result.weight, 40);
    }

    #[test]
    fn empty_title_scores_zero_not_fallback() {
        let mut onpage = clean_onpage();
        onpage.title = String::new();
        let result = score_onpage(&onpage);
        assert_eq!(result.details["title"], 0);
    }

    #[test]
    fn title_band_edges() {
        let mut onpage = clean_onpage();
        for (len, expected) in [(30usize, 15u32), (60, 15), (29, 10), (61, 10), (20, 10), (70, 10), (19, 5), (71, 5)] {
            onpage.title = "x".repeat(len);
            let result = score_onpage(&onpage);
            assert_eq!(result.details["title"], expected, "len={len}");
        }
    }

    #[test]
    fn meta_description_band_edges() {
        let mut onpage = clean_onpage();
        for (len, expected) in [(120usize, 15u32), (160, 15), (119, 10), (100, 10), (180, 10), (99, 5), (181, 5)] {
            onpage.meta_description = "x".repeat(len);
            let result = score_onpage(&onpage);
            assert_eq!(result.details["meta_description"], expected, "len={len}");
        }
    }

    #[test]
    fn word_count_bands() {
        let mut onpage = clean_onpage();
        for (words, expected) in [(1500usize, 20u32), (1000, 16), (500, 12), (300, 8), (299, 4), (0, 4)] {
            onpage.word_count = words;
            let result = score_onpage(&onpage);
            assert_eq!(result.details["word_count"], expected, "words={words}");
        }
    }

    #[test]
    fn alt_coverage_bands() {
        let mut onpage = clean_onpage();
        for (with_alt, expected) in [(18usize, 15u32), (15, 12), (10, 8), (6, 5), (2, 2)] {
            onpage.images = ImageSignals {
                total: 20,
                with_alt,
            };
            let result = score_onpage(&onpage);
            assert_eq!(result.details["image_alt_coverage"], expected, "with_alt={with_alt}");
        }
    }

    #[test]
    fn no_images_falls_to_lowest_alt_band() {
        let mut onpage = clean_onpage();
        onpage.images = ImageSignals {
            total: 0,
            with_alt: 0,
        };
        let result = score_onpage(&onpage);
        assert_eq!(result.details["image_alt_coverage"], 2);
    }

    #[test]
    fn internal_link_bands() {
        let mut onpage = clean_onpage();
        for (count, expected) in [(10usize, 20u32), (5, 15), (3, 10), (1, 5), (0, 0)] {
            onpage.internal_links.count = count;
            let result = score_onpage(&onpage);
            assert_eq!(result.details["internal_links"], expected, "count={count}");
        }
    }

    #[test]
    fn url_penalties_stack_and_floor() {
        let clean = UrlStructure {
            length: 38,
            has_query_parameters: false,
            path_depth: 1,
            uses_hyphens: true,
            uses_underscores: false,
        };
        assert_eq!(url_structure_points(&clean), 15);

        let long = UrlStructure {
            length: 140,
            ..clean
        };
        assert_eq!(url_structure_points(&long), 10);

        let no_hyphens_deep = UrlStructure {
            length: 140,
            path_depth: 6,
            uses_hyphens: false,
            ..clean
        };
        // 15 - 5 - 3 - 4
        assert_eq!(url_structure_points(&no_hyphens_deep), 3);
    }

    #[test]
    fn hyphen_penalty_skipped_at_root_path() {
        let root = UrlStructure {
            length: 20,
            has_query_parameters: false,
            path_depth: 0,
            uses_hyphens: false,
            uses_underscores: false,
        };
        assert_eq!(url_structure_points(&root), 15);
    }
}
