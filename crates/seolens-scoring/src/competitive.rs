//! Competitive category: how the page stacks up on its keyword's results page.
//!
//! Point budget when data was collected (sums to 100): SERP position 40,
//! title competitiveness 30, description competitiveness 30. When the
//! competitive fetch failed or never ran, the whole category scores a flat
//! neutral 50 so a missing search never drags an otherwise healthy page.

use std::collections::BTreeMap;

use seolens_core::{CategoryScore, CompetitiveSignals, CompetitorEntry, OnPageSignals};

use crate::bands::points_at_most;
use crate::COMPETITIVE_WEIGHT;

/// Score given when no competitive data exists (absent or fetch error).
const NEUTRAL_SCORE: u32 = 50;

/// `<= bound rank → points` for a page found in the sampled results.
const POSITION_BANDS: &[(u32, u32)] = &[(1, 40), (3, 35), (5, 30), (10, 20)];
const POSITION_FALLBACK: u32 = 10;
/// Points when the audited domain is absent from the sampled results.
const NOT_RANKING_POINTS: u32 = 5;

/// Sub-score used for both length comparisons when the top-competitor list
/// came back empty: there is nobody to compare against, so neither reward
/// nor punish.
const NO_COMPETITOR_POINTS: u32 = 25;

const TITLE_IDEAL: (usize, usize) = (30, 60);
const TITLE_AVG_TOLERANCE: f64 = 20.0;
const META_IDEAL: (usize, usize) = (120, 160);
const META_AVG_TOLERANCE: f64 = 30.0;

const COMPETITIVE_POINTS: u32 = 30;
const PRESENT_POINTS: u32 = 20;
const WEAK_POINTS: u32 = 5;

#[must_use]
pub fn score_competitive(
    competitive: Option<&CompetitiveSignals>,
    onpage: &OnPageSignals,
) -> CategoryScore {
    let mut details = BTreeMap::new();

    match competitive {
        None | Some(CompetitiveSignals::Unavailable { .. }) => {
            details.insert("no_data".to_string(), NEUTRAL_SCORE);
            CategoryScore {
                score: NEUTRAL_SCORE,
                weight: COMPETITIVE_WEIGHT,
                details,
            }
        }
        Some(CompetitiveSignals::Collected {
            current_position,
            top_competitors,
            ..
        }) => {
            details.insert(
                "serp_position".to_string(),
                position_points(*current_position),
            );
            details.insert(
                "title_competitiveness".to_string(),
                length_competitiveness(
                    onpage.title_length(),
                    TITLE_IDEAL,
                    TITLE_AVG_TOLERANCE,
                    competitor_average(top_competitors, CompetitorEntry::title_length),
                ),
            );
            details.insert(
                "description_competitiveness".to_string(),
                length_competitiveness(
                    onpage.meta_description_length(),
                    META_IDEAL,
                    META_AVG_TOLERANCE,
                    competitor_average(top_competitors, CompetitorEntry::description_length),
                ),
            );

            let score = details.values().sum();
            CategoryScore {
                score,
                weight: COMPETITIVE_WEIGHT,
                details,
            }
        }
    }
}

fn position_points(position: Option<u32>) -> u32 {
    match position {
        Some(rank) => points_at_most(POSITION_BANDS, rank, POSITION_FALLBACK),
        None => NOT_RANKING_POINTS,
    }
}

/// Mean of `field` over the competitor list; `None` when the list is empty.
#[allow(clippy::cast_precision_loss)] // lengths of a handful of titles
fn competitor_average(
    competitors: &[CompetitorEntry],
    field: impl Fn(&CompetitorEntry) -> usize,
) -> Option<f64> {
    if competitors.is_empty() {
        return None;
    }
    let sum: usize = competitors.iter().map(field).sum();
    Some(sum as f64 / competitors.len() as f64)
}

/// Full points iff our own length sits in the ideal band and within
/// `tolerance` characters of the competitor average; partial credit for
/// merely having the element at all.
#[allow(clippy::cast_precision_loss)]
fn length_competitiveness(
    own_length: usize,
    ideal: (usize, usize),
    tolerance: f64,
    competitor_avg: Option<f64>,
) -> u32 {
    let Some(avg) = competitor_avg else {
        return NO_COMPETITOR_POINTS;
    };

    let in_ideal = own_length >= ideal.0 && own_length <= ideal.1;
    let near_avg = (own_length as f64 - avg).abs() <= tolerance;
    if in_ideal && near_avg {
        COMPETITIVE_POINTS
    } else if own_length > 0 {
        PRESENT_POINTS
    } else {
        WEAK_POINTS
    }
}
