//! Threshold-table lookups shared by the category scorers.
//!
//! Every banded rule is written as an ordered table next to the scorer that
//! uses it; these helpers walk the rows in order and return the first match,
//! falling back to the caller's default. Keeping the tables declarative means
//! a rule change is a one-row edit, testable without touching control flow.

/// First row whose exclusive upper bound exceeds `value` wins.
///
/// Rows must be sorted ascending by bound. Used for "faster is better"
/// metrics where the table reads `< bound → points`.
pub(crate) fn points_below(bands: &[(u64, u32)], value: u64, fallback: u32) -> u32 {
    for &(bound, points) in bands {
        if value < bound {
            return points;
        }
    }
    fallback
}

/// Float twin of [`points_below`], for unitless metrics like layout shift.
pub(crate) fn points_below_f64(bands: &[(f64, u32)], value: f64, fallback: u32) -> u32 {
    for &(bound, points) in bands {
        if value < bound {
            return points;
        }
    }
    fallback
}

/// First row whose inclusive lower bound `value` meets wins.
///
/// Rows must be sorted descending by bound. Used for "more is better"
/// metrics where the table reads `>= bound → points`.
pub(crate) fn points_at_least(bands: &[(usize, u32)], value: usize, fallback: u32) -> u32 {
    for &(bound, points) in bands {
        if value >= bound {
            return points;
        }
    }
    fallback
}

/// Float twin of [`points_at_least`], for percentage metrics.
pub(crate) fn points_at_least_f64(bands: &[(f64, u32)], value: f64, fallback: u32) -> u32 {
    for &(bound, points) in bands {
        if value >= bound {
            return points;
        }
    }
    fallback
}

/// First row whose inclusive upper bound `value` fits under wins.
///
/// Rows must be sorted ascending by bound. Used for rank metrics where the
/// table reads `<= bound → points`.
pub(crate) fn points_at_most(bands: &[(u32, u32)], value: u32, fallback: u32) -> u32 {
    for &(bound, points) in bands {
        if value <= bound {
            return points;
        }
    }
    fallback
}

/// First row whose inclusive `[min, max]` range contains `value` wins.
///
/// Rows must be ordered from the tightest (best) band outward.
pub(crate) fn points_in_range(bands: &[(usize, usize, u32)], value: usize, fallback: u32) -> u32 {
    for &(min, max, points) in bands {
        if value >= min && value <= max {
            return points;
        }
    }
    fallback
}
