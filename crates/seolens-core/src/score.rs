use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Letter grade bands over the 0–100 total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub fn for_score(total: u32) -> Self {
        match total {
            90..=u32::MAX => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// Remediation priority. Variant order is the sort order: critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// One human-readable finding with suggested action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub recommendation: String,
}

/// One category's contribution: its 0–100 score, its weight in the total,
/// and the per-sub-metric point values that built it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u32,
    pub weight: u32,
    pub details: BTreeMap<String, u32>,
}

/// Full scoring output for one [`crate::AuditRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total_score: u32,
    pub grade: Grade,
    /// Keyed by category name: `technical`, `onpage`, `competitive`.
    pub breakdown: BTreeMap<String, CategoryScore>,
    /// Sorted by priority, at most ten entries.
    pub recommendations: Vec<Recommendation>,
}
