use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed page audit, assembled by the pipeline and consumed by the
/// scoring engine. Immutable once produced; persisted verbatim as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Normalized, protocol-qualified URL the audit actually loaded.
    pub url: String,
    /// Host portion of `url`, used for internal/competitor classification.
    pub domain: String,
    pub audit_timestamp: DateTime<Utc>,
    pub technical: TechnicalSignals,
    pub onpage: OnPageSignals,
    pub performance: PerformanceSignals,
    /// Heuristically detected search phrase; `None` when the page has
    /// neither an h1 nor a title to derive it from.
    pub primary_keyword: Option<String>,
    /// `None` when no keyword could be detected, so no search was issued.
    pub competitive: Option<CompetitiveSignals>,
}

/// Crawlability and markup-health signals.
#[allow(clippy::struct_excessive_bools)] // independent yes/no checks, not a state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSignals {
    pub https: bool,
    /// True iff a viewport meta tag exists and declares `width=device-width`.
    pub mobile_responsive: bool,
    /// Content of `<meta name="robots">`, or `"index, follow"` when absent.
    pub robots_meta_directive: String,
    pub canonical_url: Option<String>,
    pub headings: HeadingStructure,
    pub robots_txt_exists: bool,
    pub sitemap_exists: bool,
    pub schema_markup: SchemaMarkup,
    pub broken_links: BrokenLinks,
}

/// Heading text collected per level, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingStructure {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl HeadingStructure {
    #[must_use]
    pub fn h1_count(&self) -> usize {
        self.h1.len()
    }

    /// Text of the first h1 on the page, if any.
    #[must_use]
    pub fn first_h1(&self) -> Option<&str> {
        self.h1.first().map(String::as_str)
    }

    /// A proper hierarchy means exactly one h1; zero and multiple both fail.
    #[must_use]
    pub fn has_proper_hierarchy(&self) -> bool {
        self.h1.len() == 1
    }
}

/// Structured-data blocks found on the page.
///
/// `types` carries one entry per `application/ld+json` script block, so its
/// length equals the number of blocks found whether or not they parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMarkup {
    pub types: Vec<String>,
}

impl SchemaMarkup {
    /// Recorded type for a block that failed to parse as JSON.
    pub const INVALID_TYPE: &'static str = "Invalid";
    /// Recorded type for a block that parsed but declares no `@type`.
    pub const UNKNOWN_TYPE: &'static str = "Unknown";

    #[must_use]
    pub fn count(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn has_schema(&self) -> bool {
        !self.types.is_empty()
    }
}

/// Outcome of the sampled broken-link check.
///
/// `sample` keeps at most the first ten broken links found;
/// `broken_count` counts all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokenLinks {
    pub checked_count: usize,
    pub broken_count: usize,
    pub sample: Vec<BrokenLinkSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenLinkSample {
    pub url: String,
    pub status: LinkStatus,
}

/// What a link probe came back with. A transport failure carries no status
/// code, so it gets its own variant rather than a fake number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum LinkStatus {
    Http(u16),
    Unreachable,
}

/// Content and markup signals from the rendered page itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnPageSignals {
    pub title: String,
    pub meta_description: String,
    /// Whitespace-split token count of the body's visible text.
    pub word_count: usize,
    pub images: ImageSignals,
    pub internal_links: LinkProfile,
    pub external_links: LinkProfile,
    pub url_structure: UrlStructure,
}

impl OnPageSignals {
    #[must_use]
    pub fn title_length(&self) -> usize {
        self.title.chars().count()
    }

    #[must_use]
    pub fn meta_description_length(&self) -> usize {
        self.meta_description.chars().count()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImageSignals {
    pub total: usize,
    pub with_alt: usize,
}

impl ImageSignals {
    #[must_use]
    pub fn without_alt(&self) -> usize {
        self.total.saturating_sub(self.with_alt)
    }

    /// Share of images carrying alt text, 0–100 rounded to one decimal.
    /// Exactly 0.0 when the page has no images at all.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // image counts are far below 2^52
    pub fn alt_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = self.with_alt as f64 / self.total as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Link count plus a bounded sample of the hrefs, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkProfile {
    pub count: usize,
    /// At most the first ten matching hrefs.
    pub sample: Vec<String>,
}

#[allow(clippy::struct_excessive_bools)] // independent yes/no checks, not a state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlStructure {
    /// Total character length of the full URL.
    pub length: usize,
    pub has_query_parameters: bool,
    /// Count of non-empty path segments.
    pub path_depth: usize,
    pub uses_hyphens: bool,
    pub uses_underscores: bool,
}

/// Load-time measurements, best-effort.
///
/// Values that cannot be measured are recorded as penalizing sentinels
/// (the `DEFAULT_*` constants) so scoring lands them in the slowest tier
/// instead of special-casing absence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerformanceSignals {
    pub load_time_ms: u64,
    pub dom_content_loaded_ms: u64,
    pub first_paint_ms: u64,
    pub transfer_size_bytes: u64,
    pub lcp_ms: u64,
    pub cls: f64,
}

impl PerformanceSignals {
    pub const DEFAULT_LOAD_TIME_MS: u64 = 10_000;
    pub const DEFAULT_LCP_MS: u64 = 5_000;
    pub const DEFAULT_CLS: f64 = 1.0;

    /// All-sentinel signals for a page whose timing could not be measured.
    #[must_use]
    pub fn unmeasured() -> Self {
        Self {
            load_time_ms: Self::DEFAULT_LOAD_TIME_MS,
            dom_content_loaded_ms: Self::DEFAULT_LOAD_TIME_MS,
            first_paint_ms: Self::DEFAULT_LOAD_TIME_MS,
            transfer_size_bytes: 0,
            lcp_ms: Self::DEFAULT_LCP_MS,
            cls: Self::DEFAULT_CLS,
        }
    }
}

/// One search result treated as a competitor for the detected keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorEntry {
    /// 1-based rank on the results page.
    pub position: u32,
    pub url: String,
    pub title: String,
    pub description: String,
}

impl CompetitorEntry {
    #[must_use]
    pub fn title_length(&self) -> usize {
        self.title.chars().count()
    }

    #[must_use]
    pub fn description_length(&self) -> usize {
        self.description.chars().count()
    }
}

/// Search-ranking context for the detected keyword.
///
/// The competitive fetch is best-effort: any failure is folded into
/// `Unavailable` so the pipeline never aborts over it, and scoring falls
/// back to a neutral value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompetitiveSignals {
    Collected {
        keyword: String,
        /// Rank of the first result matching the audited domain, if any.
        current_position: Option<u32>,
        /// Up to three top results, never including the audited domain.
        top_competitors: Vec<CompetitorEntry>,
        total_results_analyzed: usize,
    },
    Unavailable {
        keyword: String,
        error: String,
    },
}

impl CompetitiveSignals {
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            CompetitiveSignals::Collected { keyword, .. }
            | CompetitiveSignals::Unavailable { keyword, .. } => keyword,
        }
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CompetitiveSignals::Unavailable { .. })
    }
}
