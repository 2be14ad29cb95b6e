//! Turns observed shortfalls into prioritized remediation advice.

use seolens_core::{AuditRecord, CompetitiveSignals, Priority, Recommendation};

/// Hard cap on the advice list; the stable priority sort runs first, so the
/// cut keeps the most urgent entries.
const MAX_RECOMMENDATIONS: usize = 10;

/// Load time above which the page counts as slow enough to call out.
const SLOW_LOAD_MS: u64 = 3000;

const THIN_CONTENT_WORDS: usize = 300;

/// One entry per substandard check actually observed, sorted by priority
/// (stable, so ties keep detection order) and truncated to
/// [`MAX_RECOMMENDATIONS`].
#[must_use]
pub fn generate_recommendations(record: &AuditRecord) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if !record.technical.https {
        push(
            &mut recs,
            Priority::Critical,
            "technical",
            "Site is not served over HTTPS",
            "Install an SSL certificate and redirect all HTTP traffic to HTTPS",
        );
    }

    if !record.technical.mobile_responsive {
        push(
            &mut recs,
            Priority::Critical,
            "technical",
            "Page is not mobile-responsive",
            "Add a viewport meta tag with width=device-width and use a responsive layout",
        );
    }

    if record.performance.load_time_ms > SLOW_LOAD_MS {
        push(
            &mut recs,
            Priority::High,
            "performance",
            &format!(
                "Page took {} ms to load",
                record.performance.load_time_ms
            ),
            "Compress images, enable caching, and trim render-blocking resources",
        );
    }

    if !record.technical.sitemap_exists {
        push(
            &mut recs,
            Priority::High,
            "technical",
            "No XML sitemap found",
            "Generate an XML sitemap and reference it from robots.txt",
        );
    }

    let title_length = record.onpage.title_length();
    if title_length == 0 {
        push(
            &mut recs,
            Priority::Critical,
            "onpage",
            "Page has no title tag",
            "Add a unique, descriptive title of 30-60 characters",
        );
    } else if !(30..=60).contains(&title_length) {
        push(
            &mut recs,
            Priority::Medium,
            "onpage",
            &format!("Title is {title_length} characters long (ideal is 30-60)"),
            "Rewrite the title to land between 30 and 60 characters",
        );
    }

    if record.onpage.meta_description_length() == 0 {
        push(
            &mut recs,
            Priority::High,
            "onpage",
            "Page has no meta description",
            "Add a meta description of 120-160 characters summarizing the page",
        );
    }

    let missing_alt = record.onpage.images.without_alt();
    if missing_alt > 0 {
        push(
            &mut recs,
            Priority::Medium,
            "onpage",
            &format!("{missing_alt} images are missing alt text"),
            "Describe each image in its alt attribute",
        );
    }

    if record.onpage.word_count < THIN_CONTENT_WORDS {
        push(
            &mut recs,
            Priority::High,
            "onpage",
            &format!(
                "Page has only {} words of visible text",
                record.onpage.word_count
            ),
            "Expand the content to at least 300 words of substantive copy",
        );
    }

    if let Some(CompetitiveSignals::Collected {
        keyword,
        current_position: None,
        ..
    }) = &record.competitive
    {
        push(
            &mut recs,
            Priority::Medium,
            "competitive",
            &format!("Page does not rank in the sampled top results for \"{keyword}\""),
            "Work the keyword into the title, headings, and opening copy",
        );
    }

    recs.sort_by_key(|r| r.priority);
    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

fn push(
    recs: &mut Vec<Recommendation>,
    priority: Priority,
    category: &str,
    issue: &str,
    recommendation: &str,
) {
    recs.push(Recommendation {
        priority,
        category: category.to_string(),
        issue: issue.to_string(),
        recommendation: recommendation.to_string(),
    });
}
