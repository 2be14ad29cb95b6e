use regex::Regex;

/// Derives the page's primary keyword phrase from its H1, falling back to
/// the title. Punctuation is stripped, the text lowercased, and the phrase
/// capped at five words. Returns `None` when neither source yields a word.
#[must_use]
pub fn detect_primary_keyword(first_h1: Option<&str>, title: &str) -> Option<String> {
    let source = match first_h1 {
        Some(h1) if !h1.trim().is_empty() => h1,
        _ => title,
    };

    let stripper = Regex::new(r"[^\w\s-]").expect("valid keyword stripper regex");
    let cleaned = stripper.replace_all(source, "").to_lowercase();

    let phrase = cleaned
        .split_whitespace()
        .take(5)
        .collect::<Vec<_>>()
        .join(" ");

    if phrase.is_empty() {
        None
    } else {
        Some(phrase)
    }
}
