use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use url::Url;

use seolens_core::record::{ImageSignals, LinkProfile, OnPageSignals, UrlStructure};

use crate::technical::element_text;
use crate::urls::{self, LinkKind};

/// Reads every on-page content signal from the parsed document.
#[must_use]
pub fn extract_onpage(doc: &Html, page_url: &Url, domain: &str) -> OnPageSignals {
    let (internal_links, external_links) = link_profiles(doc, domain);
    OnPageSignals {
        title: page_title(doc),
        meta_description: meta_description(doc),
        word_count: visible_body_text(doc).split_whitespace().count(),
        images: image_signals(doc),
        internal_links,
        external_links,
        url_structure: url_structure_of(page_url),
    }
}

fn page_title(doc: &Html) -> String {
    let selector = Selector::parse("title").expect("valid selector");
    doc.select(&selector)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

fn meta_description(doc: &Html) -> String {
    let selector = Selector::parse(r#"meta[name="description"]"#).expect("valid selector");
    doc.select(&selector)
        .find_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Body text as a reader would see it: script, style and noscript subtrees
/// contribute nothing.
fn visible_body_text(doc: &Html) -> String {
    let selector = Selector::parse("body").expect("valid selector");
    let mut out = String::new();
    if let Some(body) = doc.select(&selector).next() {
        collect_text(*body, &mut out);
    }
    out
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    if let Node::Element(element) = node.value() {
        if matches!(element.name(), "script" | "style" | "noscript") {
            return;
        }
    }
    if let Node::Text(text) = node.value() {
        out.push_str(text);
        out.push(' ');
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

fn image_signals(doc: &Html) -> ImageSignals {
    let selector = Selector::parse("img").expect("valid selector");
    let mut signals = ImageSignals::default();
    for element in doc.select(&selector) {
        signals.total += 1;
        let has_alt = element
            .value()
            .attr("alt")
            .is_some_and(|alt| !alt.trim().is_empty());
        if has_alt {
            signals.with_alt += 1;
        }
    }
    signals
}

fn link_profiles(doc: &Html, domain: &str) -> (LinkProfile, LinkProfile) {
    let selector = Selector::parse("a[href]").expect("valid selector");
    let mut internal = LinkProfile::default();
    let mut external = LinkProfile::default();

    for element in doc.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let profile = match urls::classify_href(href, domain) {
            LinkKind::Internal => &mut internal,
            LinkKind::External => &mut external,
            LinkKind::Other => continue,
        };
        profile.count += 1;
        if profile.sample.len() < 10 {
            profile.sample.push(href.trim().to_string());
        }
    }

    (internal, external)
}

fn url_structure_of(url: &Url) -> UrlStructure {
    let path = url.path();
    UrlStructure {
        length: url.as_str().chars().count(),
        has_query_parameters: url.query().is_some_and(|query| !query.is_empty()),
        path_depth: urls::path_depth(url),
        uses_hyphens: path.contains('-'),
        uses_underscores: path.contains('_'),
    }
}
