//! HTML fact extraction
//!
//! Pure functions from `(url, html)` to structured page facts: outgoing
//! links, contact information, business-term hits, and page metadata.
//! Nothing here performs I/O, and malformed HTML never fails: the
//! extractor returns whatever fields it could parse.

use crate::report::ContactSet;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet};
use url::Url;

/// Length of the visible-text preview stored per page, in characters
pub const PREVIEW_CHARS: usize = 500;

/// Cap on the extracted address snippet, in characters
const ADDRESS_CHARS: usize = 200;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email pattern")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})\b")
        .expect("valid phone pattern")
});

/// Street-suffix words that mark a text line as a likely postal address
const STREET_SUFFIXES: &[&str] = &[
    "st", "street", "ave", "avenue", "road", "rd", "blvd", "boulevard", "drive", "dr", "lane",
    "ln", "way", "suite", "ste", "floor",
];

/// Facts extracted from one page
#[derive(Debug, Clone, Default)]
pub struct PageFacts {
    pub title: Option<String>,
    pub description: Option<String>,
    pub text_preview: String,
    pub contacts: ContactSet,
    pub business_terms: BTreeSet<String>,
    /// Outgoing links in document order, deduplicated within the page
    pub links: Vec<Url>,
}

/// Extracts structured facts from an HTML page
///
/// # Arguments
///
/// * `url` - The page's URL, used to resolve relative links
/// * `html` - Raw HTML body
/// * `vocabulary` - Business terms to look for in the page text
pub fn extract(url: &Url, html: &str, vocabulary: &[String]) -> PageFacts {
    let document = Html::parse_document(html);

    let chunks = visible_text_chunks(&document);
    let text = chunks.join(" ");

    let mut contacts = extract_contacts(&text);
    contacts.address = extract_address(&chunks);

    PageFacts {
        title: extract_title(&document),
        description: extract_description(&document),
        text_preview: text.chars().take(PREVIEW_CHARS).collect(),
        contacts,
        business_terms: extract_business_terms(&text, vocabulary),
        links: extract_links(&document, url),
    }
}

/// Extracts the page title from the title element
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the meta description, if present
fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The page's visible text joined into one string
///
/// Shared with the aggregator's regex-based extraction.
pub(crate) fn page_text(document: &Html) -> String {
    visible_text_chunks(document).join(" ")
}

/// Collects the page's visible text, one chunk per text node
///
/// Script, style, and noscript subtrees are skipped so previews, term
/// matches, and the address heuristic only see rendered text.
fn visible_text_chunks(document: &Html) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut stack = vec![document.tree.root()];

    while let Some(node) = stack.pop() {
        let mut descend = true;

        match node.value() {
            Node::Element(element) => {
                if matches!(element.name(), "script" | "style" | "noscript") {
                    descend = false;
                }
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.split_whitespace().collect::<Vec<_>>().join(" "));
                }
                descend = false;
            }
            _ => {}
        }

        if descend {
            // Push in reverse so chunks come out in document order
            let children: Vec<_> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
    }

    chunks
}

/// Extracts email addresses and phone numbers from page text
fn extract_contacts(text: &str) -> ContactSet {
    let mut contacts = ContactSet::default();

    for m in EMAIL_RE.find_iter(text) {
        contacts.emails.insert(m.as_str().to_string());
    }

    for caps in PHONE_RE.captures_iter(text) {
        contacts
            .phones
            .insert(format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]));
    }

    contacts
}

/// Best-effort postal address detection
///
/// A text chunk containing both a digit and a street-suffix word is taken
/// as an address line; the first hit wins, truncated to a fixed length.
/// This is recall-oriented; absence is normal and never an error.
fn extract_address(chunks: &[String]) -> Option<String> {
    chunks
        .iter()
        .find(|line| line.chars().any(|c| c.is_ascii_digit()) && has_street_suffix(line))
        .map(|line| line.chars().take(ADDRESS_CHARS).collect())
}

fn has_street_suffix(line: &str) -> bool {
    line.split_whitespace().any(|word| {
        let cleaned = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        STREET_SUFFIXES.contains(&cleaned.as_str())
    })
}

/// Records which vocabulary terms occur in the page text
///
/// Matching is case-insensitive substring containment; presence is
/// recorded once per term regardless of frequency.
fn extract_business_terms(text: &str, vocabulary: &[String]) -> BTreeSet<String> {
    let lowered = text.to_lowercase();

    vocabulary
        .iter()
        .filter(|term| lowered.contains(&term.to_lowercase()))
        .cloned()
        .collect()
}

/// Extracts outgoing links, resolved against the page URL
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_link(href, base_url) {
                    if seen.insert(resolved.as_str().to_string()) {
                        links.push(resolved);
                    }
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None for links that cannot lead to a crawlable page:
/// javascript:/mailto:/tel:/data: schemes, same-page fragments, malformed
/// hrefs, and anything that does not resolve to HTTP(S).
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(resolved) if resolved.scheme() == "http" || resolved.scheme() == "https" => {
            Some(resolved)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn run(html: &str) -> PageFacts {
        let vocabulary: Vec<String> = ["product", "service", "AI"]
            .into_iter()
            .map(String::from)
            .collect();
        extract(&base_url(), html, &vocabulary)
    }

    #[test]
    fn test_extract_title() {
        let facts = run("<html><head><title>  Acme Inc  </title></head><body></body></html>");
        assert_eq!(facts.title, Some("Acme Inc".to_string()));
    }

    #[test]
    fn test_missing_title() {
        let facts = run("<html><head></head><body></body></html>");
        assert_eq!(facts.title, None);
    }

    #[test]
    fn test_extract_description() {
        let facts = run(
            r#"<html><head><meta name="description" content="We build rockets"></head><body></body></html>"#,
        );
        assert_eq!(facts.description, Some("We build rockets".to_string()));
    }

    #[test]
    fn test_contact_scenario() {
        let facts = run(
            "<html><body><p>Contact: jane@acme.com, (555) 123-4567</p></body></html>",
        );
        assert!(facts.contacts.emails.contains("jane@acme.com"));
        assert!(facts.contacts.phones.contains("(555) 123-4567"));
    }

    #[test]
    fn test_phone_separator_variants() {
        let facts = run("<html><body>Call 555.123.4567 or +1 555-987-6543</body></html>");
        assert!(facts.contacts.phones.contains("(555) 123-4567"));
        assert!(facts.contacts.phones.contains("(555) 987-6543"));
    }

    #[test]
    fn test_emails_deduplicated() {
        let facts =
            run("<html><body>a@x.com wrote to b@y.org and a@x.com again</body></html>");
        assert_eq!(facts.contacts.emails.len(), 2);
    }

    #[test]
    fn test_address_heuristic() {
        let facts = run(
            "<html><body><div>Visit us</div><div>500 Howard Street, Suite 300</div></body></html>",
        );
        assert_eq!(
            facts.contacts.address.as_deref(),
            Some("500 Howard Street, Suite 300")
        );
    }

    #[test]
    fn test_no_address_without_digits() {
        let facts = run("<html><body><div>Main Street office</div></body></html>");
        assert_eq!(facts.contacts.address, None);
    }

    #[test]
    fn test_business_terms_case_insensitive() {
        let facts = run("<html><body>Our PRODUCT uses ai for everything.</body></html>");
        assert!(facts.business_terms.contains("product"));
        assert!(facts.business_terms.contains("AI"));
        assert!(!facts.business_terms.contains("service"));
    }

    #[test]
    fn test_terms_recorded_once() {
        let facts = run("<html><body>product product product</body></html>");
        assert_eq!(
            facts.business_terms.iter().filter(|t| *t == "product").count(),
            1
        );
    }

    #[test]
    fn test_relative_link_resolution() {
        let facts = run(r#"<html><body><a href="/about">About</a></body></html>"#);
        assert_eq!(facts.links.len(), 1);
        assert_eq!(facts.links[0].as_str(), "https://example.com/about");
    }

    #[test]
    fn test_links_deduplicated_within_page() {
        let facts = run(
            r#"<html><body><a href="/a">1</a><a href="/a">2</a><a href="/b">3</a></body></html>"#,
        );
        assert_eq!(facts.links.len(), 2);
    }

    #[test]
    fn test_skips_non_crawlable_schemes() {
        let facts = run(
            r##"<html><body>
            <a href="javascript:void(0)">x</a>
            <a href="mailto:a@b.com">x</a>
            <a href="tel:+1234567890">x</a>
            <a href="#section">x</a>
            </body></html>"##,
        );
        assert!(facts.links.is_empty());
    }

    #[test]
    fn test_preview_skips_script_and_style() {
        let facts = run(
            "<html><head><style>body { color: red }</style></head>\
             <body><script>var x = 1;</script><p>Visible words</p></body></html>",
        );
        assert!(facts.text_preview.contains("Visible words"));
        assert!(!facts.text_preview.contains("var x"));
        assert!(!facts.text_preview.contains("color"));
    }

    #[test]
    fn test_preview_truncated() {
        let long_text = "word ".repeat(400);
        let html = format!("<html><body><p>{}</p></body></html>", long_text);
        let facts = run(&html);
        assert!(facts.text_preview.chars().count() <= PREVIEW_CHARS);
    }

    #[test]
    fn test_malformed_html_degrades_gracefully() {
        let facts = run("<html><body><div><p>Broken <a href='/x'>link</div></span>");
        // Partial results, never a panic
        assert_eq!(facts.links.len(), 1);
        assert!(facts.text_preview.contains("Broken"));
    }
}
