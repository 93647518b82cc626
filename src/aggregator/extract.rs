//! Per-source field extraction
//!
//! One pure function per source kind, each mapping `(parsed HTML, visible
//! text)` to a flat field map. Selection happens by matching on
//! [`SourceKind`]; there is no name-based dispatch. All extraction is
//! best-effort: a field that cannot be found is simply absent.

use crate::aggregator::sources::SourceKind;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// Field map produced by one source
pub type FieldMap = BTreeMap<String, String>;

/// Longest summary/description snippet kept per source
const SUMMARY_CHARS: usize = 1000;

static MARKET_CAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Market Cap[:\s]+([0-9.,]+[BMK]?)").expect("valid pattern"));
static PE_RATIO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PE Ratio[:\s]+([0-9.]+)").expect("valid pattern"));
static REVENUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Revenue[:\s]+\$?([0-9.,]+\s*[BMK]?)").expect("valid pattern"));
static EMPLOYEES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Employees?[:\s]+([0-9,]+)").expect("valid pattern"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:Description|Overview)[:\s]+(.{100,500})").expect("valid pattern")
});
static TOTAL_FUNDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Total Funding Amount[:\s]+\$([0-9.,]+[BMK]?)").expect("valid pattern")
});
static FOUNDED_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Founded Date[:\s]+([A-Za-z]+\s+\d{1,2},\s+\d{4})").expect("valid pattern")
});
static FOUNDED_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Founded[:\s]+([0-9]{4})").expect("valid pattern"));
static EMPLOYEE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Number of Employees[:\s]+([0-9,\-]+)").expect("valid pattern")
});
static TRANSACTIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Total Transactions[:\s]+([0-9,]+)").expect("valid pattern"));

/// Extracts the field map for a source
pub fn extract_fields(kind: SourceKind, document: &Html, text: &str) -> FieldMap {
    match kind {
        SourceKind::Wikipedia => extract_wikipedia(document),
        SourceKind::YahooFinance => extract_yahoo_finance(document, text),
        SourceKind::Crunchbase => extract_crunchbase(text),
        SourceKind::ImportYeti => extract_importyeti(document, text),
        SourceKind::Sec | SourceKind::BuiltWith | SourceKind::Custom => {
            extract_generic(document, text)
        }
    }
}

/// Wikipedia: lead paragraph plus the canonical infobox rows
fn extract_wikipedia(document: &Html) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Ok(selector) = Selector::parse("#mw-content-text p") {
        if let Some(paragraph) = document
            .select(&selector)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .find(|t| !t.is_empty())
        {
            insert_truncated(&mut fields, "summary", &paragraph);
        }
    }

    if let Ok(row_selector) = Selector::parse("table.infobox tr") {
        let header_selector = Selector::parse("th").ok();
        let value_selector = Selector::parse("td").ok();

        for row in document.select(&row_selector) {
            let (Some(hs), Some(vs)) = (header_selector.as_ref(), value_selector.as_ref()) else {
                break;
            };
            let header = row
                .select(hs)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_lowercase());
            let value = row
                .select(vs)
                .next()
                .map(|v| v.text().collect::<String>().trim().to_string());

            if let (Some(key), Some(value)) = (header, value) {
                if value.is_empty() {
                    continue;
                }
                match key.as_str() {
                    "founded" => fields.insert("founded".to_string(), value),
                    "founder" | "founders" => fields.insert("founders".to_string(), value),
                    "industry" => fields.insert("industry".to_string(), value),
                    "headquarters" => fields.insert("headquarters".to_string(), value),
                    "revenue" => fields.insert("revenue".to_string(), value),
                    "ceo" => fields.insert("ceo".to_string(), value),
                    _ => None,
                };
            }
        }
    }

    fields
}

/// Yahoo Finance: company name plus key statistics
fn extract_yahoo_finance(document: &Html, text: &str) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Some(name) = first_text(document, "h1") {
        fields.insert("company_full_name".to_string(), name);
    }

    capture_into(&mut fields, "market_cap", &MARKET_CAP_RE, text);
    capture_into(&mut fields, "pe_ratio", &PE_RATIO_RE, text);
    capture_into(&mut fields, "revenue", &REVENUE_RE, text);
    capture_into(&mut fields, "employees", &EMPLOYEES_RE, text);

    if let Some(summary) = first_text(document, r#"section[data-testid="description"]"#) {
        insert_truncated(&mut fields, "business_summary", &summary);
    }

    fields
}

/// Crunchbase: description, funding, and company facts from page text
fn extract_crunchbase(text: &str) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Some(caps) = DESCRIPTION_RE.captures(text) {
        insert_truncated(&mut fields, "description", caps[1].trim());
    }

    capture_into(&mut fields, "total_funding", &TOTAL_FUNDING_RE, text);
    capture_into(&mut fields, "founded", &FOUNDED_DATE_RE, text);
    capture_into(&mut fields, "employees", &EMPLOYEE_RANGE_RE, text);

    fields
}

/// ImportYeti: trade overview and shipment statistics
fn extract_importyeti(document: &Html, text: &str) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Some(description) = first_text(document, "div.company-overview") {
        insert_truncated(&mut fields, "description", &description);
    }

    capture_into(&mut fields, "total_transactions", &TRANSACTIONS_RE, text);

    fields
}

/// Fallback extraction for sources without a dedicated strategy
fn extract_generic(document: &Html, text: &str) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Some(title) = first_text(document, "h1") {
        fields.insert("title".to_string(), title);
    }

    if let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) {
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|e| e.value().attr("content"))
        {
            fields.insert("description".to_string(), content.trim().to_string());
        }
    }

    capture_into(&mut fields, "revenue", &REVENUE_RE, text);
    capture_into(&mut fields, "employees", &EMPLOYEES_RE, text);
    capture_into(&mut fields, "founded", &FOUNDED_YEAR_RE, text);

    // First substantial paragraph as the summary
    if let Ok(selector) = Selector::parse("p") {
        if let Some(paragraph) = document
            .select(&selector)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .find(|t| t.len() > 100)
        {
            let truncated: String = paragraph.chars().take(500).collect();
            fields.insert("summary".to_string(), truncated);
        }
    }

    fields
}

/// First element matching `selector`, as trimmed text
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Runs a single-capture regex over text and stores the hit, if any
fn capture_into(fields: &mut FieldMap, key: &str, pattern: &Regex, text: &str) {
    if let Some(caps) = pattern.captures(text) {
        fields.insert(key.to_string(), caps[1].trim().to_string());
    }
}

fn insert_truncated(fields: &mut FieldMap, key: &str, value: &str) {
    let truncated: String = value.chars().take(SUMMARY_CHARS).collect();
    fields.insert(key.to_string(), truncated);
}
