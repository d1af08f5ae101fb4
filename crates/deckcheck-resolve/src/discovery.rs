//! Document-link discovery inside fetched pages

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Candidates tried per page
pub const MAX_CANDIDATES: usize = 5;

lazy_static! {
    static ref HREF: Regex = Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap();
    static ref PDF_TOKEN: Regex = Regex::new(r#"(?i)(https?://[^\s"'<>]+\.pdf)"#).unwrap();
    static ref GOOGLE_EXPORT: Regex = Regex::new(
        r#"(?i)(https?://docs\.google\.com/presentation/d/[^"'\\]+/export/pdf[^"'\\]*)"#
    )
    .unwrap();
}

/// URL already points at a PDF or an explicit PDF export
pub fn is_likely_pdf_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".pdf") || lower.contains("/export/pdf") || lower.contains("format=pdf")
}

/// Last path segment with `.pdf` appended when missing
pub fn filename_from_url(url: &str) -> String {
    let base = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
        })
        .unwrap_or_else(|| "download".to_string());

    if base.ends_with(".pdf") {
        base
    } else {
        format!("{}.pdf", base)
    }
}

/// Up to [`MAX_CANDIDATES`] absolute document URLs found in `html`, in
/// discovery order: anchors, then bare `.pdf` tokens, then embedded
/// Google export links.
pub fn discover_pdf_links(html: &str, base_url: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut add = |link: String| {
        if seen.insert(link.clone()) {
            links.push(link);
        }
    };

    for caps in HREF.captures_iter(html) {
        let href = &caps[1];
        let absolute = match &base {
            Some(base) => base.join(href).ok(),
            None => Url::parse(href).ok(),
        };
        if let Some(full) = absolute.map(String::from) {
            if is_likely_pdf_url(&full) {
                add(full);
            }
        }
    }

    for caps in PDF_TOKEN.captures_iter(html) {
        add(caps[1].to_string());
    }

    for caps in GOOGLE_EXPORT.captures_iter(html) {
        add(caps[1].to_string());
    }

    links.truncate(MAX_CANDIDATES);
    links
}
