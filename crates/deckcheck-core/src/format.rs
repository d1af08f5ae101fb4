//! Format Detector: classify a submission from filename, MIME, or URL.
//!
//! Precedence (first match wins):
//! 1. presentation-SaaS domains in the name/URL
//! 2. file extension / MIME pairs and explicit PDF export hints
//! 3. any other `http`-prefixed string
//! 4. unknown

use crate::data_model::DeckFormat;

/// Whatever the caller knows about a candidate submission
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatHint<'a> {
    pub file_name: Option<&'a str>,
    pub mime: Option<&'a str>,
    pub url: Option<&'a str>,
}

impl<'a> FormatHint<'a> {
    pub fn file(file_name: &'a str, mime: Option<&'a str>) -> Self {
        Self {
            file_name: Some(file_name),
            mime,
            url: None,
        }
    }

    pub fn url(url: &'a str) -> Self {
        Self {
            file_name: None,
            mime: None,
            url: Some(url),
        }
    }
}

/// SaaS hosts that have no tag of their own
const GENERIC_SAAS_DOMAINS: &[&str] = &["pitch.com", "slides.com", "prezi.com"];

/// Detect the format tag. Pure and case-insensitive; missing fields are fine.
pub fn detect_format(hint: &FormatHint<'_>) -> DeckFormat {
    let name_or_url = hint
        .file_name
        .filter(|s| !s.is_empty())
        .or(hint.url)
        .unwrap_or("")
        .to_lowercase();
    let mime = hint.mime.unwrap_or("").to_lowercase();

    if let Some(format) = detect_saas(&name_or_url) {
        return format;
    }

    if name_or_url.ends_with(".pdf")
        || mime == "application/pdf"
        || name_or_url.contains("export/pdf")
        || name_or_url.contains("format=pdf")
    {
        return DeckFormat::Pdf;
    }
    if name_or_url.ends_with(".pptx")
        || name_or_url.ends_with(".ppt")
        || mime.contains("powerpoint")
        || mime.contains("presentationml")
    {
        return DeckFormat::Pptx;
    }
    if name_or_url.ends_with(".key") || mime.contains("keynote") {
        return DeckFormat::Keynote;
    }
    if name_or_url.ends_with(".odp") || mime.contains("opendocument.presentation") {
        // recognized, but there is no tag for OpenDocument decks
        return DeckFormat::Unknown;
    }

    if name_or_url.starts_with("http") {
        return DeckFormat::Url;
    }

    DeckFormat::Unknown
}

fn detect_saas(lower: &str) -> Option<DeckFormat> {
    if lower.contains("docs.google.com/presentation") {
        return Some(DeckFormat::GoogleSlides);
    }
    if lower.contains("canva.com/design") {
        return Some(DeckFormat::Canva);
    }
    if lower.contains("figma.com/file") || lower.contains("figma.com/proto") {
        return Some(DeckFormat::Figma);
    }
    if GENERIC_SAAS_DOMAINS.iter().any(|d| lower.contains(d)) {
        return Some(DeckFormat::Url);
    }
    None
}
