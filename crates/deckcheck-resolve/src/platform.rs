//! Presentation platforms: detection, export endpoints, and page hints

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::ResolveMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    GoogleSlides,
    Figma,
    Canva,
    SlidesCom,
    Prezi,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GoogleSlides => "google-slides",
            Platform::Figma => "figma",
            Platform::Canva => "canva",
            Platform::SlidesCom => "slides-com",
            Platform::Prezi => "prezi",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform hosting `url`, by case-insensitive substring
pub fn detect_platform(url: &str) -> Platform {
    let lower = url.to_lowercase();
    if lower.contains("docs.google.com") {
        Platform::GoogleSlides
    } else if lower.contains("figma.com") {
        Platform::Figma
    } else if lower.contains("canva.com") {
        Platform::Canva
    } else if lower.contains("slides.com") {
        Platform::SlidesCom
    } else if lower.contains("prezi.com") {
        Platform::Prezi
    } else {
        Platform::Unknown
    }
}

/// Base URLs of the export endpoints. Overridable for tests and proxies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
    pub google_docs: String,
    pub figma_api: String,
    pub canva: String,
}

impl Default for PlatformEndpoints {
    fn default() -> Self {
        Self {
            google_docs: "https://docs.google.com".to_string(),
            figma_api: "https://api.figma.com".to_string(),
            canva: "https://www.canva.com".to_string(),
        }
    }
}

lazy_static! {
    static ref GOOGLE_ID: Regex = Regex::new(r"/presentation/d/([^/]+)").unwrap();
    static ref FIGMA_KEY: Regex = Regex::new(r"/file/([^/]+)").unwrap();
    static ref CANVA_ID: Regex = Regex::new(r"/design/([^/]+)").unwrap();

    static ref SLIDES_HINT: Regex = Regex::new(r"(?i)([0-9]+)\s*slides?").unwrap();
    static ref FRAMES_HINT: Regex = Regex::new(r"(?i)([0-9]+)\s*frames?").unwrap();
    static ref PAGES_HINT: Regex = Regex::new(r"(?i)([0-9]+)\s*pages?").unwrap();
}

fn path_id(url: &Url, host: &str, pattern: &Regex) -> Option<String> {
    if !url.host_str()?.contains(host) {
        return None;
    }
    pattern
        .captures(url.path())
        .map(|caps| caps[1].to_string())
}

impl PlatformEndpoints {
    /// Guessed export-to-PDF URL for a platform link, with its method tag
    pub fn export_url(&self, platform: Platform, input: &str) -> Option<(String, ResolveMethod)> {
        let url = Url::parse(input).ok()?;
        match platform {
            Platform::GoogleSlides => path_id(&url, "docs.google.com", &GOOGLE_ID).map(|id| {
                (
                    format!("{}/presentation/d/{}/export/pdf", self.google_docs, id),
                    ResolveMethod::GoogleSlidesExport,
                )
            }),
            Platform::Figma => path_id(&url, "figma.com", &FIGMA_KEY).map(|key| {
                (
                    format!("{}/v1/files/{}/export?format=pdf", self.figma_api, key),
                    ResolveMethod::FigmaExport,
                )
            }),
            Platform::Canva => path_id(&url, "canva.com", &CANVA_ID).map(|id| {
                (
                    format!("{}/api/v1/designs/{}/export/pdf", self.canva, id),
                    ResolveMethod::CanvaExport,
                )
            }),
            Platform::SlidesCom | Platform::Prezi | Platform::Unknown => None,
        }
    }
}

/// What the page itself reveals about the deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformHints {
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_slides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_frames: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_pages: Option<u32>,
    pub export_available: bool,
    pub requires_auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_note: Option<String>,
}

fn first_count(pattern: &Regex, html: &str) -> Option<u32> {
    pattern.captures(html).and_then(|caps| caps[1].parse().ok())
}

pub fn platform_hints(platform: Platform, html: &str) -> PlatformHints {
    let mut hints = PlatformHints {
        platform,
        estimated_slides: None,
        estimated_frames: None,
        estimated_pages: None,
        export_available: false,
        requires_auth: false,
        auth_note: None,
    };

    match platform {
        Platform::GoogleSlides => {
            hints.estimated_slides = first_count(&SLIDES_HINT, html);
            hints.export_available = true;
        }
        Platform::Figma => {
            hints.estimated_frames = first_count(&FRAMES_HINT, html);
            hints.export_available = true;
            hints.requires_auth = true;
            hints.auth_note = Some("Figma export requires API token".to_string());
        }
        Platform::Canva => {
            hints.estimated_pages = first_count(&PAGES_HINT, html);
            hints.export_available = true;
            hints.requires_auth = true;
            hints.auth_note = Some("Canva export requires authentication".to_string());
        }
        Platform::SlidesCom | Platform::Prezi | Platform::Unknown => {}
    }

    hints
}
