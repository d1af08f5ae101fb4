//! Deckcheck Resolve: submission URL to analyzable content
//!
//! # Example
//!
//! ```ignore
//! use deckcheck_resolve::{ResolveRequest, UrlResolver};
//!
//! let resolver = UrlResolver::new();
//! let request = ResolveRequest::new("https://docs.google.com/presentation/d/abc/edit").with_export(true);
//! let resolution = resolver.resolve(&request, false).await?;
//! println!("{} via {:?}", resolution.ok, resolution.method);
//! ```

pub mod discovery;
pub mod platform;
pub mod resolver;

pub use discovery::{discover_pdf_links, filename_from_url, is_likely_pdf_url};
pub use platform::{detect_platform, platform_hints, Platform, PlatformEndpoints, PlatformHints};
pub use resolver::{FetchedPdf, UrlResolver};

use deckcheck_core::{Deck, DeckAnalysis, FileInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a URL was turned into content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveMethod {
    PdfDirect,
    GoogleSlidesExport,
    FigmaExport,
    CanvaExport,
    PdfFromHtml,
    Html,
}

impl ResolveMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveMethod::PdfDirect => "pdf-direct",
            ResolveMethod::GoogleSlidesExport => "google-slides-export",
            ResolveMethod::FigmaExport => "figma-export",
            ResolveMethod::CanvaExport => "canva-export",
            ResolveMethod::PdfFromHtml => "pdf-from-html",
            ResolveMethod::Html => "html",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Missing URL.")]
    MissingUrl,

    /// The page itself answered with a non-success status
    #[error("Failed to fetch URL: {status} {reason}")]
    Upstream { status: u16, reason: String },

    /// The page itself could not be fetched at all
    #[error("{0}")]
    Network(String),

    /// A direct document link served bytes that do not parse
    #[error("{0}")]
    Unparseable(String),
}

impl ResolveError {
    /// HTTP status to report to the caller
    pub fn http_status(&self) -> u16 {
        match self {
            ResolveError::MissingUrl | ResolveError::Upstream { .. } => 400,
            ResolveError::Network(_) => 500,
            ResolveError::Unparseable(_) => 422,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Falls back to the organizer default when absent
    #[serde(default)]
    pub try_export_to_pdf: Option<bool>,
}

impl ResolveRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            try_export_to_pdf: None,
        }
    }

    pub fn with_export(mut self, try_export: bool) -> Self {
        self.try_export_to_pdf = Some(try_export);
        self
    }
}

/// Unified resolution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ResolveMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<DeckAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_hints: Option<PlatformHints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_link: Option<String>,

    /// Raw document bytes for in-process callers
    #[serde(skip)]
    pub document: Option<Vec<u8>>,
}

impl Resolution {
    fn empty(ok: bool) -> Self {
        Self {
            ok,
            method: None,
            analysis: None,
            file_name: None,
            file_size: None,
            document_base64: None,
            message: None,
            platform: None,
            platform_hints: None,
            discovered_from: None,
            discovered_link: None,
            document: None,
        }
    }

    pub fn from_pdf(method: ResolveMethod, pdf: FetchedPdf) -> Self {
        Self {
            method: Some(method),
            analysis: Some(pdf.analysis),
            file_name: Some(pdf.file_name),
            file_size: Some(pdf.file_size),
            document_base64: Some(resolver::encode_document(&pdf.bytes)),
            document: Some(pdf.bytes),
            ..Self::empty(true)
        }
    }

    pub fn from_html(analysis: DeckAnalysis) -> Self {
        Self {
            method: Some(ResolveMethod::Html),
            analysis: Some(analysis),
            ..Self::empty(true)
        }
    }

    pub fn failure(error: &ResolveError) -> Self {
        Self {
            message: Some(error.to_string()),
            ..Self::empty(false)
        }
    }

    /// True when a downloadable document was obtained
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Attach the resolved content to a URL deck
    pub fn apply_to(&self, deck: &mut Deck) {
        deck.analysis = self.analysis.clone();
        deck.platform = self.platform.map(|p| p.as_str().to_string());
        if let (Some(file_name), Some(file_size)) = (&self.file_name, self.file_size) {
            deck.file_info = Some(FileInfo {
                file_name: file_name.clone(),
                size_bytes: file_size,
                mime: "application/pdf".to_string(),
            });
            deck.file_data = self.document.clone();
        }
    }
}
