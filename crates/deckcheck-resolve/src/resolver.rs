//! URL resolution state machine
//!
//! Attempts run in order and stop at the first success:
//! 1. direct fetch when the URL already looks like a PDF
//! 2. platform export, when requested
//! 3. document links discovered in the page
//! 4. HTML heuristics on the page itself
//!
//! Every candidate is tried exactly once. A failed candidate is logged and
//! skipped. Resolution ends early only when the page itself cannot be
//! fetched, or when a direct PDF link serves bytes that do not parse.

use base64::Engine;
use deckcheck_analyze::{analyze_html, analyze_pdf, AnalyzeError};
use deckcheck_core::DeckAnalysis;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::discovery::{discover_pdf_links, filename_from_url, is_likely_pdf_url};
use crate::platform::{detect_platform, platform_hints, PlatformEndpoints};
use crate::{Resolution, ResolveError, ResolveMethod, ResolveRequest};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A PDF candidate that passed every check
#[derive(Debug, Clone)]
pub struct FetchedPdf {
    pub file_name: String,
    pub file_size: u64,
    pub bytes: Vec<u8>,
    pub analysis: DeckAnalysis,
}

pub struct UrlResolver {
    client: Client,
    endpoints: PlatformEndpoints,
}

impl UrlResolver {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client with custom timeout, using default client");
                Client::new()
            });
        Self {
            client,
            endpoints: PlatformEndpoints::default(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_endpoints(mut self, endpoints: PlatformEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Resolve `request.url`. `default_export` applies when the request
    /// does not say whether to try platform export.
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
        default_export: bool,
    ) -> Result<Resolution, ResolveError> {
        let url = request.url.as_deref().map(str::trim).unwrap_or("");
        if url.is_empty() {
            return Err(ResolveError::MissingUrl);
        }

        // 1) direct document
        if is_likely_pdf_url(url) {
            match self.fetch_pdf("pdf-direct", url).await {
                Ok(Some(pdf)) => {
                    info!(url, method = "pdf-direct", "url resolved");
                    return Ok(Resolution::from_pdf(ResolveMethod::PdfDirect, pdf));
                }
                Ok(None) => {}
                Err(e) => return Err(ResolveError::Unparseable(e.to_string())),
            }
        }

        // 2) platform export
        let platform = detect_platform(url);
        if request.try_export_to_pdf.unwrap_or(default_export) {
            if let Some((export_url, method)) = self.endpoints.export_url(platform, url) {
                if let Some(pdf) = self.candidate(method.as_str(), &export_url).await {
                    info!(url, method = method.as_str(), "url resolved");
                    let mut resolution = Resolution::from_pdf(method, pdf);
                    resolution.platform = Some(platform);
                    return Ok(resolution);
                }
            }
        }

        // 3) the page itself
        let html = self.fetch_page(url).await?;
        for link in discover_pdf_links(&html, url) {
            if let Some(pdf) = self.candidate("pdf-from-html", &link).await {
                info!(url, link = %link, method = "pdf-from-html", "url resolved");
                let mut resolution = Resolution::from_pdf(ResolveMethod::PdfFromHtml, pdf);
                resolution.discovered_from = Some(url.to_string());
                resolution.discovered_link = Some(link);
                return Ok(resolution);
            }
        }

        // 4) heuristics
        info!(url, method = "html", platform = %platform, "falling back to html heuristics");
        let mut resolution = Resolution::from_html(analyze_html(&html));
        resolution.platform = Some(platform);
        resolution.platform_hints = Some(platform_hints(platform, &html));
        Ok(resolution)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))
    }

    /// Fallback candidate: a document that does not parse is skipped like
    /// any other miss.
    async fn candidate(&self, attempt: &str, url: &str) -> Option<FetchedPdf> {
        match self.fetch_pdf(attempt, url).await {
            Ok(pdf) => pdf,
            Err(e) => {
                warn!(attempt, url, reason = %e, "candidate is not a parseable pdf");
                None
            }
        }
    }

    /// One PDF candidate: success status, a `pdf` content type, and
    /// parseable bytes. A transport or content-type miss is logged and
    /// yields `Ok(None)`; a `pdf` response whose bytes do not parse is an
    /// error.
    pub async fn fetch_pdf(&self, attempt: &str, url: &str) -> Result<Option<FetchedPdf>, AnalyzeError> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(attempt, url, reason = %e, "candidate fetch failed");
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(attempt, url, reason = %status, "candidate returned non-success status");
            return Ok(None);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if !content_type.contains("pdf") {
            warn!(attempt, url, reason = %content_type, "candidate is not a pdf");
            return Ok(None);
        }

        let declared_size = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                warn!(attempt, url, reason = %e, "candidate body unreadable");
                return Ok(None);
            }
        };

        let analysis = analyze_pdf(&bytes)?;

        debug!(attempt, url, bytes = bytes.len(), "candidate accepted");
        Ok(Some(FetchedPdf {
            file_name: filename_from_url(url),
            file_size: declared_size.unwrap_or(bytes.len() as u64),
            bytes,
            analysis,
        }))
    }
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn encode_document(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
