//! Deckcheck Analyze: structural metadata from deck bytes or page HTML
//!
//! Two fidelity levels live side by side:
//!
//! - [`pdf`] parses the page tree for page count and page sizes, the only
//!   facts that need real document structure.
//! - [`heuristics`] and [`html`] are pattern scans producing approximate,
//!   deterministic counts.
//!
//! # Example
//!
//! ```ignore
//! use deckcheck_analyze::analyze_pdf;
//!
//! let bytes = std::fs::read("talk.pdf")?;
//! let analysis = analyze_pdf(&bytes)?;
//! println!("{:?} pages, ratio {:?}", analysis.page_count, analysis.common_ratio());
//! ```

pub mod aspect;
pub mod heuristics;
pub mod html;
pub mod pdf;

pub use aspect::{describe_ratio, snap_ratio, summarize_aspect, SNAP_TOLERANCE};
pub use html::analyze_html;
pub use pdf::analyze_pdf;

use deckcheck_core::{DeckAnalysis, DeckFormat};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// Bytes are not a parseable document
    #[error("PARSE/PDF: {0}")]
    Parse(String),

    /// Parsed, but the page tree is broken
    #[error("PARSE/STRUCTURE: {0}")]
    Structure(String),
}

/// Analyze an uploaded document of a known format.
///
/// Only PDF bytes can be analyzed; other formats yield `Ok(None)` and are
/// judged on format and size alone.
pub fn analyze_document(bytes: &[u8], format: DeckFormat) -> Result<Option<DeckAnalysis>, AnalyzeError> {
    match format {
        DeckFormat::Pdf => analyze_pdf(bytes).map(Some),
        other => {
            tracing::debug!(format = %other, "no analyzer for format");
            Ok(None)
        }
    }
}
