//! Deckcheck Core: data model, format detection, and configuration
//!
//! Shared vocabulary for every deckcheck crate. Analysis, rule evaluation,
//! and URL resolution all exchange the types defined here.
//!
//! # Example
//!
//! ```
//! use deckcheck_core::{detect_format, DeckFormat, FormatHint};
//!
//! let format = detect_format(&FormatHint::file("keynote-talk.PDF", None));
//! assert_eq!(format, DeckFormat::Pdf);
//!
//! let format = detect_format(&FormatHint::url("https://docs.google.com/presentation/d/abc/edit"));
//! assert_eq!(format, DeckFormat::GoogleSlides);
//! ```

pub mod config;
pub mod context;
pub mod data_model;
pub mod error;
pub mod format;

pub use config::{
    AiCheck, Config, ConfigProvider, InMemoryConfigProvider, YamlFileConfigProvider,
};
pub use context::RunContext;
pub use data_model::{
    AnalysisMethod, AspectSummary, Deck, DeckAnalysis, DeckFormat, FileInfo, PageSize,
    SourceType, TestResult, TestStatus, TestType,
};
pub use error::DeckError;
pub use format::{detect_format, FormatHint};

/// Crate version reported by the API health endpoint
pub const DECKCHECK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content fingerprint used to show that two analyses saw identical bytes
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(bytes))
}
