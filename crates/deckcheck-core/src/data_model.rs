//! Data Model: Deck, DeckAnalysis, TestResult
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::{detect_format, FormatHint};

/// Format tag of a submission, computed once from filename/MIME/URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckFormat {
    Pdf,
    Pptx,
    Keynote,
    GoogleSlides,
    Canva,
    Figma,
    Url,
    Unknown,
}

impl DeckFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeckFormat::Pdf => "pdf",
            DeckFormat::Pptx => "pptx",
            DeckFormat::Keynote => "keynote",
            DeckFormat::GoogleSlides => "google-slides",
            DeckFormat::Canva => "canva",
            DeckFormat::Figma => "figma",
            DeckFormat::Url => "url",
            DeckFormat::Unknown => "unknown",
        }
    }

    /// Upper-case tag used in human-readable rule labels ("PDF", "GOOGLE-SLIDES")
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for DeckFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a deck came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    File,
    Url,
}

/// Provenance of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    Pdf,
    Html,
}

/// Physical page size in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Modal aspect ratio of a deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectSummary {
    /// Named ratio ("16:9", "4:3", "3:2", "1:1"), raw ratio string, or null
    pub common_ratio: Option<String>,
    /// Per-page ratios (3 decimals)
    pub ratios: Vec<f64>,
}

impl AspectSummary {
    pub fn empty() -> Self {
        Self {
            common_ratio: None,
            ratios: Vec::new(),
        }
    }
}

/// Structural metadata extracted from a deck.
///
/// Every field except `analysis_method` is optional: an HTML resolution
/// cannot populate all of them, and an absent media flag means
/// "not determined" rather than "no media".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_sizes_pt: Option<Vec<PageSize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_summary: Option<AspectSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts_approx: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_video: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_ops_approx: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_approx: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets_approx: Option<u32>,

    pub analysis_method: AnalysisMethod,
}

impl DeckAnalysis {
    /// Empty analysis tagged with its provenance
    pub fn new(analysis_method: AnalysisMethod) -> Self {
        Self {
            page_count: None,
            page_sizes_pt: None,
            aspect_summary: None,
            fonts_approx: None,
            has_video: None,
            has_audio: None,
            text_ops_approx: None,
            images_approx: None,
            bullets_approx: None,
            analysis_method,
        }
    }

    /// The snapped common ratio, if one was detected
    pub fn common_ratio(&self) -> Option<&str> {
        self.aspect_summary
            .as_ref()
            .and_then(|a| a.common_ratio.as_deref())
    }
}

/// Uploaded file metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_name: String,
    pub size_bytes: u64,
    pub mime: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Deterministic,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Running,
    Pass,
    Fail,
}

impl TestStatus {
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        }
    }
}

/// Outcome of one rule in one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub status: TestStatus,
    #[serde(default)]
    pub details: Vec<String>,
}

impl TestResult {
    pub fn deterministic(
        id: impl Into<String>,
        label: impl Into<String>,
        pass: bool,
        details: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            test_type: TestType::Deterministic,
            status: TestStatus::from_pass(pass),
            details,
        }
    }

    pub fn ai(id: impl Into<String>, label: impl Into<String>, pass: bool, details: Vec<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            test_type: TestType::Ai,
            status: TestStatus::from_pass(pass),
            details,
        }
    }

    /// Placeholder shown while an AI rule is still in flight
    pub fn running(id: impl Into<String>, label: impl Into<String>, test_type: TestType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            test_type,
            status: TestStatus::Running,
            details: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Pass
    }
}

/// A submission under validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub source_type: SourceType,
    pub format: DeckFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,

    /// Raw bytes of an uploaded or resolved document; never serialized
    #[serde(skip)]
    pub file_data: Option<Vec<u8>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Hosting platform reported by URL resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<DeckAnalysis>,

    #[serde(default)]
    pub tests: Vec<TestResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Deck {
    /// Deck for an uploaded file. The format is detected from name and MIME.
    pub fn from_file(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime.into();
        let format = detect_format(&FormatHint::file(&file_name, Some(&mime)));

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: file_name.clone(),
            source_type: SourceType::File,
            format,
            file_info: Some(FileInfo {
                file_name,
                size_bytes: bytes.len() as u64,
                mime,
            }),
            file_data: Some(bytes),
            url: None,
            platform: None,
            analysis: None,
            tests: Vec::new(),
            submitter_name: None,
            created_at: Some(Utc::now()),
            submitted_at: None,
        }
    }

    /// Deck for a submitted link
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let format = detect_format(&FormatHint::url(&url));

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: url.clone(),
            source_type: SourceType::Url,
            format,
            file_info: None,
            file_data: None,
            url: Some(url),
            platform: None,
            analysis: None,
            tests: Vec::new(),
            submitter_name: None,
            created_at: Some(Utc::now()),
            submitted_at: None,
        }
    }

    pub fn with_analysis(mut self, analysis: DeckAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn is_url(&self) -> bool {
        self.source_type == SourceType::Url
    }

    /// Known byte size: declared file info first, then held bytes
    pub fn size_bytes(&self) -> Option<u64> {
        self.file_info
            .as_ref()
            .map(|info| info.size_bytes)
            .or_else(|| self.file_data.as_ref().map(|data| data.len() as u64))
    }

    /// Replace the whole result list (a re-run never merges)
    pub fn replace_tests(&mut self, tests: Vec<TestResult>) {
        self.tests = tests;
    }

    /// Replace the slot holding `result.id`, appending when absent
    pub fn upsert_test(&mut self, result: TestResult) {
        match self.tests.iter_mut().find(|t| t.id == result.id) {
            Some(slot) => *slot = result,
            None => self.tests.push(result),
        }
    }

    /// A deck may be submitted once it has results and every one passed
    pub fn can_submit(&self) -> bool {
        !self.tests.is_empty() && self.tests.iter().all(TestResult::passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_serializes_as_tag() {
        let json = serde_json::to_string(&DeckFormat::GoogleSlides).unwrap();
        assert_eq!(json, "\"google-slides\"");

        let parsed: DeckFormat = serde_json::from_str("\"keynote\"").unwrap();
        assert_eq!(parsed, DeckFormat::Keynote);
        assert_eq!(DeckFormat::GoogleSlides.label(), "GOOGLE-SLIDES");
    }

    #[test]
    fn test_analysis_omits_absent_fields() {
        let mut analysis = DeckAnalysis::new(AnalysisMethod::Html);
        analysis.images_approx = Some(3);

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["imagesApprox"], 3);
        assert_eq!(json["analysisMethod"], "html");
        assert!(json.get("hasVideo").is_none());
        assert!(json.get("pageCount").is_none());
    }

    #[test]
    fn test_aspect_summary_null_ratio() {
        let json = serde_json::to_value(AspectSummary::empty()).unwrap();
        assert!(json["commonRatio"].is_null());
    }

    #[test]
    fn test_test_result_type_field() {
        let result = TestResult::deterministic("det:format", "Format", true, vec![]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "deterministic");
        assert_eq!(json["status"], "pass");
    }

    #[test]
    fn test_deck_from_file() {
        let deck = Deck::from_file("talk.pdf", "application/pdf", vec![0u8; 2048]);
        assert_eq!(deck.format, DeckFormat::Pdf);
        assert_eq!(deck.size_bytes(), Some(2048));
        assert!(!deck.is_url());
    }

    #[test]
    fn test_deck_upsert_replaces_slot() {
        let mut deck = Deck::from_url("https://example.com/talk");
        deck.upsert_test(TestResult::ai("ai:title", "Title", false, vec!["old".into()]));
        deck.upsert_test(TestResult::ai("ai:images", "Images", true, vec![]));
        deck.upsert_test(TestResult::ai("ai:title", "Title", true, vec!["new".into()]));

        assert_eq!(deck.tests.len(), 2);
        assert_eq!(deck.tests[0].details, vec!["new".to_string()]);
        assert!(deck.can_submit());
    }

    #[test]
    fn test_deck_without_results_cannot_submit() {
        let deck = Deck::from_url("https://example.com/talk");
        assert!(!deck.can_submit());
    }
}
