//! Wire types for AI rule evaluation
//!
//! The reasoning service only ever sees a [`DeckSummary`]: metadata, never
//! file content.

use deckcheck_core::{Deck, DeckFormat, SourceType};
use serde::{Deserialize, Serialize};

/// Aspect part of the summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectInfo {
    #[serde(default)]
    pub common_ratio: Option<String>,
}

/// Metadata-only view of a deck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckSummary {
    pub format: Option<DeckFormat>,
    pub platform: Option<String>,
    pub page_count: Option<u32>,
    pub has_video: Option<bool>,
    pub has_audio: Option<bool>,
    pub aspect: Option<AspectInfo>,
    pub images_approx: Option<u32>,
    pub text_ops_approx: Option<u32>,
    pub bullets_approx: Option<u32>,
    pub source_type: Option<SourceType>,
}

impl DeckSummary {
    pub fn from_deck(deck: &Deck) -> Self {
        let analysis = deck.analysis.as_ref();
        Self {
            format: Some(deck.format),
            platform: deck.platform.clone(),
            page_count: analysis.and_then(|a| a.page_count),
            has_video: analysis.and_then(|a| a.has_video),
            has_audio: analysis.and_then(|a| a.has_audio),
            aspect: analysis.map(|a| AspectInfo {
                common_ratio: a.common_ratio().map(str::to_string),
            }),
            images_approx: analysis.and_then(|a| a.images_approx),
            text_ops_approx: analysis.and_then(|a| a.text_ops_approx),
            bullets_approx: analysis.and_then(|a| a.bullets_approx),
            source_type: Some(deck.source_type),
        }
    }

    pub fn common_ratio(&self) -> Option<&str> {
        self.aspect.as_ref().and_then(|a| a.common_ratio.as_deref())
    }
}

/// Body of an AI-check request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiCheckRequest {
    pub rule_id: String,
    pub rule_label: String,
    pub prompt: String,
    pub deck_summary: DeckSummary,
}

/// Outcome of one AI rule. Degraded paths set `fallback` and still pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiVerdict {
    pub pass: bool,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiVerdict {
    pub fn new(pass: bool, reasons: Vec<String>) -> Self {
        Self {
            pass,
            reasons,
            fallback: false,
            error: None,
        }
    }

    /// Fail-open result
    pub fn fallback(reason: impl Into<String>, error: Option<String>) -> Self {
        Self {
            pass: true,
            reasons: vec![reason.into()],
            fallback: true,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckcheck_core::{AnalysisMethod, DeckAnalysis};

    #[test]
    fn test_summary_from_deck() {
        let mut analysis = DeckAnalysis::new(AnalysisMethod::Html);
        analysis.images_approx = Some(4);
        let mut deck = Deck::from_url("https://www.figma.com/file/abc/Talk").with_analysis(analysis);
        deck.platform = Some("figma".to_string());

        let summary = DeckSummary::from_deck(&deck);
        assert_eq!(summary.format, Some(DeckFormat::Figma));
        assert_eq!(summary.images_approx, Some(4));
        assert_eq!(summary.page_count, None);
        assert_eq!(summary.common_ratio(), None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["sourceType"], "url");
        assert_eq!(json["platform"], "figma");
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let request: AiCheckRequest =
            serde_json::from_str(r#"{"ruleId":"ai-title","deckSummary":{"imagesApprox":2}}"#).unwrap();
        assert_eq!(request.rule_id, "ai-title");
        assert_eq!(request.rule_label, "");
        assert_eq!(request.deck_summary.images_approx, Some(2));
    }

    #[test]
    fn test_verdict_fallback_flag_only_when_set() {
        let json = serde_json::to_value(AiVerdict::new(true, vec!["ok".into()])).unwrap();
        assert!(json.get("fallback").is_none());

        let json = serde_json::to_value(AiVerdict::fallback("degraded", None)).unwrap();
        assert_eq!(json["fallback"], true);
        assert_eq!(json["pass"], true);
    }
}
