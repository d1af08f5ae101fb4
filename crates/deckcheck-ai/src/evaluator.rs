//! AI rule evaluation
//!
//! Order of decisions for one rule:
//! 1. deterministic short-circuits (no remote call)
//! 2. no service configured: fail open
//! 3. remote call; any error fails open
//! 4. unstructured output fails open, otherwise reasons are normalized
//!
//! Nothing here returns an error: an AI rule must never block a
//! submission because of infrastructure.

use std::sync::Arc;

use deckcheck_core::AiCheck;
use lazy_static::lazy_static;
use regex::Regex;

use crate::parser::{normalize_reasons, parse_verdict};
use crate::prompts::PromptRenderer;
use crate::service::ReasoningService;
use crate::summary::{AiCheckRequest, AiVerdict, DeckSummary};

pub const IMAGES_RULE_ID: &str = "ai-has-images";
pub const BULLETS_RULE_ID: &str = "ai-no-bullets";

pub const DISABLED_REASON: &str =
    "⚠️ AI disabled: no reasoning service configured. Using deterministic analysis.";
pub const UNSTRUCTURED_REASON: &str =
    "Model returned unstructured output; defaulting to pass with caution.";
pub const QUOTA_REASON: &str =
    "⚠️ AI credits exhausted. Check provider billing/limits or use a lower-cost model.";
pub const FAILURE_REASON: &str = "⚠️ AI check failed, defaulting to pass. Please review manually.";

lazy_static! {
    static ref IMAGES_LABEL: Regex = Regex::new(r"(?i)image|diagram|visual").unwrap();
    static ref BULLETS_LABEL: Regex = Regex::new(r"(?i)bullet|list").unwrap();
}

/// Deterministic answer for rules the analysis already settles
pub fn short_circuit(rule_id: &str, rule_label: &str, summary: &DeckSummary) -> Option<AiVerdict> {
    let images = summary.images_approx.unwrap_or(0);
    if (rule_id == IMAGES_RULE_ID || IMAGES_LABEL.is_match(rule_label)) && images >= 1 {
        return Some(AiVerdict::new(
            true,
            vec![format!("✅ Found {} images via analysis", images)],
        ));
    }

    let bullets = summary.bullets_approx.unwrap_or(0);
    if (rule_id == BULLETS_RULE_ID || BULLETS_LABEL.is_match(rule_label)) && bullets == 0 {
        return Some(AiVerdict::new(
            true,
            vec!["✅ No bullet points detected via analysis".to_string()],
        ));
    }

    None
}

pub struct AiEvaluator {
    service: Option<Arc<dyn ReasoningService>>,
    prompts: PromptRenderer,
}

impl AiEvaluator {
    pub fn new(service: Option<Arc<dyn ReasoningService>>) -> Self {
        Self {
            service,
            prompts: PromptRenderer::new(),
        }
    }

    /// Evaluator with no service: every non-short-circuited rule falls back
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    pub async fn evaluate(&self, check: &AiCheck, summary: &DeckSummary) -> AiVerdict {
        self.evaluate_rule(&check.id, &check.label, &check.prompt, summary).await
    }

    pub async fn evaluate_request(&self, request: &AiCheckRequest) -> AiVerdict {
        self.evaluate_rule(
            &request.rule_id,
            &request.rule_label,
            &request.prompt,
            &request.deck_summary,
        )
        .await
    }

    async fn evaluate_rule(
        &self,
        rule_id: &str,
        rule_label: &str,
        prompt: &str,
        summary: &DeckSummary,
    ) -> AiVerdict {
        if let Some(verdict) = short_circuit(rule_id, rule_label, summary) {
            tracing::debug!(rule_id, "AI rule settled by analysis");
            return verdict;
        }

        let Some(service) = &self.service else {
            return AiVerdict::fallback(DISABLED_REASON, None);
        };

        let rendered = match self.prompts.render(rule_label, prompt, summary) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(rule_id, error = %e, "AI prompt rendering failed, failing open");
                return AiVerdict::fallback(FAILURE_REASON, Some(e.to_string()));
            }
        };

        let text = match service.complete(&rendered.system, &rendered.user).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(rule_id, service = service.name(), error = %e, "AI check failed, failing open");
                let reason = if e.is_quota() { QUOTA_REASON } else { FAILURE_REASON };
                return AiVerdict::fallback(reason, Some(e.to_string()));
            }
        };

        match parse_verdict(&text) {
            Some(raw) => AiVerdict::new(raw.pass, normalize_reasons(raw.pass, &raw.reasons)),
            None => {
                tracing::warn!(rule_id, "AI output had no JSON verdict, failing open");
                AiVerdict::fallback(UNSTRUCTURED_REASON, None)
            }
        }
    }
}
