//! Deckcheck AI: natural-language deck rules
//!
//! A rule is decided locally when the analysis already settles it, and
//! otherwise delegated to a [`ReasoningService`] with a metadata-only
//! summary. Every degraded path fails open.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use deckcheck_ai::{AiEvaluator, DeckSummary, OpenAiReasoner};
//!
//! let service = OpenAiReasoner::new(std::env::var("OPENAI_API_KEY")?, "gpt-4o-mini");
//! let evaluator = AiEvaluator::new(Some(Arc::new(service)));
//!
//! let verdict = evaluator.evaluate(&check, &DeckSummary::from_deck(&deck)).await;
//! println!("{} {:?}", verdict.pass, verdict.reasons);
//! ```

pub mod evaluator;
pub mod openai;
pub mod parser;
pub mod prompts;
pub mod service;
pub mod summary;

pub use evaluator::{short_circuit, AiEvaluator};
pub use openai::OpenAiReasoner;
pub use parser::{normalize_reasons, parse_verdict};
pub use prompts::{PromptRenderer, RulePrompt};
pub use service::{ReasoningError, ReasoningService};
pub use summary::{AiCheckRequest, AiVerdict, AspectInfo, DeckSummary};

use deckcheck_core::TestResult;

/// Result slot id for an AI check
pub fn result_id(check_id: &str) -> String {
    format!("ai:{}", check_id)
}

/// Convert a verdict into the rule's result slot
pub fn to_test_result(check_id: &str, label: &str, verdict: &AiVerdict) -> TestResult {
    TestResult::ai(result_id(check_id), label, verdict.pass, verdict.reasons.clone())
}
