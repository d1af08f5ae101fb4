//! Validation runner
//!
//! ```text
//! Deck + Config → deterministic batch → AI fan-out → ValidationReport
//!                    (atomic)            (concurrent, config order)
//! ```

use deckcheck_ai::{result_id, to_test_result, AiEvaluator, DeckSummary};
use deckcheck_core::{Config, Deck, RunContext, TestResult, TestType};
use deckcheck_policy::SubmissionVerdict;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub run_id: String,
    pub deck_id: String,
    pub tests: Vec<TestResult>,
    pub passed: usize,
    pub total: usize,
    pub all_passed: bool,

    /// AI checks answered by a fail-open fallback
    #[serde(skip)]
    pub ai_fallbacks: usize,
}

impl ValidationReport {
    fn new(ctx: &RunContext, tests: Vec<TestResult>, ai_fallbacks: usize) -> Self {
        let verdict = SubmissionVerdict::from_results(&tests);
        Self {
            run_id: ctx.run_id.clone(),
            deck_id: ctx.deck_id.clone(),
            tests,
            passed: verdict.passed,
            total: verdict.total,
            all_passed: verdict.can_submit,
            ai_fallbacks,
        }
    }

    /// Submission gate over this run's results
    pub fn verdict(&self) -> SubmissionVerdict {
        SubmissionVerdict::from_results(&self.tests)
    }
}

pub struct ValidationRunner {
    evaluator: Arc<AiEvaluator>,
}

impl ValidationRunner {
    pub fn new(evaluator: Arc<AiEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Results visible while a run is in flight: the deterministic batch
    /// plus one `running` slot per AI check
    pub fn preview(deck: &Deck, config: &Config) -> Vec<TestResult> {
        let mut tests = deckcheck_policy::evaluate(deck, config);
        tests.extend(
            config
                .ai_checks
                .iter()
                .map(|check| TestResult::running(result_id(&check.id), &check.label, TestType::Ai)),
        );
        tests
    }

    /// Run under a fresh run id
    pub async fn run(&self, deck: &Deck, config: &Config) -> ValidationReport {
        let ctx = RunContext::new(&deck.id);
        self.run_in(&ctx, deck, config).await
    }

    /// Run under an id issued by a [`crate::RunRegistry`]
    pub async fn run_in(&self, ctx: &RunContext, deck: &Deck, config: &Config) -> ValidationReport {
        let mut tests = deckcheck_policy::evaluate(deck, config);
        debug!(deck_id = %ctx.deck_id, run_id = %ctx.run_id, results = tests.len(), "deterministic batch done");

        let summary = DeckSummary::from_deck(deck);
        let verdicts = join_all(
            config
                .ai_checks
                .iter()
                .map(|check| self.evaluator.evaluate(check, &summary)),
        )
        .await;

        let mut ai_fallbacks = 0;
        for (check, verdict) in config.ai_checks.iter().zip(verdicts) {
            if verdict.fallback {
                ai_fallbacks += 1;
                warn!(
                    rule_id = %check.id,
                    error = verdict.error.as_deref().unwrap_or("none"),
                    run_id = %ctx.run_id,
                    "ai check answered by fallback"
                );
            }
            tests.push(to_test_result(&check.id, &check.label, &verdict));
        }

        let report = ValidationReport::new(ctx, tests, ai_fallbacks);
        info!(
            deck_id = %report.deck_id,
            run_id = %report.run_id,
            passed = report.passed,
            total = report.total,
            verdict = %report.verdict().summary,
            "validation run finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckcheck_core::TestStatus;

    #[test]
    fn test_report_counts() {
        let ctx = RunContext::new("deck-1");
        let report = ValidationReport::new(
            &ctx,
            vec![
                TestResult::deterministic("det:format", "Format", true, vec![]),
                TestResult::ai("ai:x", "X", false, vec![]),
            ],
            0,
        );
        assert_eq!(report.passed, 1);
        assert_eq!(report.total, 2);
        assert!(!report.all_passed);
        assert_eq!(report.verdict().summary, "Blocked: ai:x");
    }

    #[test]
    fn test_empty_report_is_not_all_passed() {
        let report = ValidationReport::new(&RunContext::new("d"), vec![], 0);
        assert!(!report.all_passed);
    }

    #[test]
    fn test_preview_marks_ai_running() {
        let deck = Deck::from_url("https://example.com/deck");
        let config = Config::default();
        let preview = ValidationRunner::preview(&deck, &config);

        let running: Vec<_> = preview
            .iter()
            .filter(|t| t.status == TestStatus::Running)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(running, vec!["ai:ai-title", "ai:ai-not-all-bullets", "ai:ai-has-images"]);
    }
}
