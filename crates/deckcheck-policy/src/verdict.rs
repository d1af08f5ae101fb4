//! Aggregate verdict over one run's results
//!
//! A deck may be submitted only when it has results and all of them pass.
//! Pending or running results block submission like failures do.

use deckcheck_core::{TestResult, TestStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionVerdict {
    pub can_submit: bool,
    pub passed: usize,
    pub failed: usize,
    /// Pending or running
    pub outstanding: usize,
    pub total: usize,
    /// Ids of failed rules, in result order
    pub failed_rules: Vec<String>,
    pub summary: String,
}

impl SubmissionVerdict {
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results.iter().filter(|r| r.status == TestStatus::Pass).count();
        let failed_rules: Vec<String> = results
            .iter()
            .filter(|r| r.status == TestStatus::Fail)
            .map(|r| r.id.clone())
            .collect();
        let failed = failed_rules.len();
        let total = results.len();
        let outstanding = total - passed - failed;

        let summary = if total == 0 {
            "No checks have run".to_string()
        } else if failed > 0 {
            format!("Blocked: {}", failed_rules.join(", "))
        } else if outstanding > 0 {
            format!("Waiting on {} check(s)", outstanding)
        } else {
            "All checks passed".to_string()
        };

        Self {
            can_submit: total > 0 && passed == total,
            passed,
            failed,
            outstanding,
            total,
            failed_rules,
            summary,
        }
    }
}
