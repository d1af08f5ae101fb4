//! Run Registry: latest run id per deck
//!
//! A new run for a deck supersedes every earlier one. Results tagged with a
//! superseded run id are dropped instead of written into the deck.

use deckcheck_core::{Deck, RunContext, TestResult};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::runner::ValidationReport;

pub struct RunRegistry {
    latest: RwLock<HashMap<String, String>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(HashMap::new()),
        }
    }

    /// Start a run for `deck_id`, superseding any run in flight
    pub fn begin(&self, deck_id: &str) -> RunContext {
        let ctx = RunContext::new(deck_id);
        match self.latest.write() {
            Ok(mut latest) => {
                if let Some(previous) = latest.insert(deck_id.to_string(), ctx.run_id.clone()) {
                    debug!(deck_id, superseded = %previous, run_id = %ctx.run_id, "run superseded");
                }
            }
            Err(_) => warn!(deck_id, "run registry lock poisoned; run will be treated as stale"),
        }
        ctx
    }

    /// True while `ctx` is the newest run for its deck
    pub fn is_current(&self, ctx: &RunContext) -> bool {
        self.latest
            .read()
            .map(|latest| latest.get(&ctx.deck_id) == Some(&ctx.run_id))
            .unwrap_or(false)
    }

    /// Replace the deck's results with `report`. Refused when the report
    /// belongs to another deck or to a superseded run.
    pub fn commit(&self, deck: &mut Deck, report: ValidationReport) -> bool {
        if !self.accepts(deck, &report.deck_id, &report.run_id) {
            return false;
        }
        deck.replace_tests(report.tests);
        true
    }

    /// Write one in-flight result into its slot. Same staleness rule as
    /// [`RunRegistry::commit`]; other slots are never touched.
    pub fn publish(&self, deck: &mut Deck, ctx: &RunContext, result: TestResult) -> bool {
        if !self.accepts(deck, &ctx.deck_id, &ctx.run_id) {
            return false;
        }
        deck.upsert_test(result);
        true
    }

    /// Forget the deck's entry if `ctx` is still its newest run
    pub fn finish(&self, ctx: &RunContext) {
        if let Ok(mut latest) = self.latest.write() {
            if latest.get(&ctx.deck_id) == Some(&ctx.run_id) {
                latest.remove(&ctx.deck_id);
            }
        }
    }

    fn accepts(&self, deck: &Deck, deck_id: &str, run_id: &str) -> bool {
        if deck.id != deck_id {
            warn!(deck_id = %deck.id, report_deck = deck_id, run_id, "result for another deck discarded");
            return false;
        }
        let current = self
            .latest
            .read()
            .map(|latest| latest.get(deck_id).map(String::as_str) == Some(run_id))
            .unwrap_or(false);
        if !current {
            warn!(deck_id, run_id, "stale run discarded");
        }
        current
    }
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new()
    }
}
