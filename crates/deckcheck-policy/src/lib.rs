//! Deckcheck Policy: deterministic rules and submission verdict
//!
//! # Example
//!
//! ```
//! use deckcheck_core::{Config, Deck};
//! use deckcheck_policy::{evaluate, SubmissionVerdict};
//!
//! let deck = Deck::from_file("talk.pptx", "", vec![0u8; 1024]);
//! let results = evaluate(&deck, &Config::default());
//!
//! // no analysis for a PPTX upload, so the slide-count rule fails
//! let verdict = SubmissionVerdict::from_results(&results);
//! assert!(!verdict.can_submit);
//! ```

pub mod gate;
pub mod verdict;

pub use gate::{
    size_mb, DeterministicGate, ASPECT_RULE, AUDIO_RULE, FORMAT_RULE, SIZE_RULE, SLIDES_RULE,
    VIDEO_RULE,
};
pub use verdict::SubmissionVerdict;

use deckcheck_core::{Config, Deck, TestResult};

/// Evaluate every enabled deterministic rule for `deck`
pub fn evaluate(deck: &Deck, config: &Config) -> Vec<TestResult> {
    DeterministicGate::new(config).evaluate(deck)
}
