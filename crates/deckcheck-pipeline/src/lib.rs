//! Deckcheck Pipeline: validation runs for one deck
//!
//! A run evaluates the deterministic rules as one batch, then every AI check
//! concurrently against the same metadata summary. Each run carries a run id;
//! the [`RunRegistry`] keeps only the newest run's results for a deck.
//!
//! # Example
//!
//! ```ignore
//! let registry = RunRegistry::new();
//! let runner = ValidationRunner::new(Arc::new(AiEvaluator::disabled()));
//!
//! let ctx = registry.begin(&deck.id);
//! let report = runner.run_in(&ctx, &deck, &config).await;
//! registry.commit(&mut deck, report);
//! ```

pub mod registry;
pub mod runner;

pub use registry::RunRegistry;
pub use runner::{ValidationReport, ValidationRunner};
