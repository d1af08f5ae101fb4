//! Run Context: identity of one validation run
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags every result produced by a run so stale results can be discarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    pub run_id: String,
    pub deck_id: String,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(deck_id: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            deck_id: deck_id.into(),
            started_at: Utc::now(),
        }
    }
}
