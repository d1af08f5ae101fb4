//! Process settings from environment variables
use deckcheck_ai::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// DECKCHECK_ADDR
    pub addr: String,
    /// DECKCHECK_CONFIG; in-memory defaults when unset
    pub config_path: Option<PathBuf>,
    /// OPENAI_API_KEY; AI rules fall back when unset
    pub openai_api_key: Option<String>,
    /// DECKCHECK_AI_MODEL
    pub ai_model: String,
    /// DECKCHECK_AI_BASE_URL
    pub ai_base_url: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            addr: get("DECKCHECK_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            config_path: get("DECKCHECK_CONFIG").map(PathBuf::from),
            openai_api_key: get("OPENAI_API_KEY"),
            ai_model: get("DECKCHECK_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ai_base_url: get("DECKCHECK_AI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.addr, "0.0.0.0:8787");
        assert_eq!(settings.config_path, None);
        assert_eq!(settings.openai_api_key, None);
        assert_eq!(settings.ai_model, "gpt-4o-mini");
        assert_eq!(settings.ai_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_overrides_and_blank_key() {
        let env: HashMap<&str, &str> = [
            ("DECKCHECK_ADDR", "127.0.0.1:9000"),
            ("DECKCHECK_CONFIG", "/etc/deckcheck.yaml"),
            ("OPENAI_API_KEY", "  "),
            ("DECKCHECK_AI_MODEL", "gpt-4o"),
        ]
        .into_iter()
        .collect();
        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.addr, "127.0.0.1:9000");
        assert_eq!(settings.config_path, Some(PathBuf::from("/etc/deckcheck.yaml")));
        assert_eq!(settings.openai_api_key, None);
        assert_eq!(settings.ai_model, "gpt-4o");
    }
}
