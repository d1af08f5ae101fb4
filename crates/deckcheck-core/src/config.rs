//! Organizer configuration
//!
//! Accepted formats, deterministic thresholds and toggles, and the ordered
//! list of AI checks. Persistence sits behind [`ConfigProvider`] so the
//! evaluators only ever see a plain `Config` value.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::data_model::DeckFormat;
use crate::error::DeckError;

/// A natural-language rule delegated to the reasoning service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiCheck {
    pub id: String,
    pub label: String,
    pub prompt: String,
}

impl AiCheck {
    pub fn new(id: impl Into<String>, label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            prompt: prompt.into(),
        }
    }
}

/// Organizer-owned validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    // === Acceptance ===

    /// Formats a submission may have
    pub accepted_formats: Vec<DeckFormat>,

    // === URL Policies ===

    /// Default for `tryExportToPdf` when a resolve request omits it
    pub url_auto_export_to_pdf: bool,

    /// Pass size/slide/aspect rules for URL decks whose metric is unknown
    pub url_lenient_when_unknown: bool,

    // === Deterministic Rules ===

    pub enforce_size: bool,
    #[serde(rename = "maxSizeMB")]
    pub max_size_mb: f64,

    pub enforce_slide_count: bool,
    pub min_slides: u32,
    pub max_slides: u32,

    pub enforce_aspect: bool,
    #[serde(rename = "require16by9")]
    pub require_16by9: bool,

    pub enforce_video_constraint: bool,
    pub allow_video: bool,

    pub enforce_audio_constraint: bool,
    pub allow_audio: bool,

    // === Admin ===

    /// Number of decks the organizer expects to collect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_decks: Option<u32>,

    // === AI Rules ===

    pub ai_checks: Vec<AiCheck>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accepted_formats: vec![DeckFormat::Pdf, DeckFormat::Pptx, DeckFormat::Keynote],
            url_auto_export_to_pdf: false,
            url_lenient_when_unknown: false,
            enforce_size: true,
            max_size_mb: 100.0,
            enforce_slide_count: true,
            min_slides: 1,
            max_slides: 100,
            enforce_aspect: true,
            require_16by9: true,
            enforce_video_constraint: true,
            allow_video: false,
            enforce_audio_constraint: true,
            allow_audio: false,
            expected_decks: Some(30),
            ai_checks: default_ai_checks(),
        }
    }
}

impl Config {
    /// Parse a YAML (or JSON) document; missing keys fall back to defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, DeckError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String, DeckError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn accepts(&self, format: DeckFormat) -> bool {
        self.accepted_formats.contains(&format)
    }

    /// Reject settings no deck could ever satisfy
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.min_slides > self.max_slides {
            return Err(DeckError::ConfigError(format!(
                "minSlides ({}) exceeds maxSlides ({})",
                self.min_slides, self.max_slides
            )));
        }
        if !(self.max_size_mb.is_finite() && self.max_size_mb >= 0.0) {
            return Err(DeckError::ConfigError(format!(
                "maxSizeMB must be a non-negative number, got {}",
                self.max_size_mb
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for check in &self.ai_checks {
            if !seen.insert(check.id.as_str()) {
                return Err(DeckError::ConfigError(format!("duplicate AI check id '{}'", check.id)));
            }
        }
        Ok(())
    }
}

fn default_ai_checks() -> Vec<AiCheck> {
    vec![
        AiCheck::new(
            "ai-title",
            "Has a proper title slide",
            [
                "Decide if the deck likely has a proper title slide (typically slide 1).",
                "Use ONLY metadata: {pageCount, aspectSummary.commonRatio, imagesApprox, textOpsApprox, bulletsApprox, hasVideo, hasAudio, sourceType, format}.",
                "When uncertain, prefer pass=true with a short caution.",
                "Return JSON {\"pass\": boolean, \"reasons\": string[]} with short reasons.",
            ]
            .join(" "),
        ),
        AiCheck::new(
            "ai-not-all-bullets",
            "Not dominated by complex bullet points",
            [
                "Decide if the deck is NOT dominated by complex bullet points.",
                "Use ONLY metadata: {pageCount, bulletsApprox, imagesApprox, textOpsApprox}.",
                "Lenient thresholds: imagesApprox ≥ 1 => pass=true; else if bulletsApprox/max(pageCount,1) > 5 => fail; otherwise pass.",
                "Return JSON {\"pass\": boolean, \"reasons\": string[]} with short reasons.",
            ]
            .join(" "),
        ),
        AiCheck::new(
            "ai-has-images",
            "Contains images/diagrams",
            [
                "Decide if the deck contains images/diagrams on at least some slides.",
                "Use ONLY metadata: {pageCount, imagesApprox, textOpsApprox}.",
                "Lenient thresholds: imagesApprox ≥ 1 => pass; if imagesApprox = 0 but pageCount ≤ 5 => pass; else fail.",
                "Return JSON {\"pass\": boolean, \"reasons\": string[]} with short reasons.",
            ]
            .join(" "),
        ),
    ]
}

/// Storage seam for the organizer configuration
pub trait ConfigProvider: Send + Sync {
    fn load(&self) -> Result<Config, DeckError>;

    fn save(&self, config: &Config) -> Result<(), DeckError>;
}

/// Process-local configuration, starting from defaults
#[derive(Debug, Default)]
pub struct InMemoryConfigProvider {
    config: RwLock<Config>,
}

impl InMemoryConfigProvider {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    fn load(&self) -> Result<Config, DeckError> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|_| DeckError::ConfigError("config lock poisoned".to_string()))
    }

    fn save(&self, config: &Config) -> Result<(), DeckError> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| DeckError::ConfigError("config lock poisoned".to_string()))?;
        *guard = config.clone();
        Ok(())
    }
}

/// Configuration persisted as a YAML file. A missing file means defaults.
#[derive(Debug, Clone)]
pub struct YamlFileConfigProvider {
    path: PathBuf,
}

impl YamlFileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ConfigProvider for YamlFileConfigProvider {
    fn load(&self) -> Result<Config, DeckError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file missing, using defaults");
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Config::from_yaml(&content)
    }

    fn save(&self, config: &Config) -> Result<(), DeckError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, config.to_yaml()?)?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_size_mb, 100.0);
        assert_eq!((config.min_slides, config.max_slides), (1, 100));
        assert!(config.require_16by9);
        assert!(!config.allow_video);
        assert!(!config.url_lenient_when_unknown);
        assert_eq!(config.ai_checks.len(), 3);
        assert!(config.accepts(DeckFormat::Keynote));
        assert!(!config.accepts(DeckFormat::Canva));
    }

    #[test]
    fn test_partial_yaml_merges_over_defaults() {
        let yaml = r#"
acceptedFormats: [pdf]
maxSizeMB: 25
urlLenientWhenUnknown: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.accepted_formats, vec![DeckFormat::Pdf]);
        assert_eq!(config.max_size_mb, 25.0);
        assert!(config.url_lenient_when_unknown);
        // untouched keys keep their defaults
        assert_eq!(config.max_slides, 100);
        assert_eq!(config.ai_checks.len(), 3);
    }

    #[test]
    fn test_json_is_accepted() {
        let config = Config::from_yaml(r#"{"require16by9": false, "aiChecks": []}"#).unwrap();
        assert!(!config.require_16by9);
        assert!(config.ai_checks.is_empty());
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = Config {
            min_slides: 10,
            max_slides: 5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ai_ids() {
        let mut config = Config::default();
        config.ai_checks.push(AiCheck::new("ai-title", "Again", "..."));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_in_memory_provider_roundtrip() {
        let provider = InMemoryConfigProvider::default();
        let mut config = provider.load().unwrap();
        config.allow_audio = true;
        provider.save(&config).unwrap();

        assert!(provider.load().unwrap().allow_audio);
    }
}
