//! Integration tests for file-backed configuration.

use deckcheck_core::{Config, ConfigProvider, DeckFormat, YamlFileConfigProvider};

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let provider = YamlFileConfigProvider::new(dir.path().join("absent.yaml"));

    let config = provider.load().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let provider = YamlFileConfigProvider::new(dir.path().join("nested").join("deckcheck.yaml"));

    let config = Config {
        accepted_formats: vec![DeckFormat::Pdf, DeckFormat::GoogleSlides],
        max_slides: 40,
        url_lenient_when_unknown: true,
        ..Config::default()
    };
    provider.save(&config).unwrap();

    let loaded = provider.load().unwrap();
    assert_eq!(loaded, config);

    let raw = std::fs::read_to_string(provider.path()).unwrap();
    assert!(raw.contains("maxSlides: 40"));
    assert!(raw.contains("google-slides"));
}

#[test]
fn test_save_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let provider = YamlFileConfigProvider::new(dir.path().join("deckcheck.yaml"));

    let config = Config {
        min_slides: 50,
        max_slides: 10,
        ..Config::default()
    };
    assert!(provider.save(&config).is_err());
    assert!(!provider.path().exists());
}
