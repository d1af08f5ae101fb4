//! Deterministic rule behavior end to end

use deckcheck_core::{
    AnalysisMethod, AspectSummary, Config, Deck, DeckAnalysis, DeckFormat, TestStatus,
};
use deckcheck_policy::{evaluate, SubmissionVerdict, ASPECT_RULE, FORMAT_RULE, SIZE_RULE, SLIDES_RULE};

fn analysis(pages: u32, ratio: &str) -> DeckAnalysis {
    let mut analysis = DeckAnalysis::new(AnalysisMethod::Pdf);
    analysis.page_count = Some(pages);
    analysis.aspect_summary = Some(AspectSummary {
        common_ratio: Some(ratio.to_string()),
        ratios: vec![],
    });
    analysis.has_video = Some(false);
    analysis.has_audio = Some(false);
    analysis
}

#[test]
fn test_default_config_passes_conforming_pdf() {
    let deck = Deck::from_file("keynote.pdf", "application/pdf", vec![0u8; 5 * 1024 * 1024])
        .with_analysis(analysis(10, "16:9"));

    let results = evaluate(&deck, &Config::default());

    assert_eq!(results.len(), 6);
    for result in &results {
        assert_eq!(result.status, TestStatus::Pass, "{} failed: {:?}", result.id, result.details);
        assert!(!result.details.is_empty(), "{} has no detail line", result.id);
    }
    assert!(SubmissionVerdict::from_results(&results).can_submit);
}

#[test]
fn test_rejected_format_lists_accepted() {
    let config = Config {
        accepted_formats: vec![DeckFormat::Pdf],
        ..Config::default()
    };
    let deck = Deck::from_file("talk.pptx", "", vec![0u8; 100]);
    assert_eq!(deck.format, DeckFormat::Pptx);

    let results = evaluate(&deck, &config);
    let format = results.iter().find(|r| r.id == FORMAT_RULE).unwrap();

    assert_eq!(format.status, TestStatus::Fail);
    assert!(format.details.contains(&"Accepted: PDF".to_string()));
}

#[test]
fn test_lenient_url_passes_unknown_metrics() {
    let config = Config {
        url_lenient_when_unknown: true,
        ..Config::default()
    };
    let deck = Deck::from_url("https://pitch.com/v/my-talk");
    assert!(deck.file_info.is_none());

    let results = evaluate(&deck, &config);

    for id in [SIZE_RULE, SLIDES_RULE] {
        let result = results.iter().find(|r| r.id == id).unwrap();
        assert_eq!(result.status, TestStatus::Pass);
        assert!(result.details[0].contains("Passing by policy"), "{:?}", result.details);
    }
    let aspect = results.iter().find(|r| r.id == ASPECT_RULE).unwrap();
    assert_eq!(aspect.status, TestStatus::Pass);
    assert_eq!(aspect.details, vec!["Detected: unknown (passing by policy)".to_string()]);
}

#[test]
fn test_strict_url_fails_unknown_metrics() {
    let deck = Deck::from_url("https://pitch.com/v/my-talk");
    let results = evaluate(&deck, &Config::default());

    let size = results.iter().find(|r| r.id == SIZE_RULE).unwrap();
    assert_eq!(size.status, TestStatus::Fail);
    assert_eq!(size.details, vec!["Size unknown for URL. Upload a file for full checks.".to_string()]);

    let slides = results.iter().find(|r| r.id == SLIDES_RULE).unwrap();
    assert_eq!(slides.status, TestStatus::Fail);
    assert_eq!(
        slides.details,
        vec!["Slide count unknown for URL. Provide a PDF for full checks.".to_string()]
    );
}

#[test]
fn test_lenience_never_applies_to_uploads() {
    let config = Config {
        url_lenient_when_unknown: true,
        ..Config::default()
    };
    let deck = Deck::from_file("talk.key", "", vec![0u8; 10]);
    let results = evaluate(&deck, &config);

    let slides = results.iter().find(|r| r.id == SLIDES_RULE).unwrap();
    assert_eq!(slides.status, TestStatus::Fail);
    assert_eq!(slides.details, vec!["Slide count unavailable.".to_string()]);
}

#[test]
fn test_non_widescreen_fails_16by9() {
    let deck = Deck::from_file("talk.pdf", "application/pdf", vec![0u8; 10]).with_analysis(analysis(8, "4:3"));
    let results = evaluate(&deck, &Config::default());

    let aspect = results.iter().find(|r| r.id == ASPECT_RULE).unwrap();
    assert_eq!(aspect.status, TestStatus::Fail);
    assert_eq!(aspect.label, "Slides are 16:9");
    assert_eq!(aspect.details, vec!["Detected: 4:3".to_string()]);
}

#[test]
fn test_evaluation_is_pure() {
    let deck = Deck::from_file("talk.pdf", "application/pdf", vec![0u8; 10]).with_analysis(analysis(8, "16:9"));
    let config = Config::default();

    assert_eq!(evaluate(&deck, &config), evaluate(&deck, &config));
}
