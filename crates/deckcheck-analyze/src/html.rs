//! HTML heuristic analysis for web-hosted decks.
//!
//! Lower fidelity than the PDF path: only tag/attribute counts over the
//! page source. Fields the markup cannot support stay `None`.

use deckcheck_core::{AnalysisMethod, AspectSummary, DeckAnalysis};
use lazy_static::lazy_static;
use regex::Regex;

use crate::aspect::{describe_ratio, page_ratio};

/// Upper bound on reported list items
pub const MAX_HTML_BULLETS: u32 = 500;

lazy_static! {
    static ref IMG_TAG: Regex = Regex::new(r"<img\b").unwrap();
    static ref BACKGROUND_IMAGE: Regex = Regex::new(r"background-image\s*:").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"<li\b").unwrap();
    static ref PARAGRAPH: Regex = Regex::new(r"<p\b").unwrap();
    static ref HEADING: Regex = Regex::new(r"<h[1-6]\b").unwrap();
    static ref SLIDE_CLASS: Regex =
        Regex::new(r#"class=["'][^"']*(slide|page)[^"']*["']"#).unwrap();
    static ref VIDEO: Regex = Regex::new(r"<video\b|youtube\.com|vimeo\.com").unwrap();
    static ref AUDIO: Regex = Regex::new(r"<audio\b").unwrap();
    static ref ASPECT_RATIO: Regex =
        Regex::new(r"aspect-ratio\s*:\s*([0-9.]+)\s*/\s*([0-9.]+)").unwrap();
}

fn count(re: &Regex, text: &str) -> u32 {
    re.find_iter(text).count() as u32
}

/// Analyze page source. Matching is case-insensitive.
pub fn analyze_html(html: &str) -> DeckAnalysis {
    let lower = html.to_lowercase();

    let mut analysis = DeckAnalysis::new(AnalysisMethod::Html);

    analysis.images_approx = Some(count(&IMG_TAG, &lower) + count(&BACKGROUND_IMAGE, &lower));
    analysis.bullets_approx = Some(count(&LIST_ITEM, &lower).min(MAX_HTML_BULLETS));
    analysis.text_ops_approx = Some(count(&PARAGRAPH, &lower) + count(&HEADING, &lower));

    let slide_markers = count(&SLIDE_CLASS, &lower);
    if slide_markers > 0 {
        analysis.page_count = Some(slide_markers);
    }

    analysis.has_video = VIDEO.is_match(&lower).then_some(true);
    analysis.has_audio = AUDIO.is_match(&lower).then_some(true);
    analysis.aspect_summary = declared_aspect(&lower);

    analysis
}

/// First literal `aspect-ratio: W / H` declaration, snapped like page ratios
fn declared_aspect(lower: &str) -> Option<AspectSummary> {
    let caps = ASPECT_RATIO.captures(lower)?;
    let width = leading_float(&caps[1])?;
    let height = leading_float(&caps[2])?;
    if !(width.is_finite() && height.is_finite() && height > 0.0) {
        return None;
    }

    let ratio = page_ratio(&deckcheck_core::PageSize::new(width, height));
    if ratio == 0.0 {
        return None;
    }
    Some(AspectSummary {
        common_ratio: Some(describe_ratio((ratio * 100.0).round() / 100.0)),
        ratios: vec![ratio],
    })
}

/// Parse the longest numeric prefix ("1.5.2" -> 1.5)
fn leading_float(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let html = r#"
            <div class="Slide active"><h1>Title</h1><IMG src="a.png"></div>
            <div class='page'><p>Intro</p><ul><li>a</li><li>b</li></ul></div>
            <section style="background-image: url(bg.jpg)"><h2>x</h2></section>
        "#;
        let analysis = analyze_html(html);

        assert_eq!(analysis.analysis_method, AnalysisMethod::Html);
        assert_eq!(analysis.images_approx, Some(2));
        assert_eq!(analysis.bullets_approx, Some(2));
        assert_eq!(analysis.text_ops_approx, Some(3));
        assert_eq!(analysis.page_count, Some(2));
        assert_eq!(analysis.has_video, None);
        assert_eq!(analysis.has_audio, None);
        assert!(analysis.aspect_summary.is_none());
        assert!(analysis.page_sizes_pt.is_none());
        assert!(analysis.fonts_approx.is_none());
    }

    #[test]
    fn test_no_slide_markers_leaves_page_count_unset() {
        let analysis = analyze_html("<html><body><p>hello</p></body></html>");
        assert_eq!(analysis.page_count, None);
    }

    #[test]
    fn test_media_detection() {
        let analysis = analyze_html(r#"<iframe src="https://www.YouTube.com/embed/x"></iframe><audio src="a.mp3">"#);
        assert_eq!(analysis.has_video, Some(true));
        assert_eq!(analysis.has_audio, Some(true));
    }

    #[test]
    fn test_bullets_capped() {
        let html = "<li>x</li>".repeat(700);
        assert_eq!(analyze_html(&html).bullets_approx, Some(MAX_HTML_BULLETS));
    }

    #[test]
    fn test_declared_aspect_ratio() {
        let analysis = analyze_html(".deck { aspect-ratio: 16 / 9; }");
        let summary = analysis.aspect_summary.unwrap();
        assert_eq!(summary.common_ratio.as_deref(), Some("16:9"));

        let analysis = analyze_html(".deck { aspect-ratio: 4/3 }");
        assert_eq!(analysis.aspect_summary.unwrap().common_ratio.as_deref(), Some("4:3"));

        let analysis = analyze_html(".deck { aspect-ratio: 21 / 9 }");
        assert_eq!(analysis.aspect_summary.unwrap().common_ratio.as_deref(), Some("2.33"));
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("1.5.2"), Some(1.5));
        assert_eq!(leading_float("16"), Some(16.0));
        assert_eq!(leading_float("."), None);
    }
}
