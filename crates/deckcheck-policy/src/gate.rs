//! Deterministic rule gate
//!
//! Evaluates a deck against the organizer configuration. Rules run in a
//! fixed order (format, size, slides, aspect, video, audio); format always
//! runs, the others only when their toggle is on. Every result carries a
//! detail line with the detected value, pass or fail.

use deckcheck_core::{Config, Deck, TestResult};

pub const FORMAT_RULE: &str = "det:format";
pub const SIZE_RULE: &str = "det:size";
pub const SLIDES_RULE: &str = "det:slides";
pub const ASPECT_RULE: &str = "det:aspect";
pub const VIDEO_RULE: &str = "det:video";
pub const AUDIO_RULE: &str = "det:audio";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Megabytes rounded to one decimal
pub fn size_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 10.0).round() / 10.0
}

/// Gate over a borrowed configuration
pub struct DeterministicGate<'a> {
    config: &'a Config,
}

impl<'a> DeterministicGate<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Evaluate every enabled rule. Pure: no I/O, no clock.
    pub fn evaluate(&self, deck: &Deck) -> Vec<TestResult> {
        let mut results = vec![self.check_format(deck)];

        // === Size ===
        if self.config.enforce_size {
            results.push(self.check_size(deck));
        }

        // === Slide Count ===
        if self.config.enforce_slide_count {
            results.push(self.check_slides(deck));
        }

        // === Aspect ===
        if self.config.enforce_aspect {
            results.push(self.check_aspect(deck));
        }

        // === Media ===
        if self.config.enforce_video_constraint {
            let detected = deck.analysis.as_ref().and_then(|a| a.has_video).unwrap_or(false);
            results.push(media_rule(VIDEO_RULE, "video", self.config.allow_video, detected));
        }
        if self.config.enforce_audio_constraint {
            let detected = deck.analysis.as_ref().and_then(|a| a.has_audio).unwrap_or(false);
            results.push(media_rule(AUDIO_RULE, "audio", self.config.allow_audio, detected));
        }

        tracing::debug!(
            deck_id = %deck.id,
            rules = results.len(),
            failed = results.iter().filter(|r| !r.passed()).count(),
            "deterministic rules evaluated"
        );

        results
    }

    fn check_format(&self, deck: &Deck) -> TestResult {
        let accepted = self.config.accepts(deck.format);
        let mut details = vec![format!("Detected: {}", deck.format.label())];
        if !accepted {
            let formats: Vec<String> = self.config.accepted_formats.iter().map(|f| f.label()).collect();
            details.push(format!("Accepted: {}", formats.join(", ")));
        }

        TestResult::deterministic(
            FORMAT_RULE,
            format!("Format is accepted ({})", deck.format.label()),
            accepted,
            details,
        )
    }

    /// True when an unknown metric on this deck passes by policy
    fn lenient(&self, deck: &Deck) -> bool {
        deck.is_url() && self.config.url_lenient_when_unknown
    }

    fn check_size(&self, deck: &Deck) -> TestResult {
        let label = format!("File size under {} MB", self.config.max_size_mb);

        match deck.size_bytes() {
            Some(bytes) => {
                let mb = size_mb(bytes);
                TestResult::deterministic(
                    SIZE_RULE,
                    label,
                    mb <= self.config.max_size_mb,
                    vec![format!("Detected: {} MB", mb)],
                )
            }
            None => {
                let detail = if !deck.is_url() {
                    "Size unavailable.".to_string()
                } else if self.config.url_lenient_when_unknown {
                    "Size unknown for URL. Passing by policy.".to_string()
                } else {
                    "Size unknown for URL. Upload a file for full checks.".to_string()
                };
                TestResult::deterministic(SIZE_RULE, label, self.lenient(deck), vec![detail])
            }
        }
    }

    fn check_slides(&self, deck: &Deck) -> TestResult {
        let (min, max) = (self.config.min_slides, self.config.max_slides);
        let label = format!("Slide count between {}-{}", min, max);

        match deck.analysis.as_ref().and_then(|a| a.page_count) {
            Some(count) => TestResult::deterministic(
                SLIDES_RULE,
                label,
                (min..=max).contains(&count),
                vec![format!("Detected: {}", count)],
            ),
            None => {
                let detail = if !deck.is_url() {
                    "Slide count unavailable.".to_string()
                } else if self.config.url_lenient_when_unknown {
                    "Slide count unknown for URL. Passing by policy.".to_string()
                } else {
                    "Slide count unknown for URL. Provide a PDF for full checks.".to_string()
                };
                TestResult::deterministic(SLIDES_RULE, label, self.lenient(deck), vec![detail])
            }
        }
    }

    fn check_aspect(&self, deck: &Deck) -> TestResult {
        let label = if self.config.require_16by9 {
            "Slides are 16:9"
        } else {
            "Aspect requirement"
        };

        match deck.analysis.as_ref().and_then(|a| a.common_ratio()) {
            Some(ratio) => {
                let pass = !self.config.require_16by9 || ratio == "16:9";
                TestResult::deterministic(ASPECT_RULE, label, pass, vec![format!("Detected: {}", ratio)])
            }
            // an unknown ratio fails even without the 16:9 requirement
            None if self.lenient(deck) => TestResult::deterministic(
                ASPECT_RULE,
                label,
                true,
                vec!["Detected: unknown (passing by policy)".to_string()],
            ),
            None => TestResult::deterministic(ASPECT_RULE, label, false, vec!["Detected: unknown".to_string()]),
        }
    }
}

/// Allowed media always passes; otherwise absent or false passes
fn media_rule(id: &str, kind: &str, allowed: bool, detected: bool) -> TestResult {
    let label = if allowed {
        format!("{}{} allowed", kind[..1].to_uppercase(), &kind[1..])
    } else {
        format!("No embedded {}", kind)
    };
    let detail = if detected {
        format!("Detected: {} present", kind)
    } else {
        format!("Detected: no {}", kind)
    };

    TestResult::deterministic(id, label, allowed || !detected, vec![detail])
}
