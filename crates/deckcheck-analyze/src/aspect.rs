//! Aspect-ratio summary shared by the PDF and HTML analyzers.

use deckcheck_core::{AspectSummary, PageSize};

/// Maximum distance from a named ratio that still snaps to it
pub const SNAP_TOLERANCE: f64 = 0.08;

/// Named ratios in tie-break order
const NAMED_RATIOS: [(&str, f64); 4] = [
    ("16:9", 16.0 / 9.0),
    ("4:3", 4.0 / 3.0),
    ("3:2", 3.0 / 2.0),
    ("1:1", 1.0),
];

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Width/height at 3 decimals; degenerate pages become 0
pub fn page_ratio(size: &PageSize) -> f64 {
    let ratio = size.width / size.height;
    if ratio.is_finite() {
        round_to(ratio, 3)
    } else {
        0.0
    }
}

/// Closest named ratio within [`SNAP_TOLERANCE`], if any
pub fn snap_ratio(ratio: f64) -> Option<&'static str> {
    let mut best: Option<(&'static str, f64)> = None;
    for (name, value) in NAMED_RATIOS {
        let delta = (ratio - value).abs();
        if best.map_or(true, |(_, d)| delta < d) {
            best = Some((name, delta));
        }
    }
    best.filter(|(_, delta)| *delta < SNAP_TOLERANCE)
        .map(|(name, _)| name)
}

/// Named ratio, or the raw ratio as a string ("0.71", "2")
pub fn describe_ratio(ratio: f64) -> String {
    match snap_ratio(ratio) {
        Some(name) => name.to_string(),
        None => format!("{}", ratio),
    }
}

/// Most frequent ratio rounded to 2 decimals; ties go to the first seen
fn modal_ratio(ratios: &[f64]) -> Option<f64> {
    let mut freq: Vec<(f64, usize)> = Vec::new();
    for r in ratios.iter().map(|r| round_to(*r, 2)) {
        match freq.iter_mut().find(|(value, _)| *value == r) {
            Some((_, count)) => *count += 1,
            None => freq.push((r, 1)),
        }
    }

    let mut best: Option<(f64, usize)> = None;
    for (value, count) in freq {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Summarize page sizes into the modal, snapped aspect ratio
pub fn summarize_aspect(sizes: &[PageSize]) -> AspectSummary {
    if sizes.is_empty() {
        return AspectSummary::empty();
    }

    let ratios: Vec<f64> = sizes.iter().map(page_ratio).collect();
    // a zero mode (all degenerate pages) reports no ratio
    let common_ratio = modal_ratio(&ratios)
        .filter(|mode| *mode != 0.0)
        .map(describe_ratio);

    AspectSummary {
        common_ratio,
        ratios,
    }
}
