//! Byte-level heuristics over a raw document.
//!
//! These scans treat every byte as one character (`regex::bytes` with
//! Unicode disabled), so match offsets are byte offsets into the file.
//! They never decompress or interpret content streams: counts are cheap,
//! deterministic approximations, not parsed facts. Only page count and
//! page sizes come from structural parsing (see [`crate::pdf`]).

use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::collections::HashSet;

/// Maximum number of distinct font names reported
pub const MAX_FONTS: usize = 25;

/// Image objects smaller than this on either side are treated as icons/bullets
pub const MIN_IMAGE_SIDE: u64 = 32;

/// Image objects this large on either side are treated as degenerate
pub const MAX_IMAGE_SIDE: u64 = 5000;

/// Share of bare image-subtype markers assumed to be content images when no
/// image object declares its size. Calibration constant, not a derived law.
pub const IMAGE_FALLBACK_RATIO: f64 = 0.3;

/// Bullets a single slide is expected to hold at most
pub const MAX_BULLETS_PER_PAGE: u32 = 15;

/// Floor of the bullet clamp for short decks
pub const MIN_BULLET_CLAMP: u32 = 50;

/// Soft compression applied when the bullet count exceeds the clamp.
/// Kept as observed in production; it has no further rationale.
pub const BULLET_SOFT_CLAMP_FACTOR: f64 = 0.8;

lazy_static! {
    static ref BASE_FONT: Regex =
        Regex::new(r"(?-u)/BaseFont[\t\n\x0B\x0C\r \xA0]*/([A-Za-z0-9\-+_,.]+)").unwrap();
    static ref FONT_NAME: Regex =
        Regex::new(r"(?-u)/FontName[\t\n\x0B\x0C\r \xA0]*/([A-Za-z0-9\-+_,.]+)").unwrap();

    static ref VIDEO_MARKER: Regex = Regex::new(r"(?i-u)/RichMedia|/Movie").unwrap();
    static ref AUDIO_MARKER: Regex = Regex::new(r"(?i-u)/Sound").unwrap();

    /// Image object carrying explicit dimensions on one line
    static ref SIZED_IMAGE: Regex = Regex::new(
        r"(?-u)/Subtype[\t\n\x0B\x0C\r \xA0]*/Image[^\r\n]*?/Width[\t\n\x0B\x0C\r \xA0]+(\d+)[^\r\n]*?/Height[\t\n\x0B\x0C\r \xA0]+(\d+)"
    ).unwrap();
    static ref IMAGE_SUBTYPE: Regex =
        Regex::new(r"(?-u)/Subtype[\t\n\x0B\x0C\r \xA0]*/Image\b").unwrap();

    /// Begin-text operator
    static ref BEGIN_TEXT: Regex =
        Regex::new(r"(?-u)[\t\n\x0B\x0C\r \xA0(]BT[\t\n\x0B\x0C\r \xA0]").unwrap();

    /// Bullet-like patterns; their counts are summed. Line starts follow
    /// both `\n` and a bare `\r`.
    static ref BULLET_PATTERNS: Vec<Regex> = vec![
        // U+2022 BULLET, U+2023 TRIANGULAR BULLET, U+25E6 WHITE BULLET, U+2043 HYPHEN BULLET,
        // and the WinAnsi bullet byte 0x95
        Regex::new(r"(?-u)\xE2\x80\xA2|\xE2\x80\xA3|\xE2\x97\xA6|\xE2\x81\x83|\x95").unwrap(),
        // dash/asterisk/plus at line start
        Regex::new(r"(?mR-u)^[\t\n\x0B\x0C\r \xA0]*[\-*+][\t\n\x0B\x0C\r \xA0]").unwrap(),
        // numbered items
        Regex::new(r"(?mR-u)^[\t\n\x0B\x0C\r \xA0]*[0-9]+[.)\t\n\x0B\x0C\r \xA0]").unwrap(),
        // lettered items
        Regex::new(r"(?mR-u)^[\t\n\x0B\x0C\r \xA0]*[a-zA-Z][.)\t\n\x0B\x0C\r \xA0]").unwrap(),
    ];
}

/// Up to [`MAX_FONTS`] distinct embedded font names, in discovery order
/// (all `/BaseFont` names first, then `/FontName` names).
pub fn extract_font_names(bytes: &[u8]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut fonts = Vec::new();

    for re in [&*BASE_FONT, &*FONT_NAME] {
        for caps in re.captures_iter(bytes) {
            let name = String::from_utf8_lossy(&caps[1]).into_owned();
            if seen.insert(name.clone()) {
                fonts.push(name);
            }
        }
    }

    fonts.truncate(MAX_FONTS);
    fonts
}

/// Media flags. `None` means "not detected", never "checked and absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaFlags {
    pub has_video: Option<bool>,
    pub has_audio: Option<bool>,
}

pub fn detect_media(bytes: &[u8]) -> MediaFlags {
    MediaFlags {
        has_video: VIDEO_MARKER.is_match(bytes).then_some(true),
        has_audio: AUDIO_MARKER.is_match(bytes).then_some(true),
    }
}

fn within_image_bounds(side: u64) -> bool {
    (MIN_IMAGE_SIDE..MAX_IMAGE_SIDE).contains(&side)
}

/// Approximate number of content images.
///
/// Counts sized image objects whose sides both fall in
/// `[MIN_IMAGE_SIDE, MAX_IMAGE_SIDE)`, deduplicated by
/// `(width, height, byte offset)`. When none survive, falls back to
/// `floor(subtype markers * IMAGE_FALLBACK_RATIO)`.
pub fn count_images(bytes: &[u8]) -> u32 {
    let mut objects: HashSet<(u64, u64, usize)> = HashSet::new();

    for caps in SIZED_IMAGE.captures_iter(bytes) {
        let (Some(width), Some(height)) = (parse_dimension(&caps[1]), parse_dimension(&caps[2])) else {
            continue;
        };
        if within_image_bounds(width) && within_image_bounds(height) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            objects.insert((width, height, offset));
        }
    }

    if !objects.is_empty() {
        return objects.len() as u32;
    }

    let markers = IMAGE_SUBTYPE.find_iter(bytes).count();
    (markers as f64 * IMAGE_FALLBACK_RATIO).floor() as u32
}

fn parse_dimension(digits: &[u8]) -> Option<u64> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Number of begin-text blocks
pub fn count_text_ops(bytes: &[u8]) -> u32 {
    BEGIN_TEXT.find_iter(bytes).count() as u32
}

/// Raw bullet-like matches before clamping
pub fn count_bullet_markers(bytes: &[u8]) -> u32 {
    BULLET_PATTERNS
        .iter()
        .map(|re| re.find_iter(bytes).count() as u32)
        .sum()
}

/// Upper bound for a deck of `page_count` pages
pub fn bullet_clamp(page_count: u32) -> u32 {
    (MAX_BULLETS_PER_PAGE * page_count).max(MIN_BULLET_CLAMP)
}

/// Soft clamp: a count above the bound is replaced with
/// `round(clamp * BULLET_SOFT_CLAMP_FACTOR)`, keeping "dense" visible
/// without reporting extreme values.
pub fn clamp_bullets(raw: u32, page_count: u32) -> u32 {
    let clamp = bullet_clamp(page_count);
    if raw > clamp {
        (clamp as f64 * BULLET_SOFT_CLAMP_FACTOR).round() as u32
    } else {
        raw
    }
}

pub fn count_bullets(bytes: &[u8], page_count: u32) -> u32 {
    clamp_bullets(count_bullet_markers(bytes), page_count)
}
