//! PDF analysis: structural page facts plus byte-level approximations.
//!
//! Page count and page sizes require real document structure and come from
//! walking the page tree. Everything else comes from [`crate::heuristics`].

use deckcheck_core::{AnalysisMethod, DeckAnalysis, PageSize};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::aspect::summarize_aspect;
use crate::heuristics;
use crate::AnalyzeError;

/// US Letter, used when neither a page nor its ancestors declare a MediaBox
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize {
    width: 612.0,
    height: 792.0,
};

/// Inherited attributes are looked up at most this many levels up
const MAX_TREE_DEPTH: usize = 32;

/// Analyze raw PDF bytes.
///
/// Fails with [`AnalyzeError::Parse`] when the bytes are not a parseable
/// document; never returns a zeroed analysis for garbage input.
pub fn analyze_pdf(bytes: &[u8]) -> Result<DeckAnalysis, AnalyzeError> {
    let document = Document::load_mem(bytes).map_err(|e| AnalyzeError::Parse(e.to_string()))?;

    let page_sizes = page_sizes(&document)?;
    let page_count = page_sizes.len() as u32;

    let media = heuristics::detect_media(bytes);

    let mut analysis = DeckAnalysis::new(AnalysisMethod::Pdf);
    analysis.page_count = Some(page_count);
    analysis.aspect_summary = Some(summarize_aspect(&page_sizes));
    analysis.page_sizes_pt = Some(page_sizes);
    analysis.fonts_approx = Some(heuristics::extract_font_names(bytes));
    analysis.has_video = media.has_video;
    analysis.has_audio = media.has_audio;
    analysis.text_ops_approx = Some(heuristics::count_text_ops(bytes));
    analysis.images_approx = Some(heuristics::count_images(bytes));
    analysis.bullets_approx = Some(heuristics::count_bullets(bytes, page_count));

    tracing::debug!(
        pages = page_count,
        images = ?analysis.images_approx,
        bullets = ?analysis.bullets_approx,
        "pdf analyzed"
    );

    Ok(analysis)
}

/// Per-page sizes in page order
pub fn page_sizes(document: &Document) -> Result<Vec<PageSize>, AnalyzeError> {
    document
        .get_pages()
        .into_values()
        .map(|page_id| page_size(document, page_id))
        .collect()
}

fn page_size(document: &Document, page_id: ObjectId) -> Result<PageSize, AnalyzeError> {
    let page = document
        .get_dictionary(page_id)
        .map_err(|e| AnalyzeError::Structure(format!("page {:?}: {}", page_id, e)))?;

    Ok(inherited_media_box(document, page)
        .and_then(|rect| rect_size(document, rect))
        .unwrap_or(DEFAULT_PAGE_SIZE))
}

/// MediaBox of the page or the nearest ancestor declaring one
fn inherited_media_box<'a>(document: &'a Document, page: &'a Dictionary) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(media_box) = node.get(b"MediaBox") {
            return Some(media_box);
        }
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = document.get_dictionary(parent_id).ok()?;
    }
    None
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(document: &Document, object: &Object) -> Option<f64> {
    match resolve(document, object)? {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn rect_size(document: &Document, rect: &Object) -> Option<PageSize> {
    let values = resolve(document, rect)?.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let coords: Vec<f64> = values
        .iter()
        .map(|v| number(document, v))
        .collect::<Option<_>>()?;

    Some(PageSize::new(
        (coords[2] - coords[0]).abs(),
        (coords[3] - coords[1]).abs(),
    ))
}
