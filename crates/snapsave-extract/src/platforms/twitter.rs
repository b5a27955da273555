use snapsave_core::{ExtractionResult, SnapError, SnapResult};
use tracing::debug;

use super::{contains_any, scored_links};
use crate::query::{Document, Lookup};
use crate::rank::best;
use crate::text::Boilerplate;

const LINK_MARKERS: &[&str] = &["download", "rapidcdn", "snapsave"];
const HD_ADDRESS_MARKER: &str = "hd";
const FALLBACK_DESCRIPTION: &str = "Twitter/X Post";
const DEFAULT_SCORE: u32 = 500;

const DESCRIPTION: &[Lookup] = &[
    Lookup::Text(".videotikmate-middle > p > span"),
    Lookup::Text(".video-title"),
    Lookup::FirstText("p"),
    Lookup::Text(".desc"),
    Lookup::Text("h3"),
];

const PREVIEW: &[Lookup] = &[
    Lookup::Attr(".videotikmate-left > img", "src"),
    Lookup::Attr("img[src*='pbs.twimg']", "src"),
    Lookup::Attr("img", "src"),
];

const BOILERPLATE: Boilerplate = Boilerplate {
    leading_words: &["Twitter", "X", "Video", "Download", "Share"],
    trailing_patterns: &[],
};

pub fn extract(html: &str) -> SnapResult<ExtractionResult> {
    let doc = Document::parse(html);
    let links = scored_links(&doc, |_, href| contains_any(href, LINK_MARKERS), link_score);
    debug!(candidates = links.len(), "scored twitter download links");

    let media = best(links).ok_or(SnapError::BlankData)?;
    Ok(ExtractionResult {
        description: Some(BOILERPLATE.describe(doc.first_of(DESCRIPTION), FALLBACK_DESCRIPTION)),
        preview: doc.first_of(PREVIEW),
        media: vec![media],
    })
}

/// The downloader only labels 1080, 720 and 480 renditions; anything else
/// is treated as unknown quality.
fn link_score(text: &str, href: &str) -> u32 {
    if text.contains("HD") || text.contains("1080") || href.contains(HD_ADDRESS_MARKER) {
        1080
    } else if text.contains("720") {
        720
    } else if text.contains("480") {
        480
    } else {
        DEFAULT_SCORE
    }
}
