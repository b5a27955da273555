//! Facebook and Instagram results from snapsave.app. The proxy has rendered
//! its results as a resolution table, as cards, as a bare link, or as a list
//! of `download-items`, depending on the post and on the week.

use regex::Regex;
use snapsave_core::{
    ExtractionResult, MediaCandidate, MediaKind, SnapError, SnapResult, collapse_download_flag,
};
use tracing::debug;

use super::first_link_matching;
use crate::query::{Document, Lookup, Node};
use crate::rank::{Scored, rank, resolution_score, tier_score};
use crate::text::Boilerplate;

pub const SNAPSAVE_ORIGIN: &str = "https://snapsave.app";
pub const THUMBNAIL_PROXY_PREFIX: &str = "https://snapinsta.app/photo.php?photo=";

const PROGRESS_API_MARKER: &str = r"(?i)get_progressApi";
const PROGRESS_API_CALL: &str = r"get_progressApi\('(.*?)'\)";
const FALLBACK_LINK_MARKERS: &[&str] = &["download", "snapsave", "rapidcdn"];
const FALLBACK_DESCRIPTION: &str = "Facebook Video";

const TABLE: &str = "table.table";
const FIGURE: &str = "article.media > figure";
const CARD: &str = "div.card";
const DOWNLOAD_ITEMS: &str = "div.download-items";

const DESCRIPTION: &[Lookup] = &[
    Lookup::Text("span.video-des"),
    Lookup::Text(".video-title"),
    Lookup::FirstText("h1"),
    Lookup::FirstText("h2"),
    Lookup::FirstText("h3"),
    Lookup::Text(".title"),
    Lookup::Text(".desc"),
    Lookup::Text(".video-description"),
    Lookup::FirstText("p"),
    Lookup::Attr("meta[property='og:title']", "content"),
    Lookup::Text("title"),
];

const PREVIEW: &[Lookup] = &[
    Lookup::Attr("article.media > figure img", "src"),
    Lookup::Attr("img[src*='fbcdn']", "src"),
    Lookup::Attr(".video-preview img", "src"),
    Lookup::Attr("img", "src"),
];

const BOILERPLATE: Boilerplate = Boilerplate {
    leading_words: &["Facebook", "Video", "Watch", "Share", "Download"],
    trailing_patterns: &[r"\|\s*Facebook$", r"on Facebook$"],
};

pub fn extract(html: &str) -> SnapResult<ExtractionResult> {
    let doc = Document::parse(html);

    let result = if doc.exists(TABLE) || doc.exists(FIGURE) {
        let media = if doc.exists(TABLE) {
            debug!("extracting from resolution table");
            table_media(&doc)
        } else if doc.exists(CARD) {
            debug!("extracting from cards");
            card_media(&doc)
        } else {
            debug!("extracting single link");
            single_link_media(&doc).into_iter().collect()
        };
        ExtractionResult {
            description: Some(BOILERPLATE.describe(doc.first_of(DESCRIPTION), FALLBACK_DESCRIPTION)),
            preview: doc.first_of(PREVIEW),
            media,
        }
    } else if doc.exists(DOWNLOAD_ITEMS) {
        debug!("extracting download items");
        ExtractionResult {
            media: download_items_media(&doc),
            ..ExtractionResult::default()
        }
    } else {
        ExtractionResult::default()
    };

    if result.media.is_empty() {
        return Err(SnapError::BlankData);
    }
    Ok(result)
}

fn table_media(doc: &Document) -> Vec<MediaCandidate> {
    let scored = doc
        .select("tbody > tr")
        .into_iter()
        .filter_map(|row| table_row(&row))
        .collect();
    rank(scored)
}

fn table_row(row: &Node<'_>) -> Option<Scored> {
    let cells = row.find("td");
    let resolution = cells.first().map(|cell| cell.text()).unwrap_or_default();
    let action = cells.get(2)?;
    let address = action
        .find_attr("a", "href")
        .filter(|href| !href.is_empty())
        .or_else(|| action.find_attr("button", "onclick"))
        .filter(|address| !address.is_empty())?;

    let should_render = is_progress_call(address);
    let address = if should_render {
        progress_address(address)
    } else {
        address.to_string()
    };

    let kind = if resolution.is_empty() {
        MediaKind::Image
    } else {
        MediaKind::Video
    };
    let score = resolution_score(&resolution);
    let mut candidate = MediaCandidate::new(collapse_download_flag(&address), kind);
    candidate.should_render = should_render.then_some(true);
    candidate.resolution = Some(resolution).filter(|resolution| !resolution.is_empty());
    Some(Scored::new(candidate, score))
}

fn is_progress_call(address: &str) -> bool {
    Regex::new(PROGRESS_API_MARKER)
        .map(|regex| regex.is_match(address))
        .unwrap_or(false)
}

/// Turns `get_progressApi('/render?x')` into an absolute snapsave address.
/// Without a capture the address is kept as it was.
pub fn progress_address(address: &str) -> String {
    Regex::new(PROGRESS_API_CALL)
        .ok()
        .and_then(|regex| regex.captures(address))
        .and_then(|captures| captures.get(1))
        .map(|path| format!("{SNAPSAVE_ORIGIN}{}", path.as_str()))
        .unwrap_or_else(|| address.to_string())
}

fn card_media(doc: &Document) -> Vec<MediaCandidate> {
    let scored = doc
        .select(CARD)
        .into_iter()
        .filter_map(|card| {
            let href = card
                .find_attr("div.card-body a", "href")
                .filter(|href| !href.is_empty())?;
            let label = card.find_text("div.card-body a");
            let candidate = MediaCandidate::new(
                collapse_download_flag(href),
                MediaKind::from_strict_label(&label),
            );
            Some(Scored::new(candidate, tier_score(&label, 1000, 360)))
        })
        .collect();
    rank(scored)
}

fn single_link_media(doc: &Document) -> Option<MediaCandidate> {
    let address = doc
        .attr("a[href*='download']", "href")
        .or_else(|| doc.attr("a", "href"))
        .or_else(|| doc.attr("button", "onclick"))
        .or_else(|| first_link_matching(doc, FALLBACK_LINK_MARKERS))?;
    let label = doc
        .text("a")
        .or_else(|| doc.text("button"))
        .unwrap_or_default();
    Some(MediaCandidate::new(
        collapse_download_flag(&address),
        MediaKind::from_label(&label),
    ))
}

fn download_items_media(doc: &Document) -> Vec<MediaCandidate> {
    let scored = doc
        .select(DOWNLOAD_ITEMS)
        .into_iter()
        .filter_map(|item| {
            let button = item.find_first("div.download-items__btn")?;
            let href = button.find_attr("a", "href").filter(|href| !href.is_empty())?;
            let label = button.find_text("span");
            let kind = MediaKind::from_strict_label(&label);

            let score = if label.contains("HD") || href.contains("hd") {
                1000
            } else if label.contains("720") {
                720
            } else {
                360
            };
            let mut candidate = MediaCandidate::new(collapse_download_flag(href), kind);
            if kind == MediaKind::Video {
                candidate.thumbnail = item
                    .find_attr("div.download-items__thumb > img", "src")
                    .map(fix_thumbnail);
            }
            Some(Scored::new(candidate, score))
        })
        .collect();
    rank(scored)
}

/// Thumbnails routed through the snapinsta photo proxy carry the real
/// address percent-encoded after the proxy prefix.
pub fn fix_thumbnail(url: &str) -> String {
    if !url.contains(THUMBNAIL_PROXY_PREFIX) {
        return url.to_string();
    }
    let stripped = url.replace(THUMBNAIL_PROXY_PREFIX, "");
    match urlencoding::decode(&stripped) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => stripped,
    }
}
