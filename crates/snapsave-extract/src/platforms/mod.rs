pub mod snapsave;
pub mod tiktok;
pub mod twitter;

use snapsave_core::{MediaCandidate, MediaKind, collapse_download_flag};

use crate::query::{Document, Node};
use crate::rank::Scored;

/// Scores every anchor `accept` lets through. `score` sees the anchor text
/// and its address.
fn scored_links(
    doc: &Document,
    accept: impl Fn(&Node<'_>, &str) -> bool,
    score: impl Fn(&str, &str) -> u32,
) -> Vec<Scored> {
    doc.select("a")
        .into_iter()
        .filter_map(|link| {
            let href = link.attr("href").filter(|href| !href.is_empty())?;
            if !accept(&link, href) {
                return None;
            }
            let text = link.text();
            let candidate =
                MediaCandidate::new(collapse_download_flag(href), MediaKind::from_label(&text));
            Some(Scored::new(candidate, score(&text, href)))
        })
        .collect()
}

fn first_link_matching(doc: &Document, markers: &[&str]) -> Option<String> {
    doc.select("a")
        .into_iter()
        .filter_map(|link| link.attr("href"))
        .find(|href| contains_any(href, markers))
        .map(collapse_download_flag)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
