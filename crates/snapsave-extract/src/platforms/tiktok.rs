use snapsave_core::{ExtractionResult, MediaCandidate, MediaKind, SnapError, SnapResult};
use tracing::debug;

use super::{contains_any, first_link_matching, scored_links};
use crate::query::{Document, Lookup};
use crate::rank::{best, tier_score};
use crate::text::Boilerplate;

const LINK_MARKERS: &[&str] = &["snaptik", "tikmate", "download"];
const FALLBACK_LINK_MARKERS: &[&str] = &["download", "snaptik", "tikmate"];
const DOWNLOAD_CLASS: &str = "download-file";
const FALLBACK_DESCRIPTION: &str = "TikTok Video";

const DESCRIPTION: &[Lookup] = &[
    Lookup::Text(".video-title"),
    Lookup::Text(".video-des"),
    Lookup::FirstText("h3"),
    Lookup::Text(".desc"),
    Lookup::Text(".video-description"),
    Lookup::FirstText("p"),
    Lookup::Text(".title"),
];

const PREVIEW: &[Lookup] = &[
    Lookup::Attr("#thumbnail", "src"),
    Lookup::Attr("img[src*='tiktok']", "src"),
    Lookup::Attr(".video-thumb img", "src"),
    Lookup::Attr("img", "src"),
];

const BOILERPLATE: Boilerplate = Boilerplate {
    leading_words: &["TikTok", "Video", "Download", "Share"],
    trailing_patterns: &[],
};

pub fn extract(html: &str) -> SnapResult<ExtractionResult> {
    let doc = Document::parse(html);
    let links = scored_links(
        &doc,
        |link, href| contains_any(href, LINK_MARKERS) || link.has_class(DOWNLOAD_CLASS),
        |text, _| tier_score(text, 1080, 500),
    );
    debug!(candidates = links.len(), "scored tiktok download links");

    let media = best(links)
        .or_else(|| {
            first_link_matching(&doc, FALLBACK_LINK_MARKERS)
                .map(|url| MediaCandidate::new(url, MediaKind::Video))
        })
        .ok_or(SnapError::BlankData)?;

    Ok(ExtractionResult {
        description: Some(BOILERPLATE.describe(doc.first_of(DESCRIPTION), FALLBACK_DESCRIPTION)),
        preview: doc.first_of(PREVIEW),
        media: vec![media],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_hd_link() {
        let html = r#"
            <div class="video-title">Share:   dancing   cat</div>
            <img id="thumbnail" src="https://p16.tiktokcdn.com/thumb.jpg">
            <a class="download-file" href="https://cdn.snaptik.app/sd.mp4">Download</a>
            <a class="download-file" href="https://cdn.snaptik.app/hd.mp4">Download HD</a>
            <a href="https://snaptik.app/">Home</a>
        "#;
        let result = extract(html).unwrap();
        assert_eq!(result.media.len(), 1);
        assert_eq!(result.media[0].url, "https://cdn.snaptik.app/hd.mp4");
        assert_eq!(result.media[0].kind, MediaKind::Video);
        assert_eq!(result.description.as_deref(), Some("dancing cat"));
        assert_eq!(
            result.preview.as_deref(),
            Some("https://p16.tiktokcdn.com/thumb.jpg")
        );
    }

    #[test]
    fn class_marked_links_count_as_downloads() {
        let html = r#"<a class="download-file" href="https://files.example/a.mp4">Download Photo</a>"#;
        let result = extract(html).unwrap();
        assert_eq!(result.media[0].url, "https://files.example/a.mp4");
        assert_eq!(result.media[0].kind, MediaKind::Image);
        assert_eq!(result.description.as_deref(), Some("TikTok Video"));
    }

    #[test]
    fn unknown_quality_beats_low_resolutions() {
        let html = r#"
            <a href="https://tikmate.app/360.mp4">360p</a>
            <a href="https://tikmate.app/any.mp4">Server 2</a>
        "#;
        let result = extract(html).unwrap();
        assert_eq!(result.media[0].url, "https://tikmate.app/any.mp4");
    }

    #[test]
    fn no_download_links_is_blank() {
        let html = r#"<p>Nothing here</p><a href="https://example.com">Home</a>"#;
        assert!(matches!(extract(html), Err(SnapError::BlankData)));
    }
}
