//! Recognises the social platforms the proxies support and rewrites URLs into
//! the host form the proxies expect.

use std::fmt;

use regex::Regex;
use snapsave_core::{SnapError, SnapResult};

const FACEBOOK_PATTERN: &str = r"^https?://(?:www\.|web\.|m\.)?facebook\.com/(watch(\?v=|/\?v=)[0-9]+|reel/[0-9]+|[a-zA-Z0-9.\-_]+/(videos|posts)/[0-9]+|[0-9]+/(videos|posts)/[0-9]+|[a-zA-Z0-9]+/(videos|posts)/[0-9]+|share/(v|r)/[a-zA-Z0-9]+/?)([^/?#&]+).*$|^https://fb\.watch/[a-zA-Z0-9]+$";
const INSTAGRAM_PATTERN: &str =
    r"^https?://(?:www\.)?instagram\.com/(?:p|reel|reels|tv|stories|share)/([^/?#&]+).*";
const TIKTOK_PATTERN: &str = r"^https?://(?:www\.|m\.|vm\.|vt\.)?tiktok\.com/(?:@[^/]+/(?:video|photo)/[0-9]+|v/[0-9]+|t/[A-Za-z0-9_]+|[A-Za-z0-9_]+)/?";
const TWITTER_PATTERN: &str =
    r"^https://(?:x|twitter)\.com(?:/(?:i/web|[^/]+)/status/([0-9]+)(?:.*)?)?$";
const TWO_LABEL_HOST_PATTERN: &str = r"^(https?://)([^./]+\.[^./]+)(/.*)?$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Facebook,
    Instagram,
    Twitter,
    TikTok,
}

impl Platform {
    const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Twitter,
        Platform::TikTok,
    ];

    fn pattern(&self) -> &'static str {
        match self {
            Platform::Facebook => FACEBOOK_PATTERN,
            Platform::Instagram => INSTAGRAM_PATTERN,
            Platform::Twitter => TWITTER_PATTERN,
            Platform::TikTok => TIKTOK_PATTERN,
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        Regex::new(self.pattern())
            .map(|regex| regex.is_match(url))
            .unwrap_or(false)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter/X",
            Platform::TikTok => "TikTok",
        };
        f.write_str(name)
    }
}

pub fn classify(url: &str) -> SnapResult<Platform> {
    Platform::ALL
        .into_iter()
        .find(|platform| platform.matches(url))
        .ok_or_else(|| SnapError::InvalidUrl(url.to_string()))
}

/// Inserts `www.` into bare two-label hosts. Twitter/X links are passed through
/// untouched.
pub fn normalize(url: &str) -> String {
    if Platform::Twitter.matches(url) || !lacks_www_prefix(url) {
        return url.to_string();
    }
    match Regex::new(TWO_LABEL_HOST_PATTERN) {
        Ok(regex) => regex.replace(url, "${1}www.${2}${3}").into_owned(),
        Err(_) => url.to_string(),
    }
}

fn lacks_www_prefix(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let Some(rest) = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
    else {
        return false;
    };
    !rest.starts_with("www.")
        && rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_facebook_shapes() {
        for url in [
            "https://facebook.com/watch?v=12345",
            "https://www.facebook.com/watch/?v=12345",
            "https://m.facebook.com/reel/1234567",
            "https://web.facebook.com/somepage/videos/1234567/",
            "https://www.facebook.com/share/v/AbC123xyz/",
            "https://fb.watch/abcDEF12",
        ] {
            assert_eq!(classify(url).unwrap(), Platform::Facebook, "{url}");
        }
    }

    #[test]
    fn classifies_instagram_shapes() {
        for url in [
            "https://www.instagram.com/p/C1a2b3c4/",
            "https://instagram.com/reel/C1a2b3c4/?igsh=abc",
            "https://www.instagram.com/stories/someone/123/",
        ] {
            assert_eq!(classify(url).unwrap(), Platform::Instagram, "{url}");
        }
    }

    #[test]
    fn classifies_tiktok_shapes() {
        for url in [
            "https://www.tiktok.com/@someone/video/7301234567890123456",
            "https://vm.tiktok.com/ZMabc123/",
            "https://www.tiktok.com/t/ZTRabc/",
            "https://m.tiktok.com/v/7301234567890123456",
        ] {
            assert_eq!(classify(url).unwrap(), Platform::TikTok, "{url}");
        }
    }

    #[test]
    fn classifies_twitter_shapes() {
        for url in [
            "https://x.com/someone/status/1790000000000000000",
            "https://twitter.com/i/web/status/1790000000000000000?s=20",
        ] {
            assert_eq!(classify(url).unwrap(), Platform::Twitter, "{url}");
        }
    }

    #[test]
    fn rejects_unknown_urls() {
        for url in [
            "https://example.com/video/1",
            "not-a-url",
            "https://www.youtube.com/watch?v=abc",
            "http://x.com/someone/status/1",
        ] {
            assert!(matches!(classify(url), Err(SnapError::InvalidUrl(_))), "{url}");
        }
    }

    #[test]
    fn platform_display_names() {
        let names: Vec<String> = Platform::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["Facebook", "Instagram", "Twitter/X", "TikTok"]);
    }

    #[test]
    fn normalize_inserts_www_for_bare_hosts() {
        assert_eq!(
            normalize("https://facebook.com/watch?v=12345"),
            "https://www.facebook.com/watch?v=12345"
        );
        assert_eq!(
            normalize("https://instagram.com/p/abc/"),
            "https://www.instagram.com/p/abc/"
        );
    }

    #[test]
    fn normalize_leaves_prefixed_and_twitter_urls() {
        for url in [
            "https://www.facebook.com/reel/123",
            "https://m.facebook.com/reel/123",
            "https://vm.tiktok.com/ZMabc123/",
            "https://x.com/someone/status/1790000000000000000",
        ] {
            assert_eq!(normalize(url), url);
        }
    }
}
