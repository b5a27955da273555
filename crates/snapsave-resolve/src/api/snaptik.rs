use snapsave_core::SnapResult;
use snapsave_decrypt::{PayloadFamily, decrypt};
use tracing::debug;

use super::http::Fetch;
use super::{action_form, extract_token};

pub const HOME_URL: &str = "https://snaptik.app/";
pub const ACTION_URL: &str = "https://snaptik.app/abc2.php";
const ORIGIN: &str = "https://snaptik.app";

const HOME_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.5"),
    ("cache-control", "no-cache"),
];

const ACTION_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("origin", ORIGIN),
    ("referer", HOME_URL),
    ("x-requested-with", "XMLHttpRequest"),
];

/// TikTok through snaptik.app: home page for the token, then the packed
/// action response.
pub struct SnapTikClient<'a, F: Fetch> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> SnapTikClient<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_markup(&self, url: &str) -> SnapResult<String> {
        let home = self.fetcher.get_text(HOME_URL, HOME_HEADERS).await?;
        let token = extract_token(&home);
        debug!(has_token = token.is_some(), "fetched snaptik home page");

        let form = action_form(url, token);
        let body = self.fetcher.post_form(ACTION_URL, ACTION_HEADERS, &form).await?;
        decrypt(&body, PayloadFamily::SnapTik)
    }
}
