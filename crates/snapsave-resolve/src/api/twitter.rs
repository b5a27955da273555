use serde::Deserialize;
use snapsave_core::{SnapError, SnapResult};
use tracing::debug;

use super::http::Fetch;
use super::{action_form, extract_token};

pub const HOME_URL: &str = "https://twitterdownloader.snapsave.app/";
pub const ACTION_URL: &str = "https://twitterdownloader.snapsave.app/action.php";
const ORIGIN: &str = "https://twitterdownloader.snapsave.app";

const HOME_HEADERS: &[(&str, &str)] = &[(
    "accept",
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
)];

const ACTION_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("origin", ORIGIN),
    ("referer", HOME_URL),
    ("x-requested-with", "XMLHttpRequest"),
];

/// Twitter/X through the snapsave twitter downloader. Its action endpoint
/// answers with plain markup wrapped in JSON.
pub struct TwitterClient<'a, F: Fetch> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> TwitterClient<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_markup(&self, url: &str) -> SnapResult<String> {
        let home = self.fetcher.get_text(HOME_URL, HOME_HEADERS).await?;
        let token = extract_token(&home);
        debug!(has_token = token.is_some(), "fetched twitter downloader home page");

        let form = action_form(url, token);
        let body = self.fetcher.post_form(ACTION_URL, ACTION_HEADERS, &form).await?;
        let response: ActionResponse = serde_json::from_str(&body)
            .map_err(|err| SnapError::Parse(format!("twitter response parse failed: {err}")))?;
        Ok(response.data.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    data: Option<String>,
}
