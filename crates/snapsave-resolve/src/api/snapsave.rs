use snapsave_core::SnapResult;
use snapsave_decrypt::{PayloadFamily, decrypt};

use super::action_form;
use super::http::Fetch;

pub const ACTION_URL: &str = "https://snapsave.app/action.php?lang=en";

const ACTION_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("origin", "https://snapsave.app"),
    ("referer", "https://snapsave.app/"),
];

/// Facebook and Instagram through snapsave.app: a single packed POST.
pub struct SnapSaveClient<'a, F: Fetch> {
    fetcher: &'a F,
}

impl<'a, F: Fetch> SnapSaveClient<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_markup(&self, url: &str) -> SnapResult<String> {
        let form = action_form(url, None);
        let body = self.fetcher.post_form(ACTION_URL, ACTION_HEADERS, &form).await?;
        decrypt(&body, PayloadFamily::SnapSave)
    }
}
