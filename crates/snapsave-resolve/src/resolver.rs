use snapsave_core::{ExtractionResult, ResolverOutcome, SnapResult};
use snapsave_extract::platforms::{snapsave, tiktok, twitter};
use snapsave_url::{Platform, classify, normalize};
use tracing::{debug, warn};

use crate::api::http::{Fetch, HttpFetcher, HttpSettings};
use crate::api::snapsave::SnapSaveClient;
use crate::api::snaptik::SnapTikClient;
use crate::api::twitter::TwitterClient;

#[derive(Debug, Clone)]
pub struct Resolver<F: Fetch = HttpFetcher> {
    fetcher: F,
}

impl Resolver<HttpFetcher> {
    pub fn with_settings(settings: &HttpSettings) -> SnapResult<Self> {
        Ok(Self::new(HttpFetcher::new(settings)?))
    }
}

impl<F: Fetch> Resolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Resolves `url` into the public envelope. Never fails: every error is
    /// folded into a failure message.
    pub async fn resolve(&self, url: &str) -> ResolverOutcome {
        let result = self.resolve_media(url).await;
        if let Err(err) = &result {
            warn!(url, error = %err, "resolution failed");
        }
        ResolverOutcome::from_result(result)
    }

    pub async fn resolve_media(&self, url: &str) -> SnapResult<ExtractionResult> {
        let platform = classify(url)?;
        let normalized = normalize(url);
        debug!(%platform, url = %normalized, "resolving");

        match platform {
            Platform::TikTok => {
                let html = SnapTikClient::new(&self.fetcher)
                    .fetch_markup(&normalized)
                    .await?;
                tiktok::extract(&html)
            }
            Platform::Twitter => {
                let html = TwitterClient::new(&self.fetcher)
                    .fetch_markup(&normalized)
                    .await?;
                twitter::extract(&html)
            }
            Platform::Facebook | Platform::Instagram => {
                let html = SnapSaveClient::new(&self.fetcher)
                    .fetch_markup(&normalized)
                    .await?;
                snapsave::extract(&html)
            }
        }
    }
}
