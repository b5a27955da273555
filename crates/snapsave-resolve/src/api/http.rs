use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use snapsave_core::{SnapError, SnapResult};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

pub type Headers<'a> = &'a [(&'a str, &'a str)];
pub type Form<'a> = &'a [(&'a str, String)];

/// The transport the resolvers run on. Each call is one round trip.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_text(&self, url: &str, headers: Headers<'_>) -> SnapResult<String>;

    async fn post_form(&self, url: &str, headers: Headers<'_>, form: Form<'_>)
    -> SnapResult<String>;
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> SnapResult<Self> {
        let mut builder = Client::builder().user_agent(&settings.user_agent);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SnapError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self { client })
    }

    fn with_headers(&self, mut request: RequestBuilder, headers: Headers<'_>) -> RequestBuilder {
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> SnapResult<String> {
        let response = request
            .send()
            .await
            .map_err(|err| SnapError::Network(format!("request to {url} failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SnapError::Api(format!(
                "proxy error: url={url} status={status} body={body}"
            )));
        }

        response
            .text()
            .await
            .map_err(|err| SnapError::Network(format!("reading {url} failed: {err}")))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str, headers: Headers<'_>) -> SnapResult<String> {
        let request = self.with_headers(self.client.get(url), headers);
        self.send(request, url).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: Headers<'_>,
        form: Form<'_>,
    ) -> SnapResult<String> {
        let request = self.with_headers(self.client.post(url), headers).form(form);
        self.send(request, url).await
    }
}
