pub mod api;
mod resolver;

use snapsave_core::{FailureReason, ResolverOutcome};
use tracing::warn;

pub use api::http::{DEFAULT_USER_AGENT, Fetch, HttpFetcher, HttpSettings};
pub use resolver::Resolver;

/// Resolves `url` with a default HTTP transport.
pub async fn resolve(url: &str) -> ResolverOutcome {
    match Resolver::with_settings(&HttpSettings::default()) {
        Ok(resolver) => resolver.resolve(url).await,
        Err(err) => {
            warn!(error = %err, "could not build http transport");
            ResolverOutcome::Failure(FailureReason::Unexpected)
        }
    }
}
