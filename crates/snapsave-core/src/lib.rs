mod error;
mod result;

pub use error::{SnapError, SnapResult};
pub use result::{ExtractionResult, FailureReason, MediaCandidate, MediaKind, ResolverOutcome};

const DOWNLOAD_FLAG: &str = "&dl=1";
const REPEATED_DOWNLOAD_FLAG: &str = "&dl=1&dl=1";

/// Collapses the download flag some proxies append more than once.
pub fn collapse_download_flag(url: &str) -> String {
    let mut collapsed = url.to_string();
    while collapsed.contains(REPEATED_DOWNLOAD_FLAG) {
        collapsed = collapsed.replace(REPEATED_DOWNLOAD_FLAG, DOWNLOAD_FLAG);
    }
    collapsed
}
