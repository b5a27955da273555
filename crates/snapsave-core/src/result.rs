use serde::{Deserialize, Serialize, Serializer};

use crate::error::{SnapError, SnapResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Images are labelled with "photo" by every proxy we talk to.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("photo") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }

    /// Card and download-item labels only ever say `Photo`, capitalized.
    pub fn from_strict_label(label: &str) -> Self {
        if label.contains("Photo") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(rename = "shouldRender", skip_serializing_if = "Option::is_none")]
    pub should_render: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
}

impl MediaCandidate {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            resolution: None,
            should_render: None,
            thumbnail: None,
            kind,
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub media: Vec<MediaCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidUrl,
    BlankData,
    Unexpected,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::InvalidUrl => "Invalid URL",
            FailureReason::BlankData => "Blank data",
            FailureReason::Unexpected => "Something went wrong",
        }
    }
}

impl From<&SnapError> for FailureReason {
    fn from(err: &SnapError) -> Self {
        match err {
            SnapError::InvalidUrl(_) => FailureReason::InvalidUrl,
            SnapError::BlankData => FailureReason::BlankData,
            _ => FailureReason::Unexpected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverOutcome {
    Success(ExtractionResult),
    Failure(FailureReason),
}

impl ResolverOutcome {
    /// Collapses a pipeline result into the public envelope. A success without
    /// media is reported as blank data.
    pub fn from_result(result: SnapResult<ExtractionResult>) -> Self {
        match result {
            Ok(data) if data.media.is_empty() => {
                ResolverOutcome::Failure(FailureReason::BlankData)
            }
            Ok(data) => ResolverOutcome::Success(data),
            Err(err) => ResolverOutcome::Failure(FailureReason::from(&err)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResolverOutcome::Success(_))
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            ResolverOutcome::Success(_) => None,
            ResolverOutcome::Failure(reason) => Some(reason.message()),
        }
    }

    pub fn data(&self) -> Option<&ExtractionResult> {
        match self {
            ResolverOutcome::Success(data) => Some(data),
            ResolverOutcome::Failure(_) => None,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a ExtractionResult>,
}

impl Serialize for ResolverOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope {
            success: self.is_success(),
            message: self.message(),
            data: self.data(),
        }
        .serialize(serializer)
    }
}
