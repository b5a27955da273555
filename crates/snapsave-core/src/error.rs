use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("no media found")]
    BlankData,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub type SnapResult<T> = Result<T, SnapError>;
