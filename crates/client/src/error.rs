use common::session::SignError;
use reqwest::StatusCode;

/// Errors surfaced by the upload workflow
///
/// Any failure resets the job's transient progress state; nothing is
/// retried automatically and the caller may re-invoke the upload from
/// scratch.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Local validation failure, raised before any network call
    #[error("file size {size} exceeds the {limit} byte upload ceiling")]
    FileTooLarge { size: u64, limit: u64 },
    /// The session resolved without a signing capability
    #[error("no signer available for the current session")]
    SigningUnavailable,
    /// Unlock or the signing call itself failed
    #[error("signing failed: {0}")]
    SigningFailed(String),
    /// Upload or pin request failed on the wire
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Upload or pin request was answered with a non-success status
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
    /// The in-flight network call was cancelled by the caller
    #[error("upload cancelled")]
    Cancelled,
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<SignError> for UploadError {
    fn from(e: SignError) -> Self {
        match e {
            SignError::NoSigner => UploadError::SigningUnavailable,
            SignError::Failed(msg) => UploadError::SigningFailed(msg),
        }
    }
}

/// Errors surfaced by the secondary wallet provider flow
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The user declined account access
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    /// The provider call itself failed
    #[error("provider transport error: {0}")]
    Transport(String),
}
