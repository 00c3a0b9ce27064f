use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::{AbortHandle, Abortable};

use common::session::Session;
use common::store::SaveFile;

use crate::error::UploadError;

use super::gateway::GatewayClient;
use super::job::{UploadJob, UploadState, MAX_UPLOAD_SIZE};
use super::pinner::PinnerClient;

/// Drives an [`UploadJob`] through its state machine
///
/// idle → signing → uploading → pinning → done, with failed and cancelled
/// as the terminal error states. One handler per transition; no step is
/// retried automatically.
#[derive(Debug, Clone, Default)]
pub struct Uploader;

impl Uploader {
    pub fn new() -> Self {
        Self
    }

    /// Run an upload to completion
    ///
    /// Preconditions checked locally, before any network call: the file is
    /// within the size ceiling and the session exposes a working signing
    /// capability for a non-empty account.
    ///
    /// On success the returned record combines the gateway's response fields
    /// with the two endpoint URLs used, and the job's progress reads exactly
    /// 100. On failure or cancellation the progress resets to 0.
    pub async fn upload(
        &self,
        job: &UploadJob,
        session: &Session,
        passphrase: Option<&str>,
    ) -> Result<SaveFile, UploadError> {
        match self.run(job, session, passphrase).await {
            Ok(file) => {
                job.inner.transition(UploadState::Done);
                job.inner.commit_progress(100);
                tracing::info!(hash = %file.hash, name = %file.name, "upload pinned");
                Ok(file)
            }
            Err(UploadError::Cancelled) => {
                job.inner.clear_abort();
                job.inner.reset_progress();
                job.inner.transition(UploadState::Cancelled);
                tracing::info!("upload cancelled");
                Err(UploadError::Cancelled)
            }
            Err(e) => {
                job.inner.clear_abort();
                job.inner.reset_progress();
                job.inner.transition(UploadState::Failed);
                tracing::warn!(error = %e, "upload failed");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        job: &UploadJob,
        session: &Session,
        passphrase: Option<&str>,
    ) -> Result<SaveFile, UploadError> {
        // local validation, no network
        let size = job.file.size();
        if size > MAX_UPLOAD_SIZE {
            return Err(UploadError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_SIZE,
            });
        }
        if session.account().is_empty() || !session.has_signer() {
            return Err(UploadError::SigningUnavailable);
        }
        let gateway = GatewayClient::new(&job.gateway)?;
        let pinner = PinnerClient::new(&job.pinner)?;

        // 1: sign the account identifier and build the Basic auth header,
        //    reused for both the upload and the pin request
        job.inner.transition(UploadState::Signing);
        let signature = session.sign(session.account(), passphrase).await?;
        let auth = format!(
            "Basic {}",
            BASE64.encode(format!("{}:{}", session.account(), signature))
        );

        // 2: stream the file to the gateway, abortable while in flight
        let (abort, registration) = AbortHandle::new_pair();
        job.inner.register_abort(abort);
        job.inner.transition(UploadState::Uploading);
        let inner = job.inner.clone();
        let progress = Arc::new(move |value: u8| inner.commit_progress(value));
        let add = Abortable::new(gateway.add(&job.file, &auth, progress), registration);
        let res = match add.await {
            Err(futures::future::Aborted) => return Err(UploadError::Cancelled),
            Ok(result) => result?,
        };
        // a cancel landing after the upload call resolved missed its abort
        // handle; honour it here instead of issuing the pin request
        if job.inner.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        // 3: remote pin order, also abortable
        let (abort, registration) = AbortHandle::new_pair();
        job.inner.register_abort(abort);
        job.inner.transition(UploadState::Pinning);
        let pin = Abortable::new(pinner.pin(&res.hash, &res.name, &auth), registration);
        match pin.await {
            Err(futures::future::Aborted) => return Err(UploadError::Cancelled),
            Ok(result) => result?,
        }
        if job.inner.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        job.inner.clear_abort();

        Ok(SaveFile {
            hash: res.hash,
            name: res.name,
            size: res.size.and_then(|s| s.parse().ok()),
            up_endpoint: job.gateway.clone(),
            pin_endpoint: job.pinner.clone(),
        })
    }
}
