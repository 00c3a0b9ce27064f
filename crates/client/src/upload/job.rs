use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::future::AbortHandle;
use parking_lot::Mutex;

/// Upload size ceiling in bytes (100 MiB)
///
/// Enforced locally before any network call.
pub const MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

/// The file being uploaded: a name and its bytes
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, using its file name as the upload name
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = std::fs::read(path)?;
        Ok(Self::new(name, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub(crate) fn data(&self) -> Bytes {
        self.data.clone()
    }
}

/// Lifecycle of a single upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Signing,
    Uploading,
    Pinning,
    Done,
    Failed,
    Cancelled,
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::Done | UploadState::Failed | UploadState::Cancelled
        )
    }

    /// Cancellation is only meaningful while a network call is in flight
    pub fn is_cancellable(&self) -> bool {
        matches!(self, UploadState::Uploading | UploadState::Pinning)
    }
}

type ProgressCallback = Box<dyn Fn(u8) + Send + Sync>;

pub(crate) struct JobInner {
    state: Mutex<UploadState>,
    progress: Mutex<u8>,
    abort: Mutex<Option<AbortHandle>>,
    cancelled: AtomicBool,
    on_progress: Mutex<Option<ProgressCallback>>,
}

impl JobInner {
    fn notify(&self, value: u8) {
        if let Some(cb) = &*self.on_progress.lock() {
            cb(value);
        }
    }

    /// Commit a progress value; regressions are dropped so observed
    /// progress is monotonically non-decreasing until a reset
    pub(crate) fn commit_progress(&self, value: u8) {
        let committed = {
            let mut progress = self.progress.lock();
            if value <= *progress {
                return;
            }
            *progress = value;
            *progress
        };
        self.notify(committed);
    }

    pub(crate) fn reset_progress(&self) {
        *self.progress.lock() = 0;
        self.notify(0);
    }

    pub(crate) fn transition(&self, to: UploadState) {
        let mut state = self.state.lock();
        tracing::debug!(from = ?*state, to = ?to, "upload state transition");
        *state = to;
    }

    pub(crate) fn register_abort(&self, handle: AbortHandle) {
        *self.abort.lock() = Some(handle);
    }

    pub(crate) fn clear_abort(&self) {
        *self.abort.lock() = None;
    }

    /// Whether a cancel request has been recorded; consulted by the
    /// orchestrator between network calls, where an abort handle belonging
    /// to an already-completed call can no longer bite
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One upload of one file to one gateway/pinner pair
///
/// Created when the user initiates an upload and driven by
/// [`Uploader::upload`](super::Uploader::upload). Exactly one job is active
/// per upload dialog instance; a failed or cancelled upload is re-attempted
/// with a fresh job.
pub struct UploadJob {
    pub(crate) file: UploadFile,
    pub(crate) gateway: String,
    pub(crate) pinner: String,
    pub(crate) inner: Arc<JobInner>,
}

impl UploadJob {
    pub fn new(file: UploadFile, gateway: impl Into<String>, pinner: impl Into<String>) -> Self {
        Self {
            file,
            gateway: gateway.into(),
            pinner: pinner.into(),
            inner: Arc::new(JobInner {
                state: Mutex::new(UploadState::Idle),
                progress: Mutex::new(0),
                abort: Mutex::new(None),
                cancelled: AtomicBool::new(false),
                on_progress: Mutex::new(None),
            }),
        }
    }

    /// Observe every committed progress value
    pub fn on_progress(self, callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        *self.inner.on_progress.lock() = Some(Box::new(callback));
        self
    }

    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    pub fn state(&self) -> UploadState {
        *self.inner.state.lock()
    }

    pub fn progress(&self) -> u8 {
        *self.inner.progress.lock()
    }

    /// A cloneable handle for observing and cancelling this job
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            inner: self.inner.clone(),
        }
    }
}

/// Cloneable view of an [`UploadJob`], usable from outside the upload call
#[derive(Clone)]
pub struct JobHandle {
    inner: Arc<JobInner>,
}

impl JobHandle {
    pub fn state(&self) -> UploadState {
        *self.inner.state.lock()
    }

    pub fn progress(&self) -> u8 {
        *self.inner.progress.lock()
    }

    /// Request cancellation of the upload
    ///
    /// Only meaningful while the job is uploading or pinning; returns
    /// whether the request was recorded. The cancel flag is set before the
    /// abort handle is taken, so a request landing between two network
    /// calls (the registered handle already spent) is still honoured by
    /// the orchestrator at the next step boundary. The job itself
    /// transitions to `Cancelled` when the orchestrator observes the
    /// request.
    pub fn cancel(&self) -> bool {
        let state = *self.inner.state.lock();
        if !state.is_cancellable() {
            return false;
        }
        self.inner.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = self.inner.abort.lock().take() {
            tracing::debug!(state = ?state, "cancelling in-flight upload call");
            handle.abort();
        }
        true
    }
}
