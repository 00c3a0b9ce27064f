/**
 * Error kinds surfaced at the component boundary.
 *  None are fatal to the application; the caller
 *  may retry from scratch.
 */
pub mod error;
/**
 * Secondary wallet provider detection and account
 *  access (the MetaMask-style injected provider).
 */
pub mod provider;
/**
 * The upload workflow: sign an authentication
 *  token, stream the file to a gateway, then
 *  request remote pinning. One job per dialog,
 *  with progress and cooperative cancellation.
 */
pub mod upload;

pub mod prelude {
    pub use crate::error::{ProviderError, UploadError};
    pub use crate::provider::{connect, detect, ConnectState, EthereumProvider, ProviderStatus};
    pub use crate::upload::{
        GatewayClient, JobHandle, PinnerClient, UploadFile, UploadJob, UploadRes, UploadState,
        Uploader, MAX_UPLOAD_SIZE,
    };
}
