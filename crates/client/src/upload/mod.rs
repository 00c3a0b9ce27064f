mod gateway;
mod job;
mod pinner;
mod uploader;

pub use gateway::{GatewayClient, UploadRes};
pub use job::{JobHandle, UploadFile, UploadJob, UploadState, MAX_UPLOAD_SIZE};
pub use pinner::PinnerClient;
pub use uploader::Uploader;
