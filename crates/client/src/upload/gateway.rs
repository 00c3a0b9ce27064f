use std::sync::Arc;

use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::UploadError;

use super::job::UploadFile;

/// Chunk size for the streamed multipart body; progress is committed once
/// per chunk
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Gateway response for a successful add
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadRes {
    pub hash: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Client for an authenticated IPFS gateway's add endpoint
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base: Url,
    client: Client,
}

impl GatewayClient {
    pub fn new(base: &str) -> Result<Self, UploadError> {
        let base = Url::parse(base.trim_end_matches('/'))?;
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `POST {gateway}/api/v0/add?pin=true` with the file as a streamed
    /// multipart `file` field
    ///
    /// The gateway is asked to pin immediately. `progress` observes the
    /// fraction of bytes handed to the connection, scaled to `[0, 99]`; the
    /// final 100 is owned by the orchestrator and only committed once the
    /// remote pin succeeds.
    pub async fn add(
        &self,
        file: &UploadFile,
        auth: &str,
        progress: Arc<dyn Fn(u8) + Send + Sync>,
    ) -> Result<UploadRes, UploadError> {
        let url = Url::parse(&format!(
            "{}/api/v0/add",
            self.base.as_str().trim_end_matches('/')
        ))?;

        let total = file.size().max(1);
        let mut data = file.data();
        let mut chunks = Vec::with_capacity((data.len() / UPLOAD_CHUNK_SIZE) + 1);
        while !data.is_empty() {
            let take = data.len().min(UPLOAD_CHUNK_SIZE);
            chunks.push(data.split_to(take));
        }

        let mut sent: u64 = 0;
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            let scaled = ((sent * 99) / total) as u8;
            progress(scaled);
            Ok::<_, std::io::Error>(chunk)
        });

        let mime = mime_guess::from_path(file.name()).first_or_octet_stream();
        let part = Part::stream_with_length(Body::wrap_stream(stream), file.size())
            .file_name(file.name().to_string())
            .mime_str(mime.as_ref())?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .query(&[("pin", "true")])
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::HttpStatus(status, body));
        }

        Ok(response.json::<UploadRes>().await?)
    }
}
