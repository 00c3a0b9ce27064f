use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::error::UploadError;

#[derive(Debug, Serialize)]
struct PinRequest<'a> {
    cid: &'a str,
    name: &'a str,
}

/// Client for a remote pinning service
#[derive(Debug, Clone)]
pub struct PinnerClient {
    base: Url,
    client: Client,
}

impl PinnerClient {
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

    /// `POST {pinner}/psa/pins` requesting long-term retention of an
    /// already-uploaded content identifier
    pub async fn pin(&self, cid: &str, name: &str, auth: &str) -> Result<(), UploadError> {
        let url = Url::parse(&format!(
            "{}/psa/pins",
            self.base.as_str().trim_end_matches('/')
        ))?;

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, auth)
            .json(&PinRequest { cid, name })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::HttpStatus(status, body));
        }

        Ok(())
    }
}
