//! REST client for the content service

use crate::constants::*;
use crate::error::FetchError;
use crate::types::{Content, ContentId};
use futures::StreamExt;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Thin client over the service's content resource.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base: Url,
}

impl ContentClient {
    /// Build a client rooted at `base_url` (e.g. `http://localhost:8080/demo/rest`).
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| FetchError::Url(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(FetchError::Url(format!("{}: not an http(s) base url", base_url)));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `{base}/content/getByTitle/{title}` with the title as one encoded segment.
    pub fn by_title_url(&self, title: &str) -> Result<Url, FetchError> {
        self.endpoint(&[CONTENT_RESOURCE, BY_TITLE_SEGMENT, title])
    }

    pub fn by_id_url(&self, id: &ContentId) -> Result<Url, FetchError> {
        self.endpoint(&[CONTENT_RESOURCE, BY_ID_SEGMENT, id.as_str()])
    }

    /// Photo URLs may be absolute or relative to the service root.
    pub fn resolve_photo_url(&self, photo_url: &str) -> Result<Url, FetchError> {
        self.base
            .join(photo_url.trim())
            .map_err(|e| FetchError::Url(format!("{}: {}", photo_url, e)))
    }

    pub async fn list_by_title(&self, title: &str) -> Result<Vec<Content>, FetchError> {
        let url = self.by_title_url(title)?;
        debug!(%url, "Fetching contents by title");
        let body = self.get_checked(url).await?.bytes().await?;
        let contents: Vec<Content> = serde_json::from_slice(&body)?;
        debug!(count = contents.len(), "Contents received");
        Ok(contents)
    }

    pub async fn get_by_id(&self, id: &ContentId) -> Result<Content, FetchError> {
        let url = self.by_id_url(id)?;
        debug!(%url, "Fetching content by id");
        let body = self.get_checked(url).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Download photo bytes, refusing bodies larger than `MAX_PHOTO_BYTES`.
    pub async fn fetch_photo(&self, photo_url: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.resolve_photo_url(photo_url)?;
        let response = self.get_checked(url).await?;

        let limit = MAX_PHOTO_BYTES;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge { limit });
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    async fn get_checked(&self, url: Url) -> Result<reqwest::Response, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(FetchError::Status {
            status,
            body: body.chars().take(ERROR_BODY_SNIPPET).collect(),
        })
    }
}
