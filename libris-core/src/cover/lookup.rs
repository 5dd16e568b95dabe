//! External cover-image lookup

use crate::error::EnrichmentError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Finds a thumbnail URL for a book title
#[async_trait]
pub trait CoverLookup: Send + Sync {
    /// `Ok(None)` when the service has no thumbnail for `title`
    async fn thumbnail(&self, title: &str) -> Result<Option<String>, EnrichmentError>;
}

/// Lookup against a Google Books compatible volume search
#[derive(Debug, Clone)]
pub struct VolumeSearchLookup {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    #[serde(default)]
    thumbnail: Option<String>,
}

impl VolumesResponse {
    /// Thumbnail of the first matching volume only
    fn first_thumbnail(self) -> Option<String> {
        self.items?
            .into_iter()
            .next()?
            .volume_info?
            .image_links?
            .thumbnail
            .filter(|url| !url.trim().is_empty())
    }
}

impl VolumeSearchLookup {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CoverLookup for VolumeSearchLookup {
    async fn thumbnail(&self, title: &str) -> Result<Option<String>, EnrichmentError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", format!("intitle:{}", title))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        let volumes: VolumesResponse = response.json().await?;
        Ok(volumes.first_thumbnail())
    }
}
