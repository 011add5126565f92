use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::LibrarySettings;
use crate::error::SourceError;

use super::listing::{parse_catalog, parse_metadata};
use super::model::FolderMetadata;
use super::source::ContentSource;

/// Serves folders from an HTTP static host rooted at `base`
/// (e.g. `http://localhost:8000/songs`).
///
/// Without a `catalog_file` the catalog is the host's directory listing of
/// `{base}/`.
pub struct HttpSource {
    http: Client,
    base: String,
    catalog_file: Option<String>,
    metadata_file: String,
}

impl HttpSource {
    pub fn new(base: String, settings: &LibrarySettings) -> Result<Self, SourceError> {
        let http = Client::builder()
            .user_agent(format!("albumdeck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            catalog_file: settings.catalog_file.clone(),
            metadata_file: settings.metadata_file.clone(),
        })
    }

    fn catalog_url(&self) -> String {
        match self.catalog_file.as_deref() {
            Some(name) => format!("{}/{}", self.base, name),
            None => format!("{}/", self.base),
        }
    }

    fn metadata_url(&self, folder_id: &str) -> String {
        format!("{}/{}/{}", self.base, folder_id, self.metadata_file)
    }

    /// HEAD the asset; 404 means absent, other failures are errors.
    async fn probe(&self, url: &str) -> Result<bool, SourceError> {
        debug!(url = %url, "checking asset");

        let status = self.http.head(url).send().await?.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(SourceError::Status {
                status: status.as_u16(),
                resource: url.to_string(),
            })
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        debug!(url = %url, "fetching");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.text().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(SourceError::NotFound(url.to_string()))
        } else {
            Err(SourceError::Status {
                status: status.as_u16(),
                resource: url.to_string(),
            })
        }
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_catalog(&self) -> Result<Vec<String>, SourceError> {
        let url = self.catalog_url();
        let body = self.get_text(&url).await?;
        parse_catalog(&url, &body)
    }

    async fn fetch_metadata(&self, folder_id: &str) -> Result<FolderMetadata, SourceError> {
        let url = self.metadata_url(folder_id);
        let body = self.get_text(&url).await?;
        parse_metadata(&url, &body)
    }

    async fn asset_exists(&self, path: &str) -> Result<bool, SourceError> {
        self.probe(&format!("{}/{}", self.base, path.trim_start_matches('/')))
            .await
    }
}
