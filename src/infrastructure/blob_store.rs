//! Object storage access for the precomputed embeddings.
//!
//! Production reads from a GCS bucket over the JSON API; local deployments
//! and tests point at a directory laid out like the bucket.

use crate::domain::error::{AppError, Result};
use crate::infrastructure::storage::object_file_name;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

const GCS_API_BASE: &str = "https://storage.googleapis.com/storage/v1/b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobObject {
    pub name: String,
    pub size: Option<u64>,
}

impl BlobObject {
    /// Zero-byte "folder" markers created by the console.
    pub fn is_placeholder(&self) -> bool {
        self.name.ends_with('/')
    }
}

#[async_trait]
pub trait BlobSource: Send + Sync {
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>>;

    /// Writes `object` into `dest_dir` under its last path segment.
    async fn download(&self, object: &BlobObject, dest_dir: &Path) -> Result<PathBuf>;
}

/// Downloads every object under `prefix` into `dest_dir`.
pub async fn download_all(
    source: &dyn BlobSource,
    prefix: &str,
    dest_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let objects = source.list(prefix).await?;
    let mut paths = Vec::with_capacity(objects.len());
    for object in objects.iter().filter(|object| !object.is_placeholder()) {
        let path = source.download(object, dest_dir).await?;
        info!(
            object = %object.name,
            bytes = ?object.size,
            path = %path.display(),
            "Downloaded embeddings object"
        );
        paths.push(path);
    }
    Ok(paths)
}

fn local_target(object: &BlobObject, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = object_file_name(&object.name).ok_or_else(|| {
        AppError::StorageError(format!("Object '{}' has no file name", object.name))
    })?;
    Ok(dest_dir.join(file_name))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcsListResponse {
    #[serde(default)]
    items: Vec<GcsObject>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GcsObject {
    name: String,
    size: Option<String>,
}

pub struct GcsBlobSource {
    client: Client,
    bucket: String,
    access_token: Option<String>,
}

impl GcsBlobSource {
    pub fn new(bucket: &str, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            bucket: bucket.to_string(),
            access_token,
        }
    }

    /// Picks up a bearer token from `GOOGLE_OAUTH_ACCESS_TOKEN` when set.
    pub fn from_env(bucket: &str) -> Self {
        let token = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Self::new(bucket, token)
    }

    fn objects_url(&self) -> Result<Url> {
        let mut url = Url::parse(GCS_API_BASE)
            .map_err(|e| AppError::StorageError(format!("Invalid GCS base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::StorageError("GCS base url cannot be a base".to_string()))?
            .push(&self.bucket)
            .push("o");
        Ok(url)
    }

    fn media_url(&self, object_name: &str) -> Result<Url> {
        let mut url = self.objects_url()?;
        url.path_segments_mut()
            .map_err(|_| AppError::StorageError("GCS base url cannot be a base".to_string()))?
            .push(object_name);
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl BlobSource for GcsBlobSource {
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.objects_url()?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("prefix", prefix);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .authorized(self.client.get(url.clone()))
                .send()
                .await
                .map_err(|e| {
                    AppError::StorageError(format!("Failed to list objects ({}): {}", url, e))
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AppError::StorageError(format!(
                    "Object listing returned error {} (bucket: {}): {}",
                    status, self.bucket, error_text
                )));
            }

            let page: GcsListResponse = response.json().await.map_err(|e| {
                AppError::StorageError(format!("Failed to parse object listing: {}", e))
            })?;

            objects.extend(page.items.into_iter().map(|item| BlobObject {
                size: item.size.and_then(|s| s.parse().ok()),
                name: item.name,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(bucket = %self.bucket, prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    async fn download(&self, object: &BlobObject, dest_dir: &Path) -> Result<PathBuf> {
        let target = local_target(object, dest_dir)?;
        let url = self.media_url(&object.name)?;

        let response = self
            .authorized(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to download ({}): {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::StorageError(format!(
                "Download of {} returned error {}",
                object.name, status
            )));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(&target, &bytes).await?;
        Ok(target)
    }
}

/// A directory mirroring the bucket layout (`<root>/embeddings/...`).
pub struct LocalBlobSource {
    root: PathBuf,
}

impl LocalBlobSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobSource for LocalBlobSource {
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>> {
        let dir = self.root.join(prefix);
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
            AppError::StorageError(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            objects.push(BlobObject {
                name: format!("{}{}", prefix, file_name),
                size: Some(metadata.len()),
            });
        }
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn download(&self, object: &BlobObject, dest_dir: &Path) -> Result<PathBuf> {
        let target = local_target(object, dest_dir)?;
        let source = self.root.join(&object.name);
        tokio::fs::copy(&source, &target).await.map_err(|e| {
            AppError::StorageError(format!("Failed to copy {}: {}", source.display(), e))
        })?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url_escapes_object_name() {
        let source = GcsBlobSource::new("datcom-csv", None);
        let url = source.media_url("embeddings/embeddings_combined_all.csv").unwrap();
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/datcom-csv/o/embeddings%2Fembeddings_combined_all.csv?alt=media"
        );
    }

    #[test]
    fn test_placeholder_detection() {
        let folder = BlobObject {
            name: "embeddings/".to_string(),
            size: Some(0),
        };
        assert!(folder.is_placeholder());
    }

    #[tokio::test]
    async fn test_local_source_downloads_all_under_prefix() {
        let bucket = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let prefix_dir = bucket.path().join("embeddings");
        std::fs::create_dir_all(&prefix_dir).unwrap();
        std::fs::write(prefix_dir.join("embeddings_a.csv"), "dcid,0\nx,1").unwrap();
        std::fs::write(prefix_dir.join("embeddings_b.csv"), "dcid,0\ny,1").unwrap();

        let source = LocalBlobSource::new(bucket.path());
        let listed = source.list("embeddings/").await.unwrap();
        assert!(listed.iter().all(|object| object.size == Some(10)));

        let paths = download_all(&source, "embeddings/", scratch.path())
            .await
            .unwrap();

        assert_eq!(paths.len(), 2);
        assert!(scratch.path().join("embeddings_a.csv").exists());
        assert!(scratch.path().join("embeddings_b.csv").exists());
    }

    #[tokio::test]
    async fn test_local_source_missing_prefix_is_storage_error() {
        let bucket = tempfile::tempdir().unwrap();
        let source = LocalBlobSource::new(bucket.path());
        let err = source.list("embeddings/").await.unwrap_err();
        assert!(matches!(err, AppError::StorageError(_)));
    }
}
