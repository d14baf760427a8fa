//! Fetching blob contents to the local output directory

use crate::config::Config;
use crate::downloader::errors::DownloadError;
use crate::models::{BlobRecord, DownloadSummary, FailedDownload, FileKind};
use futures::StreamExt;
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// File name at the end of a blob URL.
pub fn file_name(url: &str) -> Option<&str> {
    let (_, name) = url.rsplit_once('/')?;
    (!name.is_empty()).then_some(name)
}

/// Extension of the last path segment, without the dot.
pub fn file_extension(url: &str) -> Option<&str> {
    let dot = url.rfind('.')?;
    if url.rfind('/').is_some_and(|slash| slash > dot) {
        return None;
    }
    Some(&url[dot + 1..])
}

/// Writes blobs into one output directory, one request at a time.
#[derive(Debug, Clone)]
pub struct BlobDownloader {
    client: Client,
    output_dir: PathBuf,
    binary_timeout: Duration,
}

impl BlobDownloader {
    pub fn new(config: &Config, output_dir: impl Into<PathBuf>) -> Result<Self, DownloadError> {
        // No overall timeout here: text files are unbounded, binary files set
        // their own per request.
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .connect_timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            output_dir: output_dir.into(),
            binary_timeout: config.binary_timeout(),
        })
    }

    /// Download one blob, returning the path it was written to.
    ///
    /// Unsupported extensions are rejected before any request is made.
    pub async fn download(&self, record: &BlobRecord) -> Result<PathBuf, DownloadError> {
        let name = file_name(&record.url)
            .ok_or_else(|| DownloadError::MissingFileName(record.url.clone()))?;
        let extension = file_extension(&record.url).unwrap_or_default();
        let kind = FileKind::from_extension(extension).ok_or_else(|| {
            DownloadError::UnsupportedExtension {
                file_name: name.to_string(),
                extension: extension.to_string(),
            }
        })?;

        let output_path = self.output_dir.join(name);
        debug!(
            "Downloading {} file {} to {}",
            kind.as_str(),
            record.url,
            output_path.display()
        );

        match kind {
            FileKind::Text => self.download_text(&record.url, &output_path).await?,
            FileKind::Binary => self.download_binary(&record.url, &output_path).await?,
        }

        Ok(output_path)
    }

    async fn download_text(&self, url: &str, output_path: &Path) -> Result<(), DownloadError> {
        let response = self.client.get(url).send().await?;
        let response = check_status(response, url)?;

        // Raw bytes, so a BOM or non-UTF-8 content survives untouched
        let content = response.bytes().await?;
        tokio::fs::write(output_path, &content).await?;
        Ok(())
    }

    async fn download_binary(&self, url: &str, output_path: &Path) -> Result<(), DownloadError> {
        let response = self
            .client
            .get(url)
            .timeout(self.binary_timeout)
            .send()
            .await?;
        let response = check_status(response, url)?;

        if let Err(e) = write_stream(response, output_path).await {
            // Leave no truncated file behind
            let _ = tokio::fs::remove_file(output_path).await;
            return Err(e);
        }
        Ok(())
    }

    /// Download every record in order. Failures are collected and do not stop
    /// the batch.
    pub async fn download_all(&self, records: &[BlobRecord]) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        for (index, record) in records.iter().enumerate() {
            let display_name = file_name(&record.url).unwrap_or(&record.url).to_string();
            info!("Downloading file {}/{}: {}", index + 1, records.len(), display_name);

            match self.download(record).await {
                Ok(path) => {
                    summary.succeeded += 1;
                    info!("✓ Successfully downloaded: {}", path.display());
                }
                Err(e) => {
                    warn!("✗ Failed to download {}: {}", display_name, e);
                    summary.failed.push(FailedDownload {
                        file_name: display_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Downloaded {} files, {} failed",
            summary.succeeded,
            summary.failed.len()
        );
        summary
    }
}

fn check_status(response: Response, url: &str) -> Result<Response, DownloadError> {
    let status = response.status();
    info!("HTTP {} for {}", status.as_u16(), url);

    if !status.is_success() {
        return Err(DownloadError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

async fn write_stream(response: Response, output_path: &Path) -> Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(output_path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }

    file.flush().await?;
    Ok(())
}
