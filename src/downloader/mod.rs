use anyhow::{Context, Result};
use crate::config::Config;
use crate::models::{BlobRecord, DownloadSummary};
use std::path::Path;

pub mod blob;
pub mod errors;

pub use blob::{file_extension, file_name, BlobDownloader};
pub use errors::DownloadError;

/// Download every record into `output_dir`, creating the directory first.
pub async fn download_records(
    records: &[BlobRecord],
    output_dir: &Path,
    config: &Config,
) -> Result<DownloadSummary> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory: {}", output_dir.display()))?;

    let downloader = BlobDownloader::new(config, output_dir)?;
    Ok(downloader.download_all(records).await)
}
