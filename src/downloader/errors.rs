//! File download error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Unsupported file type '{extension}' for {file_name}")]
    UnsupportedExtension { file_name: String, extension: String },

    #[error("No file name in URL: {0}")]
    MissingFileName(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
