//! Listing-specific error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Listing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Listing endpoint returned HTTP {status} for prefix '{prefix}'")]
    Status { status: u16, prefix: String },

    #[error("Invalid listing URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}
