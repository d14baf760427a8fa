//! Find and download Electricity Authority datasets published in a public
//! blob container.
//!
//! A query such as `Datasets/Wholesale/Bids -sd 2023-01-01` is split into a
//! listing prefix and a date range ([`query`]), every blob under the prefix is
//! listed page by page ([`listing`]), and the blobs whose file name carries a
//! date inside the range are kept ([`finder`]). [`downloader`] then writes the
//! chosen files to disk.

pub mod cli;
pub mod config;
pub mod console;
pub mod dates;
pub mod downloader;
pub mod finder;
pub mod listing;
pub mod models;
pub mod query;
