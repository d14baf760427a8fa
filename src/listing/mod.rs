//! Blob container listing module
//!
//! Discovers the files published in the Electricity Authority's public blob
//! container. A listing is an XML document returned page by page; each page
//! carries `<Blob>` entries and a `<NextMarker>` pointing at the next page.

pub mod discovery;
pub mod errors;
pub mod markup;
pub mod page;

pub use discovery::{discover, HttpListingClient, ListingTransport};
pub use errors::ListingError;
pub use markup::{extract_all, extract_first};
pub use page::{parse_page, ListingPage};
