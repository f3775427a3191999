//! Download-to-local seam.
//!
//! A fetcher pipes remote bytes into a local scratch file and only hands
//! back an artifact once the sink finished without error. Partial files
//! are removed, never returned.

mod error;
mod http;
mod traits;
mod types;

pub use error::FetchError;
pub use http::HttpFetcher;
pub use traits::Fetcher;
pub use types::LocalArtifact;
