//! Camera list retrieval, caching and export

pub mod cache;
pub mod export;
pub mod fetcher;

pub use cache::{CacheError, MetadataCache};
pub use export::ExportError;
pub use fetcher::{HttpMetadataSource, MetadataFetchError, MetadataSource, fetch_or_empty};
