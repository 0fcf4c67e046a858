// src/store/mod.rs

pub mod cache;
pub mod http;
pub mod memory;

use std::future::Future;

use crate::error::FetchError;
use crate::record::RecordSet;

pub use cache::CachedSource;
pub use http::HttpRecordSource;
pub use memory::MemorySource;

/// Anything that can produce the full record set.
///
/// Callers invoke it once per interaction rather than holding on to an
/// earlier set. Any caching lives behind this trait.
pub trait RecordSource: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<RecordSet, FetchError>> + Send;
}
