pub mod oss;
pub mod signing;

use crate::error::OssError;
use async_trait::async_trait;
use std::path::Path;

pub use oss::OssClient;

/// Metadata returned by the connectivity check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketInfo {
    pub name: Option<String>,
    pub location: Option<String>,
    pub storage_class: Option<String>,
}

/// The two bucket operations a deployment needs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch bucket metadata; used to verify credentials and reachability
    async fn bucket_info(&self) -> Result<BucketInfo, OssError>;

    /// Upload a local file to `key`, returning the number of bytes sent
    async fn put_file(&self, key: &str, path: &Path) -> Result<u64, OssError>;

    /// Get store name for logging/debugging
    fn store_name(&self) -> &str;
}

/// `Content-Type` for an uploaded file, chosen from its extension
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
