//! Storage configuration for model-oss
//!
//! Credentials and the bucket are read from `OSS_*` environment variables.
//! When `OSS_ACCESS_KEY_ID` is missing the user is prompted for every mandatory value.
//! Nothing is read from or written to disk.
//!
//! # Example
//!
//! ```no_run
//! use model_oss::config::{StorageConfig, TerminalPrompter};
//!
//! let config = StorageConfig::resolve(|key| std::env::var(key).ok(), &mut TerminalPrompter)
//!     .expect("OSS configuration incomplete");
//! println!("Bucket: {}", config.bucket_name);
//! println!("Region: {}", config.region());
//! ```

pub mod prompt;
pub mod storage;

pub use prompt::{Prompter, TerminalPrompter};
pub use storage::StorageConfig;
