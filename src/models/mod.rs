pub mod download;
pub mod hf_cli;
pub mod manifest;
pub mod registry;

pub use download::{fetch_model, FetchOutcome, ModelDownloader};
pub use hf_cli::HfCli;
pub use manifest::{FileEntry, FILES};
pub use registry::{ModelSpec, WHISPER_SMALL};
