use crate::config::StorageConfig;
use crate::error::{DeployError, Result};
use crate::models::download::{fetch_model, FetchOutcome, ModelDownloader};
use crate::models::manifest::{FileEntry, FILES};
use crate::models::registry::{ModelSpec, OUTPUT_DIR, REMOTE_PREFIX, WHISPER_SMALL};
use crate::storage::ObjectStore;
use crate::upload::{report_weight_files, upload_manifest, UploadSummary};
use std::path::PathBuf;

/// Everything fixed about one deployment
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub model: ModelSpec,
    pub output_dir: PathBuf,
    pub remote_prefix: String,
    pub files: Vec<FileEntry>,
}

impl Default for DeployPlan {
    fn default() -> Self {
        Self {
            model: WHISPER_SMALL,
            output_dir: PathBuf::from(OUTPUT_DIR),
            remote_prefix: REMOTE_PREFIX.to_string(),
            files: FILES.to_vec(),
        }
    }
}

/// Result of a completed deployment
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub fetch: FetchOutcome,
    pub uploads: UploadSummary,
    pub region: String,
    /// `https://<bucket>.<endpoint>/<prefix>`
    pub base_url: String,
}

impl DeployPlan {
    /// Run fetch, configure and upload in order, stopping at the first fatal error
    ///
    /// `locate` is only called when a download is needed. `connect` receives the
    /// resolved configuration and builds the store that is checked and uploaded to.
    pub async fn run<D, S, L, R, C>(&self, locate: L, resolve: R, connect: C) -> Result<DeployReport>
    where
        D: ModelDownloader,
        S: ObjectStore,
        L: FnOnce() -> Result<D>,
        R: FnOnce() -> Result<StorageConfig>,
        C: FnOnce(&StorageConfig) -> Result<S>,
    {
        println!("\n[Step 1/3] Download model files");
        println!("{}", "-".repeat(60));
        println!("Model: {} ({})", self.model.hf_repo, self.model.description);
        println!("Output directory: {}", self.output_dir.display());

        let fetch = fetch_model(&self.model, &self.output_dir, &self.files, locate)?;

        println!("\n[Step 2/3] Configure Aliyun OSS");
        println!("{}", "-".repeat(60));
        let config = resolve()?;
        let region = config.region();
        tracing::info!(
            "Using bucket {} at {} (region {region})",
            config.bucket_name,
            config.endpoint
        );

        let store = connect(&config)?;
        println!("🔍 Testing OSS connection...");
        let info = store
            .bucket_info()
            .await
            .map_err(DeployError::Connectivity)?;
        let bucket = info.name.as_deref().unwrap_or(&config.bucket_name);
        match (&info.location, &info.storage_class) {
            (Some(location), Some(class)) => {
                println!("   ✓ Connected to {bucket} ({location}, {class})");
            }
            (Some(location), None) => println!("   ✓ Connected to {bucket} ({location})"),
            _ => println!("   ✓ Connected to {bucket}"),
        }
        tracing::debug!("Bucket info from {}: {info:?}", store.store_name());

        println!("\n[Step 3/3] Upload files to OSS");
        println!("{}", "-".repeat(60));
        report_weight_files(&self.output_dir);
        let uploads =
            upload_manifest(&store, &self.files, &self.output_dir, &self.remote_prefix).await?;

        println!("\n✓ Upload finished: {} file(s)", uploads.uploaded);
        if uploads.failed > 0 {
            println!("⚠️  Failed: {} optional file(s)", uploads.failed);
        }

        Ok(DeployReport {
            fetch,
            uploads,
            region,
            base_url: format!("{}/{}", config.public_base_url(), self.remote_prefix),
        })
    }
}

impl DeployReport {
    /// Print the closing summary with the public URLs
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("🎉 Deployment complete!");
        println!("{}", "=".repeat(60));
        println!("\n📁 Model files uploaded to OSS:");
        println!("   Base URL:    {}", self.base_url);
        println!("   Example:     {}config.json", self.base_url);
        println!("   Region:      {}", self.region);
        println!(
            "   Uploaded:    {} file(s), {} failed, {} skipped",
            self.uploads.uploaded, self.uploads.failed, self.uploads.skipped
        );
        println!("\n🚀 Next steps:");
        println!("   1. Make sure the bucket has CORS enabled for the web app origin");
        println!("   2. Point the app's model base URL at the address above");
        println!("   3. Restart the dev server and check the browser console for model loading");
        println!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = DeployPlan::default();
        assert_eq!(plan.model.hf_repo, "onnx-community/whisper-small");
        assert_eq!(plan.output_dir, PathBuf::from("./models/whisper-small"));
        assert_eq!(plan.remote_prefix, "models/onnx-community/whisper-small/");
        assert_eq!(plan.files.len(), 9);
    }
}
