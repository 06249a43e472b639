use crate::error::{DeployError, Result};
use crate::models::download::format_bytes;
use crate::models::manifest::{FileEntry, WEIGHTS_DIR};
use crate::storage::ObjectStore;
use std::fs;
use std::io;
use std::path::Path;

/// Counters for one upload pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    /// Failed uploads of optional files (required failures abort instead)
    pub failed: usize,
    /// Optional files that were not present locally
    pub skipped: usize,
}

/// A weight file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightFile {
    pub name: String,
    pub size_bytes: u64,
}

/// `*.onnx` files in the weights subdirectory, sorted by name
///
/// A missing weights directory is an empty listing; anything else that stops
/// the directory from being read is an error.
pub fn list_weight_files(model_dir: &Path) -> Result<Vec<WeightFile>> {
    let weights_dir = model_dir.join(WEIGHTS_DIR);
    let entries = match fs::read_dir(&weights_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "onnx") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(WeightFile {
                    name: name.to_string(),
                    size_bytes: entry.metadata().map_or(0, |m| m.len()),
                });
            }
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Print what the download left in the weights directory
///
/// Informational only: a listing failure is logged and the count is 0.
pub fn report_weight_files(model_dir: &Path) -> usize {
    println!("\n📋 Checking downloaded files...");
    let files = match list_weight_files(model_dir) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("Could not list {}: {e}", model_dir.join(WEIGHTS_DIR).display());
            println!("   ⚠️  Could not list ONNX files, continuing");
            return 0;
        }
    };
    if files.is_empty() {
        return 0;
    }

    println!("   Found {} ONNX file(s):", files.len());
    for file in &files {
        println!("     - {} ({})", file.name, format_bytes(file.size_bytes));
    }

    files.len()
}

/// Upload every manifest entry found under `model_dir` to `<prefix><remote_path>`
///
/// Entries are processed in order. A missing or failed required file aborts the
/// pass immediately; optional files are skipped or counted as failed.
pub async fn upload_manifest<S>(
    store: &S,
    files: &[FileEntry],
    model_dir: &Path,
    prefix: &str,
) -> Result<UploadSummary>
where
    S: ObjectStore + ?Sized,
{
    let mut summary = UploadSummary::default();

    for entry in files {
        let local = entry.local_file(model_dir);
        let key = entry.remote_key(prefix);

        if !local.exists() {
            if entry.required {
                return Err(DeployError::MissingFile(local));
            }
            println!("\n⚠️  Optional file missing, skipping: {}", entry.local_path);
            tracing::warn!("Optional file {} not found", local.display());
            summary.skipped += 1;
            continue;
        }

        println!("\n📤 Uploading: {} ({})", entry.local_path, entry.description);
        println!("   OSS key: {key}");

        match store.put_file(&key, &local).await {
            Ok(bytes) => {
                println!("   ✓ Uploaded {}", format_bytes(bytes));
                tracing::info!("Uploaded {} to {key} via {}", local.display(), store.store_name());
                summary.uploaded += 1;
            }
            Err(source) => {
                summary.failed += 1;
                if entry.required {
                    return Err(DeployError::Upload { key, source });
                }
                println!("   ✗ Failed: {source}");
                tracing::warn!("Optional upload of {key} failed: {source}");
            }
        }
    }

    Ok(summary)
}
