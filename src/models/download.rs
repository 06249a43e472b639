use crate::error::{DeployError, Result};
use crate::models::manifest::{include_patterns, FileEntry};
use crate::models::registry::ModelSpec;
use std::fs;
use std::path::Path;

/// Headroom required on top of the model size
const DISK_BUFFER_MB: u64 = 100;

/// Something that can pull a filtered set of files from a hub repository
pub trait ModelDownloader {
    /// Download the files matching `include` from `repo` into `output_dir`
    fn download(&self, repo: &str, output_dir: &Path, include: &[&str]) -> Result<()>;
}

/// What the fetch stage did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The directory already had content, nothing was downloaded
    AlreadyPresent,
    Downloaded,
}

/// True if `dir` exists and has at least one entry
pub fn is_populated(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }

    Ok(fs::read_dir(dir)?.next().is_some())
}

/// Make sure the model files are staged in `output_dir`
///
/// A non-empty `output_dir` is trusted as-is and `locate` is never called. Otherwise
/// the downloader is located, disk space is checked and only the manifest files are
/// requested.
pub fn fetch_model<D, F>(
    model: &ModelSpec,
    output_dir: &Path,
    files: &[FileEntry],
    locate: F,
) -> Result<FetchOutcome>
where
    D: ModelDownloader,
    F: FnOnce() -> Result<D>,
{
    if is_populated(output_dir)? {
        println!("   ⏭️  Model directory already exists, skipping download");
        println!(
            "   💡 To download again, delete the directory: {}",
            output_dir.display()
        );
        tracing::info!("Skipping download, {} is not empty", output_dir.display());
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let downloader = locate()?;

    fs::create_dir_all(output_dir)?;
    check_disk_space(output_dir, model.size_mb)?;

    let include = include_patterns(files);
    println!("   Files: {}", include.join(", "));
    tracing::info!(
        "Downloading {} file(s) of {} into {}",
        include.len(),
        model.hf_repo,
        output_dir.display()
    );

    downloader.download(model.hf_repo, output_dir, &include)?;

    println!("   ✓ Model downloaded to {}", output_dir.display());
    Ok(FetchOutcome::Downloaded)
}

/// Check that the filesystem holding `dir` has room for `required_mb` plus a buffer
pub fn check_disk_space(dir: &Path, required_mb: u64) -> Result<()> {
    let stats = nix::sys::statvfs::statvfs(dir)
        .map_err(|e| DeployError::Other(format!("Failed to check disk space: {e}")))?;

    #[allow(clippy::useless_conversion)]
    let available_bytes = u64::from(stats.blocks_available()) * u64::from(stats.fragment_size());
    let required_with_buffer = (required_mb + DISK_BUFFER_MB) * 1_024 * 1_024;

    if available_bytes < required_with_buffer {
        return Err(DeployError::DiskSpace {
            required_mb: required_with_buffer / (1_024 * 1_024),
            available_mb: available_bytes / (1_024 * 1_024),
        });
    }

    Ok(())
}

/// Format bytes as human-readable string
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const TEST_MODEL: ModelSpec = ModelSpec {
        hf_repo: "test-org/test-model",
        size_mb: 0,
        description: "test",
    };

    const TEST_FILES: &[FileEntry] = &[FileEntry {
        local_path: "config.json",
        remote_path: "config.json",
        required: true,
        description: "config",
    }];

    #[derive(Default)]
    struct RecordingDownloader {
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl ModelDownloader for &RecordingDownloader {
        fn download(&self, repo: &str, output_dir: &Path, include: &[&str]) -> Result<()> {
            self.calls.borrow_mut().push((
                repo.to_string(),
                include.iter().map(ToString::to_string).collect(),
            ));
            fs::write(output_dir.join("config.json"), "{}")?;
            Ok(())
        }
    }

    struct FailingDownloader;

    impl ModelDownloader for FailingDownloader {
        fn download(&self, _: &str, _: &Path, _: &[&str]) -> Result<()> {
            Err(DeployError::Download("exit 1".to_string()))
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
        assert_eq!(format_bytes(1_610_612_736), "1.50 GB");
    }

    #[test]
    fn test_is_populated() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(!is_populated(&missing).unwrap());
        assert!(!is_populated(temp_dir.path()).unwrap());

        fs::write(temp_dir.path().join("anything"), "x").unwrap();
        assert!(is_populated(temp_dir.path()).unwrap());
    }

    #[test]
    fn test_populated_dir_skips_download() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("stale.txt"), "x").unwrap();

        let outcome = fetch_model::<FailingDownloader, _>(
            &TEST_MODEL,
            temp_dir.path(),
            TEST_FILES,
            || panic!("downloader must not be located for a populated directory"),
        )
        .unwrap();

        assert_eq!(outcome, FetchOutcome::AlreadyPresent);
    }

    #[test]
    fn test_empty_dir_downloads_manifest_only() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("model");
        let recorder = RecordingDownloader::default();

        let outcome =
            fetch_model(&TEST_MODEL, &output_dir, TEST_FILES, || Ok(&recorder)).unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded);
        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "test-org/test-model");
        assert_eq!(calls[0].1, vec!["config.json".to_string()]);
        assert!(output_dir.join("config.json").exists());
    }

    #[test]
    fn test_download_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("model");

        let err = fetch_model(&TEST_MODEL, &output_dir, TEST_FILES, || {
            Ok(FailingDownloader)
        })
        .unwrap_err();
        assert!(matches!(err, DeployError::Download(_)));
    }

    #[test]
    fn test_locate_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();

        let err = fetch_model::<FailingDownloader, _>(&TEST_MODEL, temp_dir.path(), TEST_FILES, || {
            Err(DeployError::Tool("hf missing".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, DeployError::Tool(_)));
    }

    #[test]
    fn test_disk_space_impossible_requirement() {
        let temp_dir = TempDir::new().unwrap();
        let err = check_disk_space(temp_dir.path(), u64::MAX / (2 * 1_024 * 1_024)).unwrap_err();
        assert!(matches!(err, DeployError::DiskSpace { .. }));
    }
}
