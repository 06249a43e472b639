use crate::error::{DeployError, Result};
use crate::models::download::ModelDownloader;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use subprocess::{Exec, Redirection};

/// Name of the Hugging Face CLI binary
pub const HF_BINARY: &str = "hf";

/// One-shot installer for the Hugging Face CLI
pub const INSTALL_COMMAND: &str = "curl -LsSf https://hf.co/cli/install.sh | bash";

/// Environment variable that turns the install fallback off
pub const AUTO_INSTALL_ENV: &str = "HF_CLI_AUTO_INSTALL";

/// Downloader backed by the `hf` command-line tool
///
/// The tool is located once on construction. Each download is a single blocking
/// `hf download` invocation whose output goes straight to the terminal.
#[derive(Debug, Clone)]
pub struct HfCli {
    program: PathBuf,
}

impl HfCli {
    /// Locate `hf` on PATH, installing it first if allowed
    ///
    /// # Errors
    /// - Returns error if the binary is missing and auto-install is disabled
    /// - Returns error if the installer fails or the binary is still missing afterwards
    pub fn locate(auto_install: bool) -> Result<Self> {
        if let Ok(program) = which::which(HF_BINARY) {
            tracing::debug!("Found {HF_BINARY} at {}", program.display());
            return Ok(Self { program });
        }

        if !auto_install {
            return Err(DeployError::Tool(format!(
                "`{HF_BINARY}` not found in PATH and {AUTO_INSTALL_ENV} is disabled"
            )));
        }

        println!("⚠️  Hugging Face CLI not installed");
        Self::install()?;

        let program = which::which(HF_BINARY).map_err(|_| {
            DeployError::Tool(format!(
                "installer finished but `{HF_BINARY}` is still not in PATH"
            ))
        })?;

        Ok(Self { program })
    }

    /// Use an explicit binary instead of searching PATH
    #[must_use]
    pub fn with_program(program: PathBuf) -> Self {
        Self { program }
    }

    /// Run the official install script
    fn install() -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Installing Hugging Face CLI...");
        spinner.enable_steady_tick(Duration::from_millis(120));

        let captured = Exec::shell(INSTALL_COMMAND)
            .stdout(Redirection::Pipe)
            .stderr(Redirection::Merge)
            .capture();
        spinner.finish_and_clear();

        let captured = captured
            .map_err(|e| DeployError::Tool(format!("failed to run installer: {e}")))?;

        if !captured.success() {
            let output = captured.stdout_str();
            tracing::debug!("Installer output:\n{output}");
            return Err(DeployError::Tool(format!(
                "installer exited with {:?}: {}",
                captured.exit_status,
                output.trim()
            )));
        }

        println!("✓ Hugging Face CLI installed");
        Ok(())
    }
}

/// Arguments for `hf download`, one `--include` filter per pattern
#[must_use]
pub fn download_args(repo: &str, output_dir: &Path, include: &[&str]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "download".into(),
        repo.into(),
        "--local-dir".into(),
        output_dir.as_os_str().to_owned(),
    ];

    for pattern in include {
        args.push("--include".into());
        args.push((*pattern).into());
    }

    args
}

/// Whether the install fallback is enabled for a raw `HF_CLI_AUTO_INSTALL` value
#[must_use]
pub fn auto_install_enabled(value: Option<&str>) -> bool {
    !matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("0" | "false" | "no" | "off")
    )
}

impl ModelDownloader for HfCli {
    fn download(&self, repo: &str, output_dir: &Path, include: &[&str]) -> Result<()> {
        let args = download_args(repo, output_dir, include);
        let exec = Exec::cmd(&self.program).args(&args[..]);
        println!("   Running: {}", exec.to_cmdline_lossy());

        let status = exec.join().map_err(|e| {
            DeployError::Tool(format!("failed to start {}: {e}", self.program.display()))
        })?;

        if !status.success() {
            return Err(DeployError::Download(format!(
                "`{HF_BINARY} download` exited with {status:?}"
            )));
        }

        Ok(())
    }
}
