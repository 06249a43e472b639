use clap::Parser;
use model_oss::config::{StorageConfig, TerminalPrompter};
use model_oss::error::Result;
use model_oss::models::hf_cli::{auto_install_enabled, HfCli, AUTO_INSTALL_ENV};
use model_oss::storage::OssClient;
use model_oss::terminal::TerminalState;
use model_oss::{DeployPlan, DeployReport};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "model-oss", version)]
#[command(about = "Download Whisper Small ONNX files and publish them to Aliyun OSS", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let _cli = Cli::parse();

    println!("{}", "=".repeat(60));
    println!("Whisper Small: one-shot deployment to Aliyun OSS");
    println!("{}", "=".repeat(60));

    let terminal = TerminalState::capture();

    // Prompts and the hf child block their worker thread; Ctrl-C is watched from here
    let deployment = tokio::spawn(run());

    tokio::select! {
        joined = deployment => match joined {
            Ok(Ok(report)) => {
                report.print_summary();
                ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                eprintln!("\n❌ {e}");
                ExitCode::FAILURE
            }
            Err(join_error) => {
                let error = anyhow::Error::new(join_error).context("deployment aborted unexpectedly");
                eprintln!("\n\n❌ Unexpected error: {error:?}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            terminal.restore();
            eprintln!("\n\n⚠️  Interrupted by user");
            // A blocked prompt or child process would otherwise hold the runtime open
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<DeployReport> {
    let plan = DeployPlan::default();
    let auto_install = auto_install_enabled(std::env::var(AUTO_INSTALL_ENV).ok().as_deref());

    plan.run(
        || HfCli::locate(auto_install),
        || StorageConfig::resolve(|key| std::env::var(key).ok(), &mut TerminalPrompter),
        OssClient::connect,
    )
    .await
}
