mod cli;
mod error;
mod model;
mod plugin;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use tracing_appender::non_blocking::WorkerGuard;

use cli::Cli;
use error::InstallError;
use model::config::AppConfig;
use plugin::PluginInstaller;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let _ = err.print();
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                return ExitCode::SUCCESS;
            }
            if !err.to_string().contains("Usage:") {
                eprintln!("\n{}", Cli::command().render_usage());
            }
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_logging();
    tracing::info!(plugin_type = %cli.plugin_type, "install-plugin starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Install errors already carry their OS cause in the message.
            let message = match err.downcast_ref::<InstallError>() {
                Some(install_err) => install_err.to_string(),
                None => format!("{err:#}"),
            };
            tracing::error!("install failed: {message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = AppConfig::load()?;
    let work_dir = std::env::current_dir().context("cannot determine current directory")?;

    let installer = PluginInstaller::from_config(&config);
    let report = installer.install(&work_dir, cli.plugin_type)?;

    if let Some(err) = &report.cleanup_error {
        // The failing entry may be anywhere below the build output.
        eprintln!("Remove failed");
        eprintln!("{err} - while removing {}", report.source.display());
    }

    tracing::info!(
        plugin = %report.name,
        build = ?report.build,
        replaced = report.replaced_previous,
        files = report.files_copied,
        destination = %report.destination.display(),
        "done"
    );
    Ok(())
}

// Logs go to a file in the data dir, never stdout. Without a usable data dir
// the run continues unlogged.
fn init_logging() -> Option<WorkerGuard> {
    let log_dir = directories::ProjectDirs::from("", "", "install-plugin")
        .map(|d| d.data_dir().to_path_buf())?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "install-plugin.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("install_plugin=info"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    Some(guard)
}
