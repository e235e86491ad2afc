use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavbatch_core::{
    load_config, prepare, validate_config, BatchRunner, Converter, FfmpegConverter, FsPlacer,
    Preparation, AUDIO_EXTENSIONS,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "wavbatch", version)]
#[command(about = "Convert a folder of FLAC/AIFF/WAV files to WAV")]
struct Cli {
    /// Folder with the audio files (defaults to the current directory)
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Descend into subfolders (not supported, the top level is processed)
    #[arg(short, long)]
    recursive: bool,

    /// TOML configuration file
    #[arg(short, long, env = "WAVBATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long, env = "WAVBATCH_FFMPEG")]
    ffmpeg: Option<PathBuf>,

    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    info!("wavbatch {}", VERSION);

    let mut config = load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load config".to_string(),
    })?;
    if let Some(ffmpeg) = cli.ffmpeg {
        config.converter.ffmpeg_path = ffmpeg;
    }
    validate_config(&config).context("Configuration validation failed")?;

    let cancel = CancellationToken::new();
    let signal_task = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            info!("Interrupt received, stopping...");
            cancel.cancel();
        }
    });

    if cli.recursive {
        warn!("Recursive mode is not supported, only the top level of the folder is processed.");
    }

    let plan = match prepare(cli.folder.as_deref(), &config.output)
        .await
        .context("Cannot prepare input folder")?
    {
        Preparation::Ready(plan) => plan,
        Preparation::NothingToDo { input_folder } => {
            warn!(
                "Folder {} does not contain music files ({}).",
                input_folder.display(),
                AUDIO_EXTENSIONS.join(", ")
            );
            signal_task.abort();
            return Ok(());
        }
    };

    let converter = FfmpegConverter::new(config.converter.clone());
    if plan.has_convertible() {
        if let Err(e) = converter.validate().await {
            warn!(
                "FFmpeg is unavailable ({}); files that need converting will fail.",
                e
            );
        }
    }

    let runner = BatchRunner::new(converter, FsPlacer::new(config.placer.clone()))
        .with_cancellation(cancel);
    runner.run(&plan).await;

    signal_task.abort();
    Ok(())
}

/// Installs the global `tracing` subscriber.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
