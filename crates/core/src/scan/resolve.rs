//! Input folder resolution, output folder derivation and the folder scan.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::config::{OutputConfig, OutputLayout};

use super::classify::plan_job;
use super::error::ResolveError;
use super::types::{BatchPlan, ConversionJob, Preparation};

/// Resolves the input folder to a canonical, existing directory.
///
/// `None` falls back to the current working directory. Symlinks and `..`
/// are resolved by the filesystem, not lexically.
pub async fn resolve_input(path: Option<&Path>) -> Result<PathBuf, ResolveError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let meta = match fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ResolveError::NotFound { path });
        }
        Err(e) => return Err(ResolveError::Io(e)),
    };

    if !meta.is_dir() {
        return Err(ResolveError::NotADirectory { path });
    }

    Ok(fs::canonicalize(&path).await?)
}

/// Derives the output folder for an input folder.
pub fn output_folder(input: &Path, config: &OutputConfig) -> Result<PathBuf, ResolveError> {
    let name = input
        .file_name()
        .ok_or_else(|| ResolveError::NoFolderName {
            path: input.to_path_buf(),
        })?
        .to_string_lossy();
    let folder_name = format!("{}{}", name, config.suffix);

    match config.layout {
        OutputLayout::Nested => Ok(input.join(folder_name)),
        OutputLayout::Sibling => {
            let parent = input.parent().ok_or_else(|| ResolveError::NoFolderName {
                path: input.to_path_buf(),
            })?;
            Ok(parent.join(folder_name))
        }
    }
}

/// Lists the regular files of `input` as jobs targeting `output`, sorted by name.
///
/// Symlinks are followed. Directories (the output folder included), FIFOs,
/// sockets, devices and dangling links are left out.
pub async fn scan_folder(input: &Path, output: &Path) -> Result<Vec<ConversionJob>, ResolveError> {
    let mut entries = fs::read_dir(input).await?;
    let mut jobs = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => jobs.push(plan_job(&path, output)),
            Ok(meta) if meta.is_dir() => debug!("Skipping directory {}", path.display()),
            Ok(_) => debug!("Skipping non-regular file {}", path.display()),
            Err(e) => debug!("Skipping unreadable entry {}: {}", path.display(), e),
        }
    }

    jobs.sort_by(|a, b| a.source_path.file_name().cmp(&b.source_path.file_name()));
    Ok(jobs)
}

/// Resolves the input, scans it and creates the output folder.
///
/// Returns [`Preparation::NothingToDo`] without creating anything when the
/// folder holds no recognized audio files.
pub async fn prepare(
    input: Option<&Path>,
    config: &OutputConfig,
) -> Result<Preparation, ResolveError> {
    let input_folder = resolve_input(input).await?;
    let output_folder = output_folder(&input_folder, config)?;
    info!("Using folder: {}", input_folder.display());

    let jobs = scan_folder(&input_folder, &output_folder).await?;
    if !jobs.iter().any(|j| j.kind.is_audio()) {
        return Ok(Preparation::NothingToDo { input_folder });
    }

    fs::create_dir_all(&output_folder)
        .await
        .map_err(|source| ResolveError::OutputFolder {
            path: output_folder.clone(),
            source,
        })?;
    info!(
        "Converted files will be saved in: {}",
        output_folder.display()
    );

    Ok(Preparation::Ready(BatchPlan {
        input_folder,
        output_folder,
        jobs,
    }))
}
