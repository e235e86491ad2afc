//! File system placer implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs::FileTimes;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};

use crate::fs_util::remove_partial;

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::traits::Placer;
use super::types::{FilePlacement, PlacedFile};

/// File system based placer implementation.
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Copies a file into a newly created destination, hashing the bytes when asked.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                PlacerError::Io(e)
            }
        })?;

        let dest_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    PlacerError::DestinationExists {
                        path: destination.to_path_buf(),
                    }
                } else {
                    PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
                }
            })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);

        let mut hasher = if calculate_checksum {
            Some(Sha256::new())
        } else {
            None
        };

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let checksum = hasher.map(|h| format!("{:x}", h.finalize()));

        Ok((total_bytes, checksum))
    }

    /// Calculates the SHA-256 checksum of a file.
    async fn calculate_checksum(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path)
            .await
            .map_err(|e| PlacerError::ChecksumCalculationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();
        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::ChecksumCalculationFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Carries access/modification times and permissions over to the copy.
    async fn copy_metadata(&self, source: &Path, destination: &Path) -> Result<(), PlacerError> {
        let metadata_failed = |err: std::io::Error| PlacerError::MetadataFailed {
            path: destination.to_path_buf(),
            source: err,
        };

        let meta = fs::metadata(source).await?;

        let mut times = FileTimes::new();
        if let Ok(accessed) = meta.accessed() {
            times = times.set_accessed(accessed);
        }
        if let Ok(modified) = meta.modified() {
            times = times.set_modified(modified);
        }

        // Times first: a read-only source would make the copy unwritable.
        let dest = OpenOptions::new()
            .write(true)
            .open(destination)
            .await
            .map_err(metadata_failed)?
            .into_std()
            .await;
        tokio::task::spawn_blocking(move || dest.set_times(times))
            .await
            .map_err(|e| metadata_failed(std::io::Error::other(e)))?
            .map_err(metadata_failed)?;

        fs::set_permissions(destination, meta.permissions())
            .await
            .map_err(metadata_failed)?;

        Ok(())
    }

    /// Places a single file without cleanup on failure.
    async fn place_file(&self, placement: &FilePlacement) -> Result<PlacedFile, PlacerError> {
        if !fs::try_exists(&placement.source).await? {
            return Err(PlacerError::SourceNotFound {
                path: placement.source.clone(),
            });
        }

        let (size_bytes, checksum) = self
            .copy_file(
                &placement.source,
                &placement.destination,
                self.config.verify_checksums,
            )
            .await?;

        if self.config.preserve_metadata {
            self.copy_metadata(&placement.source, &placement.destination)
                .await?;
        }

        if let Some(expected) = &checksum {
            let actual = self.calculate_checksum(&placement.destination).await?;
            if &actual != expected {
                return Err(PlacerError::ChecksumMismatch {
                    path: placement.destination.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        Ok(PlacedFile {
            item_id: placement.item_id.clone(),
            destination: placement.destination.clone(),
            size_bytes,
            checksum,
        })
    }
}

#[async_trait]
impl Placer for FsPlacer {
    fn name(&self) -> &str {
        "fs"
    }

    async fn place(&self, placement: FilePlacement) -> Result<PlacedFile, PlacerError> {
        match self.place_file(&placement).await {
            Ok(placed) => Ok(placed),
            Err(e) => {
                if e.may_leave_partial() {
                    remove_partial(&placement.destination).await;
                }
                Err(e)
            }
        }
    }
}
