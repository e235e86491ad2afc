//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::converter::{Converter, ConverterError, TranscodeJob, TranscodeResult};

/// Header written before the simulated conversion delay.
const PARTIAL_BYTES: &[u8] = b"RIFF";
/// Rest of the fake WAV written once the delay has elapsed.
const REMAINING_BYTES: &[u8] = b"\x24\x00\x00\x00WAVEfmt ";

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: TranscodeJob,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Writes a small fake WAV file instead of running ffmpeg. Provides
/// controllable behavior for testing:
/// - Track conversion jobs for assertions
/// - Fail specific files by name
/// - Slow conversions down to exercise cancellation
/// - Report the transcoder as unavailable
///
/// Clones share state, so a test can keep a handle after moving the
/// converter into a runner.
///
/// # Example
///
/// ```rust,ignore
/// use wavbatch_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_on("broken.flac").await;
///
/// let runner = BatchRunner::new(converter.clone(), FsPlacer::with_defaults());
/// let report = runner.run(&plan).await;
///
/// assert_eq!(converter.conversion_count().await, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockConverter {
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Job ids (source file names) that fail.
    failing: Arc<RwLock<HashSet<String>>>,
    /// Simulated conversion duration in milliseconds.
    conversion_duration_ms: Arc<RwLock<u64>>,
    /// Whether `validate` reports the transcoder as missing.
    unavailable: Arc<RwLock<bool>>,
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions attempted.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Make every conversion of the named source file fail.
    pub async fn fail_on(&self, job_id: impl Into<String>) {
        self.failing.write().await.insert(job_id.into());
    }

    /// Set the simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Make `validate` fail as if ffmpeg were not installed.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    async fn record(&self, job: TranscodeJob, success: bool) {
        self.conversions
            .write()
            .await
            .push(RecordedConversion { job, success });
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
        if self.failing.read().await.contains(&job.job_id) {
            self.record(job, false).await;
            return Err(ConverterError::conversion_failed(
                "FFmpeg exited with code: Some(1)",
                Some("Invalid data found when processing input".to_string()),
            ));
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&job.output_path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    ConverterError::OutputExists {
                        path: job.output_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;
        self.record(job.clone(), true).await;

        file.write_all(PARTIAL_BYTES).await?;
        file.flush().await?;

        let duration_ms = *self.conversion_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        file.write_all(REMAINING_BYTES).await?;
        file.flush().await?;

        Ok(TranscodeResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: (PARTIAL_BYTES.len() + REMAINING_BYTES.len()) as u64,
            duration_ms,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if *self.unavailable.read().await {
            return Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            });
        }
        Ok(())
    }
}
