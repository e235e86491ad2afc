//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::fs_util::remove_partial;

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{TranscodeJob, TranscodeResult};

/// FFmpeg-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds ffmpeg arguments for a WAV conversion.
    fn build_args(&self, input_path: &Path, output_path: &Path) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            // Never overwrite output
            "-n".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        args.push(output_path.to_string_lossy().to_string());

        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }

    /// Spawns ffmpeg and waits for it, honouring the configured timeout.
    async fn run_ffmpeg(&self, args: &[String]) -> Result<(ExitStatus, String), ConverterError> {
        let mut command = Command::new(&self.config.ffmpeg_path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group: a terminal Ctrl+C reaches only us, and the
        // child is stopped through cancellation.
        #[cfg(unix)]
        command.process_group(0);
        let mut child = command.spawn().map_err(|e| self.map_spawn_error(e))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConverterError::conversion_failed("stderr was not captured", None))?;

        let finished = async {
            let mut reader = BufReader::new(stderr).lines();
            let mut error_output = String::new();
            while let Some(line) = reader.next_line().await? {
                let line = line.trim();
                if !line.is_empty() {
                    error_output.push_str(line);
                    error_output.push('\n');
                }
            }
            let status = child.wait().await?;
            Ok::<(ExitStatus, String), std::io::Error>((status, error_output))
        };

        let result = match self.config.timeout_secs {
            Some(timeout_secs) => match timeout(Duration::from_secs(timeout_secs), finished).await
            {
                Ok(result) => result.map_err(ConverterError::Io),
                Err(_) => Err(ConverterError::Timeout { timeout_secs }),
            },
            None => finished.await.map_err(ConverterError::Io),
        };

        if result.is_err() {
            let _ = child.kill().await;
        }

        result
    }

    /// Runs the conversion, removing any partial output on failure.
    async fn run_conversion(&self, job: &TranscodeJob) -> Result<TranscodeResult, ConverterError> {
        let start = Instant::now();

        if !fs::try_exists(&job.input_path).await? {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }
        if fs::try_exists(&job.output_path).await? {
            return Err(ConverterError::OutputExists {
                path: job.output_path.clone(),
            });
        }

        let args = self.build_args(&job.input_path, &job.output_path);
        debug!(
            job_id = %job.job_id,
            "Running {} {}",
            self.config.ffmpeg_path.display(),
            args.join(" ")
        );

        let (status, error_output) = match self.run_ffmpeg(&args).await {
            Ok(done) => done,
            Err(e) => {
                remove_partial(&job.output_path).await;
                return Err(e);
            }
        };

        if !status.success() {
            remove_partial(&job.output_path).await;
            return Err(ConverterError::conversion_failed(
                format!("FFmpeg exited with code: {:?}", status.code()),
                if error_output.is_empty() {
                    None
                } else {
                    Some(error_output)
                },
            ));
        }

        // Verify output exists and get size
        let output_meta = fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::conversion_failed("Output file not created", None))?;

        Ok(TranscodeResult {
            job_id: job.job_id.clone(),
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
        self.run_conversion(&job).await
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::conversion_failed(
                "ffmpeg -version failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let converter = FfmpegConverter::with_defaults();
        let args = converter.build_args(Path::new("/in/b.flac"), Path::new("/out/b.wav"));

        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-nostdin",
                "-n",
                "-loglevel",
                "error",
                "-i",
                "/in/b.flac",
                "/out/b.wav",
            ]
        );
    }

    #[test]
    fn test_build_args_extra_before_output() {
        let config = ConverterConfig {
            extra_ffmpeg_args: vec!["-c:a".to_string(), "pcm_s24le".to_string()],
            ..Default::default()
        };
        let converter = FfmpegConverter::new(config);
        let args = converter.build_args(Path::new("/in/c.aiff"), Path::new("/out/c.wav"));

        let n = args.len();
        assert_eq!(&args[n - 3..], &["-c:a", "pcm_s24le", "/out/c.wav"]);
        assert!(!args.contains(&"-y".to_string()));
    }

    fn job_in(dir: &Path, name: &str) -> TranscodeJob {
        TranscodeJob {
            job_id: name.to_string(),
            input_path: dir.join(name),
            output_path: dir.join("out").join(Path::new(name).with_extension("wav")),
        }
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(temp.path(), "b.flac");
        fs::write(&job.input_path, b"fLaC").await.unwrap();

        let converter = FfmpegConverter::new(ConverterConfig::with_ffmpeg_path(
            temp.path().join("no-such-ffmpeg"),
        ));
        let result = converter.convert(job).await;
        assert!(matches!(result, Err(ConverterError::FfmpegNotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_input() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(temp.path(), "gone.flac");

        let converter = FfmpegConverter::with_defaults();
        let result = converter.convert(job).await;
        assert!(matches!(result, Err(ConverterError::InputNotFound { .. })));
    }

    #[tokio::test]
    async fn test_existing_output_is_not_touched() {
        let temp = tempfile::TempDir::new().unwrap();
        let job = job_in(temp.path(), "b.flac");
        fs::write(&job.input_path, b"fLaC").await.unwrap();
        fs::create_dir_all(temp.path().join("out")).await.unwrap();
        fs::write(&job.output_path, b"original").await.unwrap();

        let converter = FfmpegConverter::with_defaults();
        let result = converter.convert(job.clone()).await;
        assert!(matches!(result, Err(ConverterError::OutputExists { .. })));
        assert_eq!(fs::read(&job.output_path).await.unwrap(), b"original");
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use crate::testing::{write_fake_ffmpeg, FakeFfmpeg};
        use tempfile::TempDir;

        async fn setup(behavior: FakeFfmpeg) -> (TempDir, TranscodeJob, ConverterConfig) {
            let temp = TempDir::new().unwrap();
            let job = job_in(temp.path(), "b.flac");
            fs::write(&job.input_path, b"fLaC").await.unwrap();
            fs::create_dir_all(temp.path().join("out")).await.unwrap();
            let ffmpeg = write_fake_ffmpeg(temp.path(), behavior).unwrap();
            (temp, job, ConverterConfig::with_ffmpeg_path(ffmpeg))
        }

        #[tokio::test]
        async fn test_successful_conversion() {
            let (_temp, job, config) = setup(FakeFfmpeg::Succeed).await;
            let converter = FfmpegConverter::new(config);

            let result = converter.convert(job.clone()).await.unwrap();
            assert_eq!(result.job_id, "b.flac");
            assert_eq!(result.output_path, job.output_path);
            assert!(result.output_size_bytes > 0);
            assert!(job.output_path.exists());
        }

        #[tokio::test]
        async fn test_failure_removes_partial_output() {
            let (_temp, job, config) = setup(FakeFfmpeg::Fail).await;
            let converter = FfmpegConverter::new(config);

            let err = converter.convert(job.clone()).await.unwrap_err();
            assert!(matches!(err, ConverterError::ConversionFailed { .. }));
            assert!(err
                .stderr()
                .is_some_and(|s| s.contains("Invalid data found when processing input")));
            assert!(!job.output_path.exists());
        }

        #[tokio::test]
        async fn test_timeout_kills_and_cleans_up() {
            let (_temp, job, config) = setup(FakeFfmpeg::Hang).await;
            let converter = FfmpegConverter::new(config.with_timeout(1));

            let err = converter.convert(job.clone()).await.unwrap_err();
            assert!(matches!(err, ConverterError::Timeout { timeout_secs: 1 }));
            assert!(!job.output_path.exists());
        }

        #[tokio::test]
        async fn test_validate() {
            let (_temp, _job, config) = setup(FakeFfmpeg::Succeed).await;
            let converter = FfmpegConverter::new(config);
            assert!(converter.validate().await.is_ok());
        }
    }
}
