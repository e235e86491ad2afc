//! Sequential dispatcher: one pass over the plan, one job at a time.

use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::converter::{Converter, TranscodeJob};
use crate::fs_util::remove_partial;
use crate::placer::{FilePlacement, Placer};
use crate::scan::{BatchPlan, ConversionJob, JobKind};

use super::stats::{JobOutcome, RunStats};
use super::types::{BatchReport, RunOutcome};

/// What happened to one entry of the plan.
#[derive(Debug)]
enum Dispatch {
    Done(JobOutcome),
    Ignored,
    Interrupted,
}

/// Runs a [`BatchPlan`] against a converter and a placer.
///
/// Failures of individual jobs are recorded in the stats and never abort the
/// run. Cancelling the token stops the run at the next job boundary, or
/// immediately when a copy or transcode is in flight (its partial target is
/// removed). A job that fails once the token is cancelled counts as
/// interrupted, not errored.
pub struct BatchRunner<C: Converter, P: Placer> {
    converter: C,
    placer: P,
    cancel: CancellationToken,
}

impl<C: Converter, P: Placer> BatchRunner<C, P> {
    /// Creates a new runner with its own cancellation token.
    pub fn new(converter: C, placer: P) -> Self {
        Self {
            converter,
            placer,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that interrupts this runner when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The converter used for convertible jobs.
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// The placer used for passthrough jobs.
    pub fn placer(&self) -> &P {
        &self.placer
    }

    /// Processes every job of the plan in order and emits the summary.
    pub async fn run(&self, plan: &BatchPlan) -> BatchReport {
        let mut stats = RunStats::new(plan.audio_file_count());
        let mut outcome = RunOutcome::Completed;

        info!(
            "Processing {} audio files with {} / {}",
            stats.total_files,
            self.converter.name(),
            self.placer.name()
        );

        for job in &plan.jobs {
            match self.dispatch(job).await {
                Dispatch::Done(job_outcome) => stats.record(job_outcome),
                Dispatch::Ignored => {}
                Dispatch::Interrupted => {
                    outcome = RunOutcome::Interrupted;
                    break;
                }
            }
        }

        if outcome == RunOutcome::Interrupted {
            info!("Conversion interrupted by user.");
        }
        stats.log_summary();

        BatchReport { stats, outcome }
    }

    async fn dispatch(&self, job: &ConversionJob) -> Dispatch {
        if self.cancel.is_cancelled() {
            return Dispatch::Interrupted;
        }

        let file_name = job.file_name();
        if job.kind == JobKind::Ignored {
            debug!("Ignoring {}", file_name);
            return Dispatch::Ignored;
        }

        match fs::try_exists(&job.target_path).await {
            Ok(true) => {
                info!("Skipping {}, already converted.", file_name);
                return Dispatch::Done(JobOutcome::Skipped);
            }
            Ok(false) => {}
            Err(e) => {
                error!(
                    "Cannot check target {} for {}: {}",
                    job.target_path.display(),
                    file_name,
                    e
                );
                return Dispatch::Done(JobOutcome::Errored { file_name });
            }
        }

        match job.kind {
            JobKind::Passthrough => self.copy(job, file_name).await,
            JobKind::Convertible => self.convert(job, file_name).await,
            JobKind::Ignored => Dispatch::Ignored,
        }
    }

    async fn copy(&self, job: &ConversionJob, file_name: String) -> Dispatch {
        let placement = FilePlacement {
            item_id: file_name.clone(),
            source: job.source_path.clone(),
            destination: job.target_path.clone(),
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                remove_partial(&job.target_path).await;
                Dispatch::Interrupted
            }
            result = self.placer.place(placement) => match result {
                Ok(placed) => {
                    info!("Copied {} ({} bytes)", file_name, placed.size_bytes);
                    Dispatch::Done(JobOutcome::Copied)
                }
                Err(_) if self.cancel.is_cancelled() => {
                    remove_partial(&job.target_path).await;
                    Dispatch::Interrupted
                }
                Err(e) => {
                    error!("Error copying {}: {}", file_name, e);
                    Dispatch::Done(JobOutcome::Errored { file_name })
                }
            },
        }
    }

    async fn convert(&self, job: &ConversionJob, file_name: String) -> Dispatch {
        let transcode = TranscodeJob {
            job_id: file_name.clone(),
            input_path: job.source_path.clone(),
            output_path: job.target_path.clone(),
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                remove_partial(&job.target_path).await;
                Dispatch::Interrupted
            }
            result = self.converter.convert(transcode) => match result {
                Ok(converted) => {
                    info!(
                        "Converted {} to {} in {} ms",
                        file_name,
                        job.target_name(),
                        converted.duration_ms
                    );
                    Dispatch::Done(JobOutcome::Converted)
                }
                // Failed because of the same signal that cancelled us.
                Err(_) if self.cancel.is_cancelled() => {
                    remove_partial(&job.target_path).await;
                    Dispatch::Interrupted
                }
                Err(e) => {
                    error!("Error converting {}: {}", file_name, e);
                    if let Some(stderr) = e.stderr() {
                        warn!(
                            "{} output for {}:\n{}",
                            self.converter.name(),
                            file_name,
                            stderr.trim_end()
                        );
                    }
                    Dispatch::Done(JobOutcome::Errored { file_name })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConverterError;
    use crate::placer::FsPlacer;
    use crate::scan::plan_job;
    use crate::testing::MockConverter;
    use tempfile::TempDir;

    async fn plan_with(files: &[(&str, &str)]) -> (TempDir, BatchPlan) {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("Album");
        let output = input.join("Album_wav");
        fs::create_dir_all(&output).await.unwrap();

        let mut jobs = Vec::new();
        for (name, content) in files {
            let path = input.join(name);
            fs::write(&path, content).await.unwrap();
            jobs.push(plan_job(&path, &output));
        }

        let plan = BatchPlan {
            input_folder: input,
            output_folder: output,
            jobs,
        };
        (temp, plan)
    }

    fn runner() -> BatchRunner<MockConverter, FsPlacer> {
        BatchRunner::new(MockConverter::new(), FsPlacer::with_defaults())
    }

    #[tokio::test]
    async fn test_mixed_folder() {
        let (_temp, plan) =
            plan_with(&[("a.wav", "RIFFa"), ("b.flac", "fLaC"), ("c.txt", "notes")]).await;
        let runner = runner();

        let report = runner.run(&plan).await;

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.stats.total_files, 2);
        assert_eq!(report.stats.checked, 2);
        assert_eq!(report.stats.copied, 1);
        assert_eq!(report.stats.converted, 1);
        assert_eq!(report.stats.skipped, 0);
        assert_eq!(report.stats.errored, 0);
        assert!(plan.output_folder.join("a.wav").exists());
        assert!(plan.output_folder.join("b.wav").exists());
        assert!(!plan.output_folder.join("c.txt").exists());
        assert_eq!(runner.converter().conversion_count().await, 1);
    }

    #[tokio::test]
    async fn test_existing_target_is_skipped_and_untouched() {
        let (_temp, plan) = plan_with(&[("a.wav", "new bytes")]).await;
        let target = plan.output_folder.join("a.wav");
        fs::write(&target, b"old bytes").await.unwrap();

        let report = runner().run(&plan).await;

        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.stats.copied, 0);
        assert_eq!(fs::read(&target).await.unwrap(), b"old bytes");
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (_temp, plan) = plan_with(&[("a.wav", "RIFF"), ("b.flac", "fLaC")]).await;
        let runner = runner();
        runner.cancellation_token().cancel();

        let report = runner.run(&plan).await;

        assert!(report.is_interrupted());
        assert_eq!(report.stats.checked, 0);
        assert_eq!(report.stats.total_files, 2);
        assert!(!plan.output_folder.join("a.wav").exists());
    }

    /// Fails after cancelling, like ffmpeg dying from the user's Ctrl+C.
    struct FailsOnInterrupt {
        cancel: CancellationToken,
    }

    #[async_trait::async_trait]
    impl Converter for FailsOnInterrupt {
        fn name(&self) -> &str {
            "fails-on-interrupt"
        }

        async fn convert(
            &self,
            job: TranscodeJob,
        ) -> Result<crate::converter::TranscodeResult, ConverterError> {
            fs::write(&job.output_path, b"RIF").await?;
            self.cancel.cancel();
            Err(ConverterError::conversion_failed(
                "FFmpeg exited with code: Some(255)",
                Some("Exiting normally, received signal 2.".to_string()),
            ))
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_after_interrupt_is_not_an_error() {
        let (_temp, plan) = plan_with(&[("a.wav", "RIFF"), ("b.flac", "fLaC")]).await;
        let cancel = CancellationToken::new();
        let runner = BatchRunner::new(
            FailsOnInterrupt {
                cancel: cancel.clone(),
            },
            FsPlacer::with_defaults(),
        )
        .with_cancellation(cancel);

        let report = runner.run(&plan).await;

        assert!(report.is_interrupted());
        assert_eq!(report.stats.checked, 1);
        assert_eq!(report.stats.copied, 1);
        assert_eq!(report.stats.errored, 0);
        assert!(report.stats.errored_files.is_empty());
        assert!(!plan.output_folder.join("b.wav").exists());
    }

    #[tokio::test]
    async fn test_converter_failure_is_recorded() {
        let (_temp, plan) = plan_with(&[("b.flac", "fLaC"), ("c.aiff", "FORM")]).await;
        let runner = runner();
        runner.converter().fail_on("b.flac").await;

        let report = runner.run(&plan).await;

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.stats.errored, 1);
        assert_eq!(report.stats.converted, 1);
        assert_eq!(report.stats.errored_files, vec!["b.flac"]);
        assert!(!plan.output_folder.join("b.wav").exists());
        assert!(plan.output_folder.join("c.wav").exists());
        assert!(report.stats.is_consistent());
    }
}
