//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{TranscodeJob, TranscodeResult};

/// A converter that transcodes an audio file to WAV.
///
/// Implementations must never overwrite an existing output file, and must
/// not leave a partial output behind when they fail. Dropping the future
/// returned by [`Converter::convert`] cancels the conversion.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Converts `job.input_path` into `job.output_path`.
    async fn convert(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct EchoConverter;

    #[async_trait]
    impl Converter for EchoConverter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn convert(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
            Ok(TranscodeResult {
                job_id: job.job_id,
                output_path: job.output_path,
                output_size_bytes: 44,
                duration_ms: 1,
            })
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_converter_as_trait_object() {
        let converter: Box<dyn Converter> = Box::new(EchoConverter);
        let job = TranscodeJob {
            job_id: "b.flac".to_string(),
            input_path: PathBuf::from("/in/b.flac"),
            output_path: PathBuf::from("/out/b.wav"),
        };
        let result = converter.convert(job).await.unwrap();
        assert_eq!(converter.name(), "echo");
        assert_eq!(result.job_id, "b.flac");
        assert_eq!(result.output_path, PathBuf::from("/out/b.wav"));
    }
}
