//! Converter module for transcoding audio files to WAV.
//!
//! This module provides the `Converter` trait and an implementation that
//! drives an external `ffmpeg` binary as a black box: the source is passed
//! with `-i`, the target path is the last argument, and the exit status plus
//! stderr are the only failure signal.
//!
//! # Guarantees
//!
//! - An existing output file is never overwritten (`-n`, plus a pre-check)
//! - A failed or timed out conversion leaves no partial output behind
//! - Dropping the conversion future kills the ffmpeg child
//!
//! # Example
//!
//! ```ignore
//! use wavbatch_core::converter::{Converter, FfmpegConverter, TranscodeJob};
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let result = converter
//!     .convert(TranscodeJob {
//!         job_id: "b.flac".to_string(),
//!         input_path: PathBuf::from("/music/album/b.flac"),
//!         output_path: PathBuf::from("/music/album/album_wav/b.wav"),
//!     })
//!     .await?;
//! println!("Converted in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{TranscodeJob, TranscodeResult};
