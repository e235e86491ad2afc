pub mod batch;
pub mod config;
pub mod converter;
mod fs_util;
pub mod placer;
pub mod scan;
pub mod testing;

pub use batch::{BatchReport, BatchRunner, JobOutcome, RunOutcome, RunStats};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, OutputConfig,
    OutputLayout,
};
pub use converter::{
    Converter, ConverterConfig, ConverterError, FfmpegConverter, TranscodeJob, TranscodeResult,
};
pub use placer::{FilePlacement, FsPlacer, PlacedFile, Placer, PlacerConfig, PlacerError};
pub use scan::{
    prepare, resolve_input, BatchPlan, ConversionJob, JobKind, Preparation, ResolveError,
    AUDIO_EXTENSIONS,
};
