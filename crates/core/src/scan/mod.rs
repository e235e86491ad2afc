//! Scan module: input resolution, output folder derivation and classification.
//!
//! Everything here runs before the first job is dispatched. Classification
//! is pure; only [`resolve_input`], [`scan_folder`] and [`prepare`] touch the
//! filesystem, and only [`prepare`] writes (the output folder).

mod classify;
mod error;
mod resolve;
mod types;

pub use classify::{classify, plan_job, target_file_name};
pub use error::ResolveError;
pub use resolve::{output_folder, prepare, resolve_input, scan_folder};
pub use types::{
    BatchPlan, ConversionJob, JobKind, Preparation, AUDIO_EXTENSIONS, TARGET_EXTENSION,
};
