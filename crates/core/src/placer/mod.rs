//! Placer module for copying files that are already in the target format.
//!
//! This module provides the `Placer` trait and a file system implementation
//! that copies a source file byte for byte into the output folder.
//!
//! # Features
//!
//! - Never overwrites: the destination is opened with `create_new`
//! - Permissions and access/modification times carried over to the copy
//! - Optional SHA-256 verification of the written file
//! - Partial destinations removed on failure
//!
//! # Example
//!
//! ```ignore
//! use wavbatch_core::placer::{FilePlacement, FsPlacer, Placer};
//!
//! let placer = FsPlacer::with_defaults();
//! let placed = placer
//!     .place(FilePlacement {
//!         item_id: "a.wav".to_string(),
//!         source: PathBuf::from("/music/album/a.wav"),
//!         destination: PathBuf::from("/music/album/album_wav/a.wav"),
//!     })
//!     .await?;
//! println!("Copied {} bytes", placed.size_bytes);
//! ```

mod config;
mod error;
mod fs_placer;
mod traits;
mod types;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use traits::Placer;
pub use types::{FilePlacement, PlacedFile};
