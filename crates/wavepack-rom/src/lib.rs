//! ES5503 wave ROM builder
//!
//! This crate handles:
//! - Enumerating candidate 8SVX files per priority group
//! - Budgeted, order-preserving sample selection
//! - Packing accepted samples behind the reserved header pages
//! - Rendering the human-readable sample map

pub mod catalog;
pub mod pack;
pub mod pipeline;
pub mod select;

use std::path::PathBuf;
use thiserror::Error;
use wavepack_common::ConfigError;

pub use catalog::{scan_groups, CandidateGroup};
pub use pack::{RomImage, SampleMap};
pub use pipeline::{build, write_outputs, BuildReport};
pub use select::{
    select, AcceptedSample, FsLoader, Selection, SelectionLimits, StopReason, VoiceLoader,
};

#[derive(Error, Debug)]
pub enum RomError {
    #[error("No samples selected")]
    NoSamples,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RomError>;
