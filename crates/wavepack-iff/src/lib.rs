//! IFF/8SVX voice handling for the ES5503 wave ROM builder
//!
//! This crate handles:
//! - Parsing FORM/8SVX containers (VHDR voice header, BODY sample data)
//! - Transcoding signed 8-bit PCM into the ES5503's unsigned domain
//! - Writing voices back out as minimal 8SVX files

pub mod parser;
pub mod transcode;
pub mod writer;

use thiserror::Error;

pub use parser::ParsedVoice;
pub use transcode::{transcode, TranscodedSample, END_MARKER};
pub use writer::encode_8svx;

#[derive(Error, Debug)]
pub enum IffError {
    #[error("Invalid container format: {0}")]
    Format(String),

    #[error("No BODY chunk found")]
    MissingBody,

    #[error("Failed to read container: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IffError>;
