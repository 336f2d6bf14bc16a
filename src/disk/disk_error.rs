//! Error types for disk image and partition table operations.
//!
//! This module provides error handling for sector reads, MBR signature
//! verification and partition entry decoding.

use std::io;
use std::path::PathBuf;
use thiserror;

/// Represents errors that can occur while reading a disk image or decoding its MBR.
#[derive(thiserror::Error, Debug)]
pub enum DiskError {
    /// The disk image could not be opened or read.
    #[error("I/O error on {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    /// Wraps an I/O error that occurred during a sector read.
    #[error("I/O error: {0}")]
    Io(io::Error),
    /// The requested sector lies beyond the end of the image.
    #[error("Truncated image: sector {sector} lies beyond the end of the image")]
    TruncatedImage { sector: u64 },
    /// Indicates that the boot signature is not valid.
    /// Contains the invalid signature value that was found, read little-endian.
    #[error("Invalid MBR signature: 0x{0:04X}")]
    InvalidSignature(u16),
    /// Parsing error
    #[error("Parsing error: {0}")]
    Parsing(String),
}

/// Converts standard I/O errors into DiskError.
impl From<io::Error> for DiskError {
    fn from(err: io::Error) -> Self {
        DiskError::Io(err)
    }
}

impl From<binread::Error> for DiskError {
    fn from(err: binread::Error) -> Self {
        DiskError::Parsing(err.to_string())
    }
}

impl DiskError {
    /// Attaches the image path to a bare I/O error.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            DiskError::Io(source) => DiskError::Open {
                path: path.into(),
                source,
            },
            other => other,
        }
    }

    /// Short name of the failure kind, used in the one-line CLI error message.
    pub fn kind(&self) -> &'static str {
        match self {
            DiskError::Open { .. } | DiskError::Io(_) => "IoError",
            DiskError::TruncatedImage { .. } => "TruncatedImageError",
            DiskError::InvalidSignature(_) => "InvalidMbrSignature",
            DiskError::Parsing(_) => "ParsingError",
        }
    }
}
