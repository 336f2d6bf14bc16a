//!
//! MBRForensics: A library and CLI for triaging the partition table of raw disk images.
//!
//! This crate provides tools for:
//! - Reading 512-byte sectors from a raw disk image
//! - Decoding the Master Boot Record (MBR) and flagging inconsistent partition entries
//! - Classifying partition type codes
//! - Guessing the file system of a partition from its boot sector signature
//! - Rendering a deterministic findings report to any writer
//!
//! # Re-exports
//! - [`Mbr`]: decoded Master Boot Record
//! - [`SectorReader`]: sector-level access to a disk image
//! - [`Analysis`]: one analysis run over a disk image

pub mod analysis;
pub mod disk;
pub mod partition;
pub mod registry;
pub mod traits;
pub mod utils;
pub mod volume;

/// One analysis run over a disk image (see [`analysis::report::Analysis`]).
pub use crate::analysis::Analysis;
/// Sector-level access to a disk image (see [`disk::sector_reader::SectorReader`]).
pub use crate::disk::SectorReader;
/// Decoded Master Boot Record (see [`partition::mbr::Mbr`]).
pub use crate::partition::Mbr;
