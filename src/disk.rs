//! Raw disk image access.
//!
//! This module provides the sector reader, the only I/O primitive of the crate,
//! and the error type shared by every layer that reads from a disk image.
pub mod disk_error;
pub mod sector_reader;

pub use disk_error::DiskError;
pub use sector_reader::{SECTOR_SIZE, Sector, SectorReader};
