//! This module provides functionality for parsing and handling partition tables
//! and Master Boot Records (MBR).
//!
//! It defines structures to interpret partition table entries, classify their
//! type codes, and report inconsistencies found in the table.
pub mod mbr;
pub mod pt_type;

pub use mbr::{IntegrityWarning, Mbr, PART_CNT, PartitionEntry};
pub use pt_type::PTType;
