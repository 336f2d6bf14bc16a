//! Volume-level inspection of the partitions found in the partition table.
pub mod boot_sector;

pub use boot_sector::{FileSystemGuess, classify_boot_sector, probe};
