//! This module provides functionality for parsing the Master Boot Record (MBR)
//! of a raw disk image.
//!
//! It decodes the four primary partition table entries, verifies the boot
//! signature, and flags entries whose metadata is inconsistent. Every slot is
//! kept, including unallocated and anomalous ones: dropping them would hide
//! evidence of tampering.
use binread::{BinRead, BinReaderExt};
use getset::Getters;
use log::{debug, warn};
use std::fmt::Write;
use std::fmt::{self, Display};
use std::io::Cursor;

use super::pt_type::PTType;
use crate::disk::{DiskError, SECTOR_SIZE, Sector};
use crate::traits::LayoutDisplay;
use crate::utils;

/// The number of primary partitions supported by MBR.
pub const PART_CNT: usize = 4;

/// Byte offset of the partition table inside the MBR.
pub const PT_OFFSET: usize = 446;

/// Size in bytes of one partition table entry.
pub const PT_ENTRY_SIZE: usize = 16;

/// Byte offset of the boot signature inside a boot sector.
pub const SIGNATURE_OFFSET: usize = 510;

/// The boot signature `0x55 0xAA` read as a little-endian `u16`.
pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Status byte of an active (bootable) partition.
pub const STATUS_ACTIVE: u8 = 0x80;

/// Represents a single partition table entry, decoded field by field in little-endian.
#[derive(BinRead, Debug, Clone, PartialEq, Eq, Getters)]
#[br(little)]
pub struct PartitionEntry {
    /// 0x80 for an active partition, conventionally 0x00 otherwise.
    #[get = "pub"]
    status: u8,
    /// Legacy CHS address of the first sector. LBA is authoritative.
    #[get = "pub"]
    chs_start: [u8; 3],
    /// Raw partition type code.
    #[get = "pub"]
    type_code: u8,
    /// Legacy CHS address of the last sector.
    #[get = "pub"]
    chs_end: [u8; 3],
    /// The starting Logical Block Address (LBA) of the partition.
    #[get = "pub"]
    lba_start: u32,
    /// The number of sectors in the partition.
    #[get = "pub"]
    sector_count: u32,
}

impl PartitionEntry {
    /// Builds an entry from its meaningful fields, with zeroed CHS addresses.
    pub fn new(status: u8, type_code: u8, lba_start: u32, sector_count: u32) -> Self {
        Self {
            status,
            chs_start: [0; 3],
            type_code,
            chs_end: [0; 3],
            lba_start,
            sector_count,
        }
    }

    /// Size of the partition in MiB. For display only.
    pub fn size_mb(&self) -> f64 {
        (self.sector_count as f64 * SECTOR_SIZE as f64) / (1024.0 * 1024.0)
    }

    pub fn pt_type(&self) -> PTType {
        PTType::from_byte(self.type_code)
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    /// An entry is allocated when its type code is non-zero.
    pub fn is_allocated(&self) -> bool {
        self.type_code != 0x00
    }

    /// Serializes the entry back to its 16-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; PT_ENTRY_SIZE] {
        let mut raw = [0u8; PT_ENTRY_SIZE];
        raw[0] = self.status;
        raw[1..4].copy_from_slice(&self.chs_start);
        raw[4] = self.type_code;
        raw[5..8].copy_from_slice(&self.chs_end);
        raw[8..12].copy_from_slice(&self.lba_start.to_le_bytes());
        raw[12..16].copy_from_slice(&self.sector_count.to_le_bytes());
        raw
    }

    /// Checks the entry for inconsistent metadata.
    ///
    /// `slot` is the 1-based position of the entry in the partition table.
    fn check(&self, slot: usize) -> Vec<IntegrityWarning> {
        let mut warnings = vec![];

        if self.lba_start == 0 && self.sector_count > 0 {
            warnings.push(IntegrityWarning::StartsAtMbr { slot });
        }
        if self.sector_count == 0 && self.type_code != 0x00 {
            warnings.push(IntegrityWarning::EmptyTypedPartition {
                slot,
                type_code: self.type_code,
            });
        }
        if self.status != 0x00 && self.status != STATUS_ACTIVE {
            warnings.push(IntegrityWarning::UnusualStatus {
                slot,
                status: self.status,
            });
        }

        warnings
    }
}

/// A non-fatal anomaly found in one partition table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// The partition claims to start on the MBR's own sector.
    StartsAtMbr { slot: usize },
    /// The partition has a real type but occupies no sectors.
    EmptyTypedPartition { slot: usize, type_code: u8 },
    /// The status byte is neither 0x00 nor 0x80.
    UnusualStatus { slot: usize, status: u8 },
}

impl IntegrityWarning {
    /// The 1-based partition table slot the warning concerns.
    pub fn slot(&self) -> usize {
        match *self {
            IntegrityWarning::StartsAtMbr { slot }
            | IntegrityWarning::EmptyTypedPartition { slot, .. }
            | IntegrityWarning::UnusualStatus { slot, .. } => slot,
        }
    }
}

impl Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::StartsAtMbr { .. } => {
                write!(f, "LBA start is 0 but sector count > 0")
            }
            IntegrityWarning::EmptyTypedPartition { .. } => {
                write!(f, "Sector count is 0 but partition type is not unallocated")
            }
            IntegrityWarning::UnusualStatus { status, .. } => {
                write!(f, "Unusual status byte 0x{status:02x} (expected 0x00 or 0x80)")
            }
        }
    }
}

/// Represents a decoded Master Boot Record (MBR): the four partition table
/// entries, in slot order, and the anomalies found in them.
#[derive(Debug, Getters)]
pub struct Mbr {
    /// The partition table entries in the MBR, always all four of them.
    #[get = "pub"]
    pt_entries: [PartitionEntry; PART_CNT],
    /// Anomalies found while decoding, in slot order.
    #[get = "pub"]
    warnings: Vec<IntegrityWarning>,
}

impl Mbr {
    /// Decodes sector 0 of a disk image as an MBR.
    ///
    /// # Returns
    /// - `Ok(Mbr)` with exactly four entries whenever the boot signature is valid.
    /// - `Err(DiskError::InvalidSignature)` if bytes 510-511 are not `0x55 0xAA`.
    ///   Nothing else is decoded in that case.
    pub fn decode(sector: &Sector) -> Result<Mbr, DiskError> {
        let sig = utils::u16_at(sector, SIGNATURE_OFFSET)
            .ok_or_else(|| DiskError::Parsing("MBR too short for its signature".into()))?;
        if sig != BOOT_SIGNATURE {
            return Err(DiskError::InvalidSignature(sig));
        }

        let mut entries = Vec::with_capacity(PART_CNT);
        let mut warnings = vec![];
        for i in 0..PART_CNT {
            let offset = PT_OFFSET + i * PT_ENTRY_SIZE;
            let raw = utils::bytes_at(sector, offset, PT_ENTRY_SIZE).ok_or_else(|| {
                DiskError::Parsing(format!("Partition entry #{} out of bounds", i + 1))
            })?;
            let entry: PartitionEntry = Cursor::new(raw).read_le()?;
            debug!("Slot {}: {:?}", i + 1, entry);

            for warning in entry.check(i + 1) {
                warn!("Partition {}: {}", i + 1, warning);
                warnings.push(warning);
            }
            entries.push(entry);
        }

        let pt_entries: [PartitionEntry; PART_CNT] = entries
            .try_into()
            .map_err(|_| DiskError::Parsing("Partition table is not 4 entries long".into()))?;

        Ok(Mbr {
            pt_entries,
            warnings,
        })
    }

    /// Returns the allocated entries (non-zero type code) with their 1-based slot,
    /// in slot order. The full table stays available through `pt_entries`.
    pub fn allocated(&self) -> Vec<(usize, &PartitionEntry)> {
        self.pt_entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_allocated())
            .map(|(i, entry)| (i + 1, entry))
            .collect()
    }

    /// Returns the warnings attached to a 1-based slot.
    pub fn warnings_for(&self, slot: usize) -> impl Iterator<Item = &IntegrityWarning> {
        self.warnings.iter().filter(move |w| w.slot() == slot)
    }
}

/// Renders every partition table slot with its inline warnings.
impl LayoutDisplay for Mbr {
    fn display_layout(&self, indent: u8) -> Result<String, fmt::Error> {
        let mut out = String::new();
        let indent = " ".repeat(indent.into());

        for (i, entry) in self.pt_entries.iter().enumerate() {
            let slot = i + 1;
            let active = if entry.is_active() { " (Active)" } else { "" };

            writeln!(out, "{indent}Partition {slot}:")?;
            writeln!(out, "{indent}  Status: 0x{:02x}{active}", entry.status)?;
            writeln!(
                out,
                "{indent}  Type: 0x{:02x} ({})",
                entry.type_code,
                entry.pt_type()
            )?;
            writeln!(out, "{indent}  LBA Start: {}", entry.lba_start)?;
            writeln!(out, "{indent}  Sector Count: {}", entry.sector_count)?;
            writeln!(out, "{indent}  Size: {:.2} MB", entry.size_mb())?;
            for warning in self.warnings_for(slot) {
                writeln!(out, "{indent}  WARNING: {warning}")?;
            }
            writeln!(out)?;
        }

        Ok(out)
    }
}
