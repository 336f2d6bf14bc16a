//! Partition type codes found in MBR partition table entries.

use std::fmt::{self, Display};

/// Represents the type of a partition table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PTType {
    Unallocated,
    Extended,
    Ntfs,
    Fat32,
    LBAFat32,
    LBAExtended,
    LinuxSwap,
    Linux,
    GptProtective,
    /// Type code missing from the table above, encapsulating the raw type byte.
    Unknown(u8),
}

impl Display for PTType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PTType::Unallocated => write!(f, "Unallocated"),
            PTType::Extended => write!(f, "Extended"),
            PTType::Ntfs => write!(f, "NTFS"),
            PTType::Fat32 => write!(f, "FAT32"),
            PTType::LBAFat32 => write!(f, "FAT32 LBA"),
            PTType::LBAExtended => write!(f, "Extended LBA"),
            PTType::LinuxSwap => write!(f, "Linux Swap"),
            PTType::Linux => write!(f, "Linux"),
            PTType::GptProtective => write!(f, "GPT Protective"),
            PTType::Unknown(b) => write!(f, "Unknown (0x{:02x})", b),
        }
    }
}

impl PTType {
    /// Creates a `PTType` instance from a raw byte.
    ///
    /// This never fails: codes outside the known table map to `PTType::Unknown(byte)`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => PTType::Unallocated,
            0x05 => PTType::Extended,
            0x07 => PTType::Ntfs,
            0x0B => PTType::Fat32,
            0x0C => PTType::LBAFat32,
            0x0F => PTType::LBAExtended,
            0x82 => PTType::LinuxSwap,
            0x83 => PTType::Linux,
            0xEE => PTType::GptProtective,
            _ => PTType::Unknown(byte),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_labels() {
        assert_eq!(PTType::from_byte(0x07).to_string(), "NTFS");
        assert_eq!(PTType::from_byte(0x83).to_string(), "Linux");
        assert_eq!(PTType::from_byte(0x0C).to_string(), "FAT32 LBA");
        assert_eq!(PTType::from_byte(0xEE).to_string(), "GPT Protective");
        assert_eq!(PTType::from_byte(0x00), PTType::Unallocated);
    }

    #[test]
    fn unknown_code_keeps_raw_byte() {
        assert_eq!(PTType::from_byte(0x99), PTType::Unknown(0x99));
        assert_eq!(PTType::from_byte(0x99).to_string(), "Unknown (0x99)");
        assert_eq!(PTType::from_byte(0x0A).to_string(), "Unknown (0x0a)");
    }

    #[test]
    fn every_byte_classifies() {
        for b in 0..=u8::MAX {
            let label = PTType::from_byte(b).to_string();
            assert!(!label.is_empty());
        }
    }
}
