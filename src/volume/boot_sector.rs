//! Shallow file-system identification from a partition's first sector.
//!
//! The probe never reads past the boot sector and never mounts anything:
//! it only matches signature bytes, most specific rule first.

use log::debug;
use std::fmt::{self, Display};
use std::io::{Read, Seek};

use crate::disk::{DiskError, Sector, SectorReader};
use crate::partition::mbr::SIGNATURE_OFFSET;
use crate::partition::PartitionEntry;
use crate::utils;

/// OEM identifier of an NTFS boot sector, at offset 3.
const NTFS_OEM_ID: &[u8] = b"NTFS";
/// Short jumps found at the start of FAT boot sectors.
const FAT_JUMPS: [[u8; 2]; 2] = [[0xEB, 0x3C], [0xEB, 0x58]];
/// File system type label of a FAT boot sector, at offset 0x36.
const FAT32_LABEL: &[u8] = b"FAT32";
const FAT32_LABEL_OFFSET: usize = 0x36;
const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// The file system guessed from a boot sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSystemGuess {
    Ntfs,
    /// The sector carries a valid 0x55AA trailer but no more specific marker.
    GenericBootableSignature,
    Fat32,
    UnknownOrCorrupted,
}

impl Display for FileSystemGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemGuess::Ntfs => write!(f, "File System: NTFS"),
            FileSystemGuess::GenericBootableSignature => {
                write!(f, "Valid boot sector signature found")
            }
            FileSystemGuess::Fat32 => write!(f, "File System: FAT32"),
            FileSystemGuess::UnknownOrCorrupted => {
                write!(f, "Unknown file system or corrupted boot sector")
            }
        }
    }
}

/// Applies the signature rules to a boot sector. The first matching rule wins.
pub fn classify_boot_sector(sector: &Sector) -> FileSystemGuess {
    if utils::matches_at(sector, 3, NTFS_OEM_ID) {
        FileSystemGuess::Ntfs
    } else if utils::matches_at(sector, SIGNATURE_OFFSET, &BOOT_SIGNATURE) {
        FileSystemGuess::GenericBootableSignature
    } else if FAT_JUMPS
        .iter()
        .any(|jmp| utils::matches_at(sector, 0, jmp))
    {
        FileSystemGuess::Fat32
    } else if utils::matches_at(sector, FAT32_LABEL_OFFSET, FAT32_LABEL) {
        FileSystemGuess::Fat32
    } else {
        FileSystemGuess::UnknownOrCorrupted
    }
}

/// Reads the first sector of a partition and guesses its file system.
///
/// # Errors
/// - `DiskError::TruncatedImage` if the image ends before the partition's first sector.
/// - `DiskError::Io` on any other read failure.
pub fn probe<R: Read + Seek>(
    entry: &PartitionEntry,
    reader: &mut SectorReader<R>,
) -> Result<FileSystemGuess, DiskError> {
    let sector = reader.read_sector((*entry.lba_start()).into())?;
    let guess = classify_boot_sector(&sector);
    debug!("Boot sector at LBA {}: {:?}", entry.lba_start(), guess);
    Ok(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::SECTOR_SIZE;
    use std::io::Cursor;

    fn sector() -> Sector {
        [0u8; SECTOR_SIZE]
    }

    #[test]
    fn ntfs_oem_id_wins_without_signature() {
        let mut s = sector();
        s[3..7].copy_from_slice(b"NTFS");

        assert_eq!(classify_boot_sector(&s), FileSystemGuess::Ntfs);

        s[510] = 0x55;
        s[511] = 0xAA;
        assert_eq!(classify_boot_sector(&s), FileSystemGuess::Ntfs);
    }

    #[test]
    fn signature_is_checked_before_fat_jump() {
        let mut s = sector();
        s[0] = 0xEB;
        s[1] = 0x58;
        s[510] = 0x55;
        s[511] = 0xAA;

        assert_eq!(
            classify_boot_sector(&s),
            FileSystemGuess::GenericBootableSignature
        );
    }

    #[test]
    fn fat_jump_codes_without_signature() {
        let mut s = sector();
        s[0] = 0xEB;
        s[1] = 0x3C;
        assert_eq!(classify_boot_sector(&s), FileSystemGuess::Fat32);

        s[1] = 0x58;
        assert_eq!(classify_boot_sector(&s), FileSystemGuess::Fat32);

        s[1] = 0x90;
        assert_eq!(classify_boot_sector(&s), FileSystemGuess::UnknownOrCorrupted);
    }

    #[test]
    fn fat32_label() {
        let mut s = sector();
        s[0x36..0x3B].copy_from_slice(b"FAT32");

        assert_eq!(classify_boot_sector(&s), FileSystemGuess::Fat32);
    }

    #[test]
    fn nothing_matches() {
        let mut s = sector();
        s.iter_mut().for_each(|b| *b = 0xF6);

        assert_eq!(classify_boot_sector(&s), FileSystemGuess::UnknownOrCorrupted);
        assert_eq!(
            FileSystemGuess::UnknownOrCorrupted.to_string(),
            "Unknown file system or corrupted boot sector"
        );
    }

    #[test]
    fn probe_reads_partition_start() {
        let mut image = vec![0u8; 3 * SECTOR_SIZE];
        image[2 * SECTOR_SIZE + 3..2 * SECTOR_SIZE + 7].copy_from_slice(b"NTFS");
        let mut reader = SectorReader::new(Cursor::new(image));

        let guess = probe(&PartitionEntry::new(0x80, 0x07, 2, 1), &mut reader).unwrap();

        assert_eq!(guess, FileSystemGuess::Ntfs);
    }

    #[test]
    fn probe_beyond_image_is_truncated() {
        let mut reader = SectorReader::new(Cursor::new(vec![0u8; SECTOR_SIZE]));

        let err = probe(&PartitionEntry::new(0x00, 0x83, 2048, 100), &mut reader).unwrap_err();

        assert!(matches!(err, DiskError::TruncatedImage { sector: 2048 }));
    }
}
