//! Sector-level access to a raw disk image.

use log::trace;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use super::disk_error::DiskError;
use crate::utils;

/// The size of a sector in bytes.
pub const SECTOR_SIZE: usize = 512;

/// A raw sector.
pub type Sector = [u8; SECTOR_SIZE];

/// Reads fixed-size sectors from a random-access byte source.
///
/// The reader owns its source for the duration of one analysis run.
/// Sectors are never cached, so every read reflects the bytes on disk.
pub struct SectorReader<R> {
    source: R,
}

impl SectorReader<File> {
    /// Opens a disk image file read-only.
    ///
    /// # Errors
    /// - Returns `DiskError::Open` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, DiskError> {
        let file = File::open(path).map_err(|e| DiskError::from(e).with_path(path))?;
        Ok(Self::new(file))
    }
}

impl<R: Read + Seek> SectorReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Reads the sector at logical block address `index`.
    ///
    /// # Returns
    /// - `Ok(Sector)` holding exactly 512 bytes.
    /// - `Err(DiskError::TruncatedImage)` if the image ends before the sector does.
    /// - `Err(DiskError::Io)` on any other read failure.
    pub fn read_sector(&mut self, index: u64) -> Result<Sector, DiskError> {
        trace!("Reading sector {index}");
        let mut buffer = [0u8; SECTOR_SIZE];
        utils::read_sector(&mut self.source, index, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, SeekFrom};

    /// A device that seeks fine but refuses every read.
    struct DeniedDevice;

    impl Read for DeniedDevice {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }
    }

    impl Seek for DeniedDevice {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            match pos {
                SeekFrom::Start(offset) => Ok(offset),
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn reads_each_sector_at_its_offset() {
        let mut image = vec![0u8; 3 * SECTOR_SIZE];
        image[2 * SECTOR_SIZE + 511] = 0x7F;
        let mut reader = SectorReader::new(Cursor::new(image));

        assert_eq!(reader.read_sector(2).unwrap()[511], 0x7F);
        assert_eq!(reader.read_sector(0).unwrap(), [0u8; SECTOR_SIZE]);
    }

    #[test]
    fn short_image_is_truncated() {
        let mut reader = SectorReader::new(Cursor::new(vec![0u8; 100]));

        let err = reader.read_sector(0).unwrap_err();
        assert!(matches!(err, DiskError::TruncatedImage { sector: 0 }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SectorReader::open(Path::new("does/not/exist.dd"))
            .err()
            .unwrap();

        assert!(matches!(err, DiskError::Open { .. }));
        assert!(err.to_string().contains("does/not/exist.dd"));
    }

    #[test]
    fn failed_read_is_io_error() {
        let mut reader = SectorReader::new(DeniedDevice);

        let err = reader.read_sector(3).unwrap_err();

        match &err {
            DiskError::Io(source) => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied)
            }
            other => panic!("expected DiskError::Io, got {other:?}"),
        }
        assert_eq!(err.kind(), "IoError");
    }
}
