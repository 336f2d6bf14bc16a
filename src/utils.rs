//! Low-level helpers shared by the decoders: sector reads and bounds-checked
//! field access over byte buffers.

use std::io::{self, Read, Seek, SeekFrom};

use crate::disk::DiskError;

/// Reads a specific sector from a byte source into a buffer.
///
/// # Arguments
///
/// - `source`: A mutable reference to the source to read from.
/// - `sector`: The sector number to read.
/// - `buffer`: The destination; its length is the sector size.
///
/// # Errors
///
/// Returns `DiskError::TruncatedImage` if the source ends before the sector is complete,
/// and `DiskError::Io` for any other read failure.
pub fn read_sector<T: Read + Seek>(
    source: &mut T,
    sector: u64,
    buffer: &mut [u8],
) -> Result<(), DiskError> {
    let offset = sector
        .checked_mul(buffer.len() as u64)
        .ok_or(DiskError::TruncatedImage { sector })?;

    source.seek(SeekFrom::Start(offset))?;

    source.read_exact(buffer).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => DiskError::TruncatedImage { sector },
        _ => DiskError::Io(io::Error::new(
            err.kind(),
            format!("Failed to read sector {sector}: {err}"),
        )),
    })
}

/// Returns the `len` bytes starting at `offset`, or `None` if the buffer is too short.
pub fn bytes_at(buffer: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    buffer.get(offset..offset.checked_add(len)?)
}

/// Extracts a little-endian 16-bit unsigned integer from a buffer at a given offset.
///
/// Returns `None` if the slice does not contain enough bytes starting from the offset.
pub fn u16_at(buffer: &[u8], offset: usize) -> Option<u16> {
    bytes_at(buffer, offset, 2)
        .and_then(|b| b.try_into().ok())
        .map(u16::from_le_bytes)
}

/// Tells whether `magic` appears verbatim at `offset`.
pub fn matches_at(buffer: &[u8], offset: usize, magic: &[u8]) -> bool {
    bytes_at(buffer, offset, magic.len()) == Some(magic)
}
