//! The fixed 2048-byte slot directory at file offset 0.
//!
//! 256 consecutive `(bucket_offset: u32 LE, bucket_length: u32 LE)` entries,
//! one per possible hash low byte. `bucket_length` counts slots, not bytes.

use crate::error::{CdbError, Result};
use crate::positional::PositionalRead;
use std::io::{self, Write};

use super::{DIRECTORY_SIZE, NUM_BUCKETS};

/// One slot-directory entry: where a bucket's slot array starts, and how
/// many slots it has.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub bucket_offset: u32,
    pub bucket_length: u32,
}

/// Read the 2048-byte slot directory from offset 0 of `source`.
///
/// Fails with [`CdbError::CorruptHeader`] if fewer than 2048 bytes are
/// available at the start of the file.
pub fn read_directory(source: &impl PositionalRead) -> Result<[DirectoryEntry; NUM_BUCKETS]> {
    let mut buf = [0u8; DIRECTORY_SIZE];
    source
        .read_exact_at(&mut buf, 0)
        .map_err(|_| CdbError::CorruptHeader)?;

    let mut entries = [DirectoryEntry::default(); NUM_BUCKETS];
    for (i, entry) in entries.iter_mut().enumerate() {
        let base = i * 8;
        entry.bucket_offset = u32::from_le_bytes(buf[base..base + 4].try_into().unwrap());
        entry.bucket_length = u32::from_le_bytes(buf[base + 4..base + 8].try_into().unwrap());
    }
    Ok(entries)
}

/// Encode `entries` into the 2048-byte on-disk directory layout.
pub fn encode_directory(entries: &[DirectoryEntry; NUM_BUCKETS]) -> [u8; DIRECTORY_SIZE] {
    let mut buf = [0u8; DIRECTORY_SIZE];
    for (i, entry) in entries.iter().enumerate() {
        let base = i * 8;
        buf[base..base + 4].copy_from_slice(&entry.bucket_offset.to_le_bytes());
        buf[base + 4..base + 8].copy_from_slice(&entry.bucket_length.to_le_bytes());
    }
    buf
}

/// Write `entries` as the 2048-byte slot directory, starting at `sink`'s
/// current position (callers are expected to have seeked to offset 0).
pub fn write_directory(sink: &mut impl Write, entries: &[DirectoryEntry; NUM_BUCKETS]) -> io::Result<()> {
    sink.write_all(&encode_directory(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn round_trips_through_a_real_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let mut entries = [DirectoryEntry::default(); NUM_BUCKETS];
        entries[0] = DirectoryEntry {
            bucket_offset: 2048,
            bucket_length: 4,
        };
        entries[255] = DirectoryEntry {
            bucket_offset: 4096,
            bucket_length: 8,
        };
        write_directory(&mut tmp, &entries).unwrap();
        tmp.flush().unwrap();

        let file = tmp.reopen().unwrap();
        let decoded = read_directory(&file).unwrap();
        assert_eq!(decoded[0], entries[0]);
        assert_eq!(decoded[255], entries[255]);
        assert_eq!(decoded[1], DirectoryEntry::default());
    }

    #[test]
    fn short_file_is_corrupt_header() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0u8; 100]).unwrap();
        tmp.flush().unwrap();
        let file = tmp.reopen().unwrap();
        let err = read_directory(&file).unwrap_err();
        assert!(matches!(err, CdbError::CorruptHeader));
    }

    #[test]
    fn all_zero_directory_decodes_to_empty_buckets() {
        let entries = [DirectoryEntry::default(); NUM_BUCKETS];
        let encoded = encode_directory(&entries);
        assert_eq!(encoded, [0u8; DIRECTORY_SIZE]);
    }
}
