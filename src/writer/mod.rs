//! The CDB writer: streams records to a file and materializes the
//! two-level hash index on [`Writer::finish`].
//!
//! Translated from the append/finalize halves of D. J. Bernstein's
//! `cdb_make.c`: `cdb_make_start` reserves the header, `cdb_make_add`
//! appends a record and records a `(hash, offset)` pointer, and
//! `cdb_make_finish` regroups the pointers by bucket and emits the slot
//! tables followed by the patched directory.

mod finalize;

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::codec::{NUM_BUCKETS, DIRECTORY_SIZE};
use crate::error::{CdbError, Result};
use crate::hash;
use crate::notify;

/// Offset of the first record, immediately after the reserved slot directory.
pub const RECORD_REGION_START: u64 = DIRECTORY_SIZE as u64;

/// A single (hash, record_offset) pointer recorded for each appended record.
#[derive(Copy, Clone, Debug)]
struct Pointer {
    hash: u32,
    record_offset: u32,
}

/// Builds a CDB file in a single append-then-finish pass.
///
/// Not `Sync`/`Send`-shared across threads: `append` mutates writer-owned
/// state and must be externally serialized if called from multiple callers.
/// The writer is single-owner.
pub struct Writer {
    file: File,
    /// Byte offset of the next record to be appended.
    tail: u64,
    pointers: Vec<Pointer>,
    bucket_counts: [u32; NUM_BUCKETS],
    finalized: bool,
}

impl Writer {
    /// Create (or truncate) `path`, reserve the 2048-byte header, and
    /// position the append cursor at offset 2048.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(&[0u8; DIRECTORY_SIZE])?;
        file.flush()?;

        Ok(Writer {
            file,
            tail: RECORD_REGION_START,
            pointers: Vec::new(),
            bucket_counts: [0u32; NUM_BUCKETS],
            finalized: false,
        })
    }

    /// Append a `(key, value)` record.
    ///
    /// Fails with [`CdbError::AlreadyFinalized`] once [`Writer::finish`] has
    /// run, and with [`CdbError::InvalidArgument`] if the record's lengths
    /// would overflow the format's `u32` offsets.
    pub fn append(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(CdbError::AlreadyFinalized);
        }

        let key_len: u32 = key
            .len()
            .try_into()
            .map_err(|_| CdbError::InvalidArgument("key length exceeds u32"))?;
        let value_len: u32 = value
            .len()
            .try_into()
            .map_err(|_| CdbError::InvalidArgument("value length exceeds u32"))?;

        let record_len = 8u64 + key_len as u64 + value_len as u64;
        let next_tail = self
            .tail
            .checked_add(record_len)
            .filter(|&t| t <= u32::MAX as u64)
            .ok_or(CdbError::InvalidArgument(
                "appending this record would overflow the u32 offset space",
            ))?;

        let record_offset: u32 = self
            .tail
            .try_into()
            .map_err(|_| CdbError::InvalidArgument("record offset exceeds u32"))?;

        let prefix = crate::codec::encode_record_prefix(key_len, value_len);
        self.file.write_all(&prefix)?;
        self.file.write_all(key)?;
        self.file.write_all(value)?;

        let h = hash::hash(key);
        self.pointers.push(Pointer {
            hash: h,
            record_offset,
        });
        self.bucket_counts[hash::bucket_of(h)] += 1;
        self.tail = next_tail;

        Ok(())
    }

    /// Convenience overload for UTF-8 string keys/values. Not part of the
    /// core byte-oriented contract.
    pub fn append_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.append(key.as_bytes(), value.as_bytes())
    }

    /// Materialize the bucket tables, patch the slot directory, and flush.
    /// Idempotent: calling `finish` again after it has already run is a
    /// no-op that returns `Ok(())`.
    pub fn finish(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        finalize::finalize(&mut self.file, self.tail, &self.pointers, &self.bucket_counts)?;
        self.finalized = true;
        Ok(())
    }

    /// Finish (if not already finalized) and release the file handle.
    ///
    /// Errors during `finish` propagate. A failure to close the handle
    /// itself is logged via [`crate::notify`] and never overrides a
    /// finish error or a successful finish.
    pub fn close(mut self) -> Result<()> {
        self.finish()?;
        // `File`'s `Drop` impl already closes the descriptor; explicitly
        // flushing here surfaces any buffered-write failure before the
        // handle goes away rather than losing it to a silent `Drop`.
        if let Err(e) = self.file.sync_all() {
            notify::warn_close_failure("cdb writer", &e);
        }
        Ok(())
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if !self.finalized {
            // Best-effort finalize so a writer dropped without an explicit
            // `close`/`finish` still yields a well-formed file rather than
            // one stuck with a zeroed directory.
            let _ = finalize::finalize(&mut self.file, self.tail, &self.pointers, &self.bucket_counts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;

    #[test]
    fn create_reserves_header() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let w = Writer::create(tmp.path()).unwrap();
        assert_eq!(w.tail, RECORD_REGION_START);
    }

    #[test]
    fn append_then_finish_roundtrips() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.append(b"key1", b"value1").unwrap();
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        assert_eq!(r.get(b"key1").unwrap(), Some(b"value1".to_vec()));
    }

    #[test]
    fn append_after_finish_fails() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.append(b"k", b"v").unwrap();
        w.finish().unwrap();
        let err = w.append(b"k2", b"v2").unwrap_err();
        assert!(matches!(err, CdbError::AlreadyFinalized));
    }

    #[test]
    fn finish_is_idempotent() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.append(b"k", b"v").unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn empty_database_is_all_zero_header() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.finish().unwrap();

        let bytes = std::fs::read(tmp.path()).unwrap();
        assert_eq!(bytes.len(), DIRECTORY_SIZE);
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn drop_without_finish_still_produces_well_formed_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        {
            let mut w = Writer::create(tmp.path()).unwrap();
            w.append(b"k", b"v").unwrap();
        }
        let r = Reader::open(tmp.path()).unwrap();
        assert_eq!(r.get(b"k").unwrap(), Some(b"v".to_vec()));
    }
}
