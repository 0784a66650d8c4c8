//! The CDB reader: opens a finalized file, caches its slot directory, and
//! resolves lookups with positional reads so an arbitrary number of
//! threads can share one open handle without synchronization.
//!
//! Translated from `cdb_init` / `cdb_find` / `cdb_findnext` in the
//! reference implementation, restructured around [`PositionalRead`]
//! instead of a shared `lseek`+`read` cursor.

mod cursor;
mod records;

use std::fs::File;
use std::path::Path;

use crate::codec::{self, directory::DirectoryEntry, NUM_BUCKETS};
use crate::error::{CdbError, Result};
use crate::hash;
use crate::notify;
use crate::positional::PositionalRead;

pub use cursor::Find;
pub use records::Records;

/// A finalized CDB file, opened for lookups.
///
/// Safe to share across threads (`&Reader`): the slot directory is
/// immutable after [`Reader::open`], and every subsequent disk access is a
/// positional read carrying its own offset.
pub struct Reader {
    file: File,
    directory: [DirectoryEntry; NUM_BUCKETS],
}

impl Reader {
    /// Open `path` and eagerly read its 2048-byte slot directory.
    ///
    /// Fails with [`CdbError::CorruptHeader`] if the file is shorter than
    /// 2048 bytes.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let directory = codec::read_directory(&file)?;
        Ok(Reader { file, directory })
    }

    /// Return the first value stored under `key`, in probe order, or
    /// `None` if absent.
    ///
    /// Unlike [`Reader::find`], a genuine I/O failure propagates as
    /// [`CdbError::Io`] rather than silently ending the search.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let h = hash::hash(key);
        let bucket = self.directory[hash::bucket_of(h)];
        let mut probe = cursor::ProbeState::new(&self.file, key, h, bucket);
        probe.next_value()
    }

    /// Return a finite, non-restartable iterator over every value stored
    /// under `key`, in probe order.
    ///
    /// Two concurrent calls to `find` on the same `Reader` do not
    /// interfere: each owns its own probe state.
    pub fn find<'a>(&'a self, key: &'a [u8]) -> Find<'a> {
        let h = hash::hash(key);
        let bucket = self.directory[hash::bucket_of(h)];
        Find::new(&self.file, key, h, bucket)
    }

    /// Convenience overload for a UTF-8 string key.
    pub fn get_str(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get(key.as_bytes())
    }

    /// Sequentially scan every stored `(key, value)` pair in on-disk order,
    /// bypassing the hash index entirely. Used by `cdb dump`/`cdb stats`.
    pub fn records(&self) -> Records<'_> {
        Records::new(&self.file, &self.directory)
    }

    /// Release the file handle. Idempotent; errors during close are
    /// swallowed (and routed through the notification sink).
    pub fn close(self) {
        if let Err(e) = self.file.sync_all() {
            notify::warn_close_failure("cdb reader", &e);
        }
    }

    /// Number of non-empty buckets — diagnostic, not part of the core
    /// lookup contract. Used by the `cdb stats` CLI command.
    pub fn occupied_buckets(&self) -> usize {
        self.directory
            .iter()
            .filter(|e| e.bucket_length > 0)
            .count()
    }

    /// Largest bucket length across the directory — diagnostic.
    pub fn max_bucket_length(&self) -> u32 {
        self.directory
            .iter()
            .map(|e| e.bucket_length)
            .max()
            .unwrap_or(0)
    }

    /// Total slot count summed across all buckets, halved, gives the
    /// record count under the writer's factor-of-two sizing invariant —
    /// diagnostic only, used by `cdb stats`.
    pub fn total_slots(&self) -> u64 {
        self.directory.iter().map(|e| e.bucket_length as u64).sum()
    }
}

/// Helper shared by [`Reader`] and [`Find`]: read 8 bytes at `offset`,
/// treating any I/O failure as an `Io` error and any short read as one too
/// (both are reported the same way by `read_exact_at`).
pub(crate) fn read8(file: &impl PositionalRead, offset: u64) -> Result<[u8; 8]> {
    let mut buf = [0u8; 8];
    file.read_exact_at(&mut buf, offset)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Writer;

    fn fixture(pairs: &[(&str, &str)]) -> tempfile::TempPath {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        for (k, v) in pairs {
            w.append_str(k, v).unwrap();
        }
        w.finish().unwrap();
        tmp.into_temp_path()
    }

    #[test]
    fn get_returns_first_value() {
        let path = fixture(&[("key1", "value1"), ("key2", "value2"), ("key3", "value3")]);
        let r = Reader::open(&path).unwrap();
        assert_eq!(r.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(r.get(b"nonexistent").unwrap(), None);
    }

    #[test]
    fn open_on_short_file_is_corrupt_header() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), [0u8; 10]).unwrap();
        let err = Reader::open(tmp.path()).unwrap_err();
        assert!(matches!(err, CdbError::CorruptHeader));
    }

    #[test]
    fn empty_database_reports_every_key_absent() {
        let path = fixture(&[]);
        let r = Reader::open(&path).unwrap();
        assert_eq!(r.get(b"anything").unwrap(), None);
        assert_eq!(r.occupied_buckets(), 0);
    }

    #[test]
    fn zeroed_first_byte_is_still_a_clean_miss() {
        // S6: a directory that's all-zero (bucket_length == 0 everywhere)
        // must never be mistaken for an I/O error.
        let path = fixture(&[]);
        let r = Reader::open(&path).unwrap();
        for _ in 0..8 {
            assert_eq!(r.get(b"k").unwrap(), None);
        }
    }

    #[test]
    fn diagnostics_reflect_written_data() {
        let path = fixture(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let r = Reader::open(&path).unwrap();
        assert_eq!(r.total_slots(), 6); // 3 records * factor of 2
        assert!(r.max_bucket_length() <= 6);
    }
}
