//! Per-call probe state shared by [`super::Reader::get`] and [`Find`].
//!
//! A self-contained, non-restartable cursor: current slot index, visited
//! count, and the key being searched for. No state lives on [`super::Reader`]
//! itself, which is what lets multiple `find`/`get` calls run concurrently
//! against one shared handle. A named streaming-state struct, not a closure
//! or generator, for anything that carries state across steps.

use std::fs::File;
use std::io;

use crate::codec::{self, directory::DirectoryEntry};
use crate::error::{CdbError, Result};
use crate::hash;
use crate::notify;
use crate::positional::PositionalRead;

use super::read8;

/// Walks one bucket's probe sequence, yielding each matching record's value
/// in turn.
pub(crate) struct ProbeState<'a> {
    file: &'a File,
    key: &'a [u8],
    hash: u32,
    bucket_offset: u32,
    bucket_length: u32,
    slot: u32,
    visited: u32,
}

impl<'a> ProbeState<'a> {
    pub(crate) fn new(file: &'a File, key: &'a [u8], hash: u32, bucket: DirectoryEntry) -> Self {
        let bucket_length = bucket.bucket_length;
        let slot = if bucket_length == 0 {
            0
        } else {
            hash::start_slot(hash, bucket_length)
        };
        ProbeState {
            file,
            key,
            hash,
            bucket_offset: bucket.bucket_offset,
            bucket_length,
            slot,
            visited: 0,
        }
    }

    /// Advance the probe to the next matching value, or `Ok(None)` once the
    /// bucket is exhausted. Propagates genuine I/O errors (anything other
    /// than a short read caused by a bogus length prefix).
    pub(crate) fn next_value(&mut self) -> Result<Option<Vec<u8>>> {
        while self.visited < self.bucket_length {
            let slot_addr = self.bucket_offset as u64 + 8 * self.slot as u64;
            let bytes = read8(self.file, slot_addr)?;
            let (slot_hash, record_offset) = codec::decode_slot(&bytes);

            self.visited += 1;
            self.slot = if self.slot + 1 == self.bucket_length {
                0
            } else {
                self.slot + 1
            };

            if record_offset == 0 {
                // An empty slot terminates the probe from here on.
                self.visited = self.bucket_length;
                return Ok(None);
            }

            if slot_hash != self.hash {
                continue;
            }

            if let Some(value) = self.match_record(record_offset)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Check whether the record at `record_offset` actually matches `self.key`,
    /// returning its value if so. A truncated/inconsistent record is treated
    /// as "no match" (logged, probing continues); any other I/O failure
    /// propagates.
    fn match_record(&self, record_offset: u32) -> Result<Option<Vec<u8>>> {
        let prefix = match read8(self.file, record_offset as u64) {
            Ok(b) => b,
            Err(CdbError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                notify::warn_corrupt_record(record_offset as u64, "truncated record prefix");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let (key_len, value_len) = codec::decode_record_prefix(&prefix);
        if key_len as usize != self.key.len() {
            return Ok(None);
        }

        let mut key_buf = vec![0u8; key_len as usize];
        match self.file.read_exact_at(&mut key_buf, record_offset as u64 + 8) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                notify::warn_corrupt_record(record_offset as u64, "truncated record key");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }
        if key_buf != self.key {
            return Ok(None);
        }

        let mut value_buf = vec![0u8; value_len as usize];
        let value_offset = record_offset as u64 + 8 + key_len as u64;
        match self.file.read_exact_at(&mut value_buf, value_offset) {
            Ok(()) => Ok(Some(value_buf)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                notify::warn_corrupt_record(record_offset as u64, "truncated record value");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Lazy, finite, non-restartable iterator over every value stored under a
/// key, in probe order. Returned by [`super::Reader::find`].
///
/// I/O errors encountered mid-probe terminate the sequence (reported via
/// [`crate::notify`]) rather than being surfaced as an `Err` item — matching
/// `get`'s harder failure contract would require every caller of `find` to
/// handle a `Result` per item for a condition this crate treats as
/// recoverable at the probe level.
pub struct Find<'a> {
    state: ProbeState<'a>,
}

impl<'a> Find<'a> {
    pub(crate) fn new(file: &'a File, key: &'a [u8], hash: u32, bucket: DirectoryEntry) -> Self {
        Find {
            state: ProbeState::new(file, key, hash, bucket),
        }
    }
}

impl<'a> Iterator for Find<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        match self.state.next_value() {
            Ok(Some(value)) => Some(value),
            Ok(None) => None,
            Err(e) => {
                notify::notify(
                    notify::LEVEL_WARNING,
                    &format!("cdb: warning: find() terminated early: {e}"),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::reader::Reader;
    use crate::writer::Writer;

    #[test]
    fn find_yields_every_value_for_a_key() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.append_str("k", "a").unwrap();
        w.append_str("k", "b").unwrap();
        w.append_str("k", "c").unwrap();
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        let mut values: Vec<Vec<u8>> = r.find(b"k").collect();
        values.sort();
        let mut expected = vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()];
        expected.sort();
        assert_eq!(values, expected);
    }

    #[test]
    fn find_on_missing_key_is_empty() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.append_str("present", "v").unwrap();
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        assert_eq!(r.find(b"absent").count(), 0);
    }

    #[test]
    fn find_is_independent_across_concurrent_calls() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        for i in 0..5 {
            w.append_str("dup", &i.to_string()).unwrap();
        }
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        let mut it_a = r.find(b"dup");
        let mut it_b = r.find(b"dup");

        // Interleave steps from two independent iterators over the same key.
        let first_a = it_a.next();
        let first_b = it_b.next();
        assert!(first_a.is_some());
        assert_eq!(first_a, first_b, "both iterators start at the same slot");

        let rest_a: Vec<_> = it_a.collect();
        let rest_b: Vec<_> = it_b.collect();
        assert_eq!(rest_a, rest_b);
    }
}
