//! Sequential, index-bypassing scan over every stored record.
//!
//! Mirrors the reference `cdbdump` tool: walk the record region from the
//! first byte past the slot directory up to wherever the first occupied
//! bucket table begins, ignoring the hash index entirely. Used by
//! [`super::Reader::records`] and the `cdb dump`/`cdb stats` CLI commands.

use std::fs::File;

use crate::codec::{self, directory::DirectoryEntry, NUM_BUCKETS};
use crate::error::Result;
use crate::positional::PositionalRead;
use crate::writer::RECORD_REGION_START;

use super::read8;

/// Lazy iterator over every `(key, value)` pair in on-disk order.
///
/// Unlike [`super::Find`], a corrupt or truncated record is a hard error:
/// there is no hash match to fall back on, so a bad length prefix here means
/// the file itself is damaged.
pub struct Records<'a> {
    file: &'a File,
    offset: u64,
    end: u64,
    done: bool,
}

impl<'a> Records<'a> {
    pub(crate) fn new(file: &'a File, directory: &[DirectoryEntry; NUM_BUCKETS]) -> Self {
        let end = directory
            .iter()
            .filter(|e| e.bucket_length > 0)
            .map(|e| e.bucket_offset as u64)
            .min()
            .unwrap_or(RECORD_REGION_START);
        Records {
            file,
            offset: RECORD_REGION_START,
            end,
            done: false,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.end {
            return None;
        }

        let prefix = match read8(self.file, self.offset) {
            Ok(b) => b,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let (key_len, value_len) = codec::decode_record_prefix(&prefix);

        let mut key = vec![0u8; key_len as usize];
        if let Err(e) = self.file.read_exact_at(&mut key, self.offset + 8) {
            self.done = true;
            return Some(Err(e.into()));
        }

        let value_offset = self.offset + 8 + key_len as u64;
        let mut value = vec![0u8; value_len as usize];
        if let Err(e) = self.file.read_exact_at(&mut value, value_offset) {
            self.done = true;
            return Some(Err(e.into()));
        }

        self.offset = value_offset + value_len as u64;
        Some(Ok((key, value)))
    }
}

#[cfg(test)]
mod tests {
    use crate::reader::Reader;
    use crate::writer::Writer;

    #[test]
    fn records_visits_every_pair_in_file_order() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.append_str("a", "1").unwrap();
        w.append_str("b", "2").unwrap();
        w.append_str("c", "3").unwrap();
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        let pairs: Vec<(Vec<u8>, Vec<u8>)> =
            r.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(
            pairs,
            vec![
                (b"a".to_vec(), b"1".to_vec()),
                (b"b".to_vec(), b"2".to_vec()),
                (b"c".to_vec(), b"3".to_vec()),
            ]
        );
    }

    #[test]
    fn records_on_empty_database_is_empty() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        assert_eq!(r.records().count(), 0);
    }
}
