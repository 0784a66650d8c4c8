//! The two-phase finalize algorithm: regroup pointers by bucket, emit the
//! bucket slot tables at the file tail, then patch the slot directory at
//! offset 0.
//!
//! Mirrors `cdb_make_finish` in the reference implementation: a counting
//! sort of pointers into per-bucket runs (via exclusive prefix sums), open
//! addressing within each bucket at twice its occupancy, then a single
//! rewind-and-overwrite of the header.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

use crate::codec::{self, directory::DirectoryEntry, NUM_BUCKETS};
use crate::hash;

/// Regroup `pointers` by bucket, emit bucket slot tables at the current
/// file tail, and patch the slot directory at offset 0.
pub(super) fn finalize(
    file: &mut File,
    tail: u64,
    pointers: &[super::Pointer],
    bucket_counts: &[u32; NUM_BUCKETS],
) -> std::io::Result<()> {
    // Exclusive prefix sum: start[i] is the index in `ordered` where
    // bucket i's pointers begin.
    let mut start = [0u32; NUM_BUCKETS];
    let mut running = 0u32;
    for i in 0..NUM_BUCKETS {
        start[i] = running;
        running += bucket_counts[i];
    }

    // end[i] begins as start[i] + count[i] and is decremented as each
    // pointer for bucket i is placed, so pointers land in stable
    // (reverse-of-reverse == original) order within their bucket.
    let mut end = [0u32; NUM_BUCKETS];
    for i in 0..NUM_BUCKETS {
        end[i] = start[i] + bucket_counts[i];
    }

    let total: usize = pointers.len();
    let mut ordered: Vec<Option<(u32, u32)>> = vec![None; total];
    for p in pointers {
        let b = hash::bucket_of(p.hash);
        end[b] -= 1;
        ordered[end[b] as usize] = Some((p.hash, p.record_offset));
    }

    file.seek(SeekFrom::Start(tail))?;
    let mut cursor = tail;
    let mut entries = [DirectoryEntry::default(); NUM_BUCKETS];

    for i in 0..NUM_BUCKETS {
        let count = bucket_counts[i] as usize;
        let len = (2 * count) as u32;
        entries[i] = DirectoryEntry {
            bucket_offset: cursor as u32,
            bucket_length: len,
        };

        if count == 0 {
            continue;
        }

        let mut slots: Vec<(u32, u32)> = vec![(0, 0); len as usize];
        let bucket_start = start[i] as usize;
        for &(h, record_offset) in ordered[bucket_start..bucket_start + count]
            .iter()
            .flatten()
        {
            let mut s = hash::start_slot(h, len) as usize;
            while slots[s].1 != 0 {
                s = if s + 1 == len as usize { 0 } else { s + 1 };
            }
            slots[s] = (h, record_offset);
        }

        let mut buf = Vec::with_capacity(slots.len() * 8);
        for (h, record_offset) in slots {
            buf.extend_from_slice(&codec::encode_slot(h, record_offset));
        }
        file.write_all(&buf)?;
        cursor += buf.len() as u64;
    }

    file.seek(SeekFrom::Start(0))?;
    codec::write_directory(file, &entries)?;
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::Writer;
    use crate::reader::Reader;

    #[test]
    fn every_bucket_length_is_twice_its_occupancy() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        for i in 0..50 {
            w.append_str(&format!("key-{i}"), &format!("value-{i}"))
                .unwrap();
        }
        w.finish().unwrap();

        let file = std::fs::File::open(tmp.path()).unwrap();
        let entries = crate::codec::read_directory(&file).unwrap();

        let mut counts = [0u32; crate::codec::NUM_BUCKETS];
        for i in 0..50 {
            let h = crate::hash::hash(format!("key-{i}").as_bytes());
            counts[crate::hash::bucket_of(h)] += 1;
        }
        for (entry, count) in entries.iter().zip(counts.iter()) {
            assert_eq!(entry.bucket_length, 2 * count);
        }
    }

    #[test]
    fn all_records_reachable_after_finalize() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut w = Writer::create(tmp.path()).unwrap();
        for i in 0..200 {
            w.append_str(&format!("k{i}"), &format!("v{i}")).unwrap();
        }
        w.finish().unwrap();

        let r = Reader::open(tmp.path()).unwrap();
        for i in 0..200 {
            assert_eq!(
                r.get(format!("k{i}").as_bytes()).unwrap(),
                Some(format!("v{i}").into_bytes())
            );
        }
    }
}
