//! E2E: interoperability with the canonical djb CDB format.
//!
//! There is no system `cdb` binary to shell out to in this environment, so
//! both directions of interop are exercised against a hand-rolled reference
//! implementation written directly against the on-disk byte layout,
//! independent of this crate's own codec module:
//!
//! - a file built by [`cdb::Writer`] is parsed by the reference reader below
//!   and must yield every appended pair;
//! - a file built by the reference writer below (which never touches
//!   `cdb::codec` or `cdb::writer`) is opened by [`cdb::Reader`] and must
//!   resolve every key.

use cdb::{Reader, Writer};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write as _};
use tempfile::NamedTempFile;

const NUM_BUCKETS: usize = 256;

fn reference_hash(data: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &b in data {
        h = h.wrapping_shl(5).wrapping_add(h) ^ (b as u32);
    }
    h
}

/// A from-scratch reader against the on-disk format, built without using any
/// part of this crate, to cross-check byte-for-byte compatibility.
fn reference_read_all(path: &std::path::Path) -> HashMap<Vec<u8>, Vec<Vec<u8>>> {
    let mut file = std::fs::File::open(path).unwrap();
    let mut dir_bytes = [0u8; NUM_BUCKETS * 8];
    file.read_exact(&mut dir_bytes).unwrap();

    let mut out: HashMap<Vec<u8>, Vec<Vec<u8>>> = HashMap::new();
    for b in 0..NUM_BUCKETS {
        let base = b * 8;
        let bucket_offset = u32::from_le_bytes(dir_bytes[base..base + 4].try_into().unwrap());
        let bucket_length = u32::from_le_bytes(dir_bytes[base + 4..base + 8].try_into().unwrap());
        if bucket_length == 0 {
            continue;
        }
        for s in 0..bucket_length {
            let slot_addr = bucket_offset as u64 + 8 * s as u64;
            file.seek(SeekFrom::Start(slot_addr)).unwrap();
            let mut slot = [0u8; 8];
            file.read_exact(&mut slot).unwrap();
            let record_offset = u32::from_le_bytes(slot[4..8].try_into().unwrap());
            if record_offset == 0 {
                continue;
            }

            file.seek(SeekFrom::Start(record_offset as u64)).unwrap();
            let mut prefix = [0u8; 8];
            file.read_exact(&mut prefix).unwrap();
            let key_len = u32::from_le_bytes(prefix[0..4].try_into().unwrap());
            let value_len = u32::from_le_bytes(prefix[4..8].try_into().unwrap());

            let mut key = vec![0u8; key_len as usize];
            file.read_exact(&mut key).unwrap();
            let mut value = vec![0u8; value_len as usize];
            file.read_exact(&mut value).unwrap();

            out.entry(key).or_default().push(value);
        }
    }
    out
}

/// A from-scratch writer against the on-disk format, independent of
/// `cdb::writer`/`cdb::codec`, used to produce a file this crate's `Reader`
/// must then be able to open and resolve correctly.
fn reference_write_all(path: &std::path::Path, pairs: &[(&[u8], &[u8])]) {
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&[0u8; NUM_BUCKETS * 8]).unwrap();

    let mut pointers: Vec<(u32, u32)> = Vec::new();
    let mut counts = [0u32; NUM_BUCKETS];
    let mut tail = (NUM_BUCKETS * 8) as u32;
    for (k, v) in pairs {
        let h = reference_hash(k);
        file.write_all(&(k.len() as u32).to_le_bytes()).unwrap();
        file.write_all(&(v.len() as u32).to_le_bytes()).unwrap();
        file.write_all(k).unwrap();
        file.write_all(v).unwrap();
        pointers.push((h, tail));
        counts[(h & 0xff) as usize] += 1;
        tail += 8 + k.len() as u32 + v.len() as u32;
    }

    let mut directory = vec![(0u32, 0u32); NUM_BUCKETS];
    let mut cursor = tail;
    for b in 0..NUM_BUCKETS {
        let len = 2 * counts[b];
        directory[b] = (cursor, len);
        if len == 0 {
            continue;
        }
        let mut slots = vec![(0u32, 0u32); len as usize];
        for &(h, offset) in pointers.iter().filter(|(h, _)| (h & 0xff) as usize == b) {
            let mut s = (h >> 8) % len;
            while slots[s as usize].1 != 0 {
                s = if s + 1 == len { 0 } else { s + 1 };
            }
            slots[s as usize] = (h, offset);
        }
        for (h, offset) in slots {
            file.write_all(&h.to_le_bytes()).unwrap();
            file.write_all(&offset.to_le_bytes()).unwrap();
        }
        cursor += 8 * len;
    }

    file.seek(SeekFrom::Start(0)).unwrap();
    for (offset, len) in &directory {
        file.write_all(&offset.to_le_bytes()).unwrap();
        file.write_all(&len.to_le_bytes()).unwrap();
    }
    file.flush().unwrap();
}

#[test]
fn reference_reader_parses_a_file_built_by_this_crates_writer() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("alpha", "1").unwrap();
    w.append_str("beta", "2").unwrap();
    w.append_str("beta", "3").unwrap();
    w.append_str("gamma", "4").unwrap();
    w.finish().unwrap();

    let parsed = reference_read_all(tmp.path());
    assert_eq!(parsed.get(&b"alpha"[..].to_vec()), Some(&vec![b"1".to_vec()]));
    let mut beta = parsed.get(&b"beta"[..].to_vec()).unwrap().clone();
    beta.sort();
    assert_eq!(beta, vec![b"2".to_vec(), b"3".to_vec()]);
    assert_eq!(parsed.get(&b"gamma"[..].to_vec()), Some(&vec![b"4".to_vec()]));
}

#[test]
fn this_crates_reader_opens_a_file_built_by_a_reference_writer() {
    let tmp = NamedTempFile::new().unwrap();
    let pairs: Vec<(&[u8], &[u8])> = vec![
        (b"one", b"1"),
        (b"two", b"2"),
        (b"two", b"22"),
        (b"three", b"3"),
    ];
    reference_write_all(tmp.path(), &pairs);

    let r = Reader::open(tmp.path()).unwrap();
    assert_eq!(r.get(b"one").unwrap(), Some(b"1".to_vec()));
    assert_eq!(r.get(b"three").unwrap(), Some(b"3".to_vec()));
    let mut two: Vec<Vec<u8>> = r.find(b"two").collect();
    two.sort();
    assert_eq!(two, vec![b"2".to_vec(), b"22".to_vec()]);
    assert_eq!(r.get(b"absent").unwrap(), None);
}

#[test]
fn reference_hash_matches_this_crates_hash_on_known_vectors() {
    assert_eq!(reference_hash(b""), cdb::cdb_hash(b""));
    assert_eq!(reference_hash(b"a"), cdb::cdb_hash(b"a"));
    assert_eq!(cdb::cdb_hash(b""), 5381);
    assert_eq!(cdb::cdb_hash(b"a"), 177_604);
}
