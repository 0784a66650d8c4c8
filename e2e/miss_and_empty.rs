//! E2E: misses and the empty-database edge case.
//!
//! An absent key returns cleanly from both `get` and `find`, a freshly
//! finalized empty database is a valid all-zero directory every key misses
//! against, appending after the writer has already finalized is rejected,
//! and a directory that happens to be all zero bytes must never be mistaken
//! for an I/O failure.

use cdb::codec::DIRECTORY_SIZE;
use cdb::{CdbError, Reader, Writer};
use tempfile::NamedTempFile;

#[test]
fn miss_returns_absent_for_get_and_empty_for_find() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("present", "value").unwrap();
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    assert_eq!(r.get_str("absent").unwrap(), None);
    assert_eq!(r.find(b"absent").count(), 0);
}

#[test]
fn empty_database_is_2048_zero_bytes_and_every_key_is_absent() {
    let tmp = NamedTempFile::new().unwrap();
    let w = Writer::create(tmp.path()).unwrap();
    w.close().unwrap();

    let bytes = std::fs::read(tmp.path()).unwrap();
    assert_eq!(bytes.len(), DIRECTORY_SIZE);
    assert!(bytes.iter().all(|&b| b == 0));

    let r = Reader::open(tmp.path()).unwrap();
    for key in ["", "a", "anything at all"] {
        assert_eq!(r.get_str(key).unwrap(), None);
        assert_eq!(r.find(key.as_bytes()).count(), 0);
    }
}

#[test]
fn append_after_close_fails_with_already_finalized() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("a", "1").unwrap();
    w.finish().unwrap();

    let err = w.append_str("b", "2").unwrap_err();
    assert!(matches!(err, CdbError::AlreadyFinalized));
}

#[test]
fn zeroed_directory_is_a_clean_miss_not_an_io_error() {
    // A valid-length file whose directory bytes are all zero must report
    // every key as absent and never raise an I/O error doing so.
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), vec![0u8; DIRECTORY_SIZE + 64]).unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    for key in ["x", "y", "z"] {
        assert_eq!(r.get_str(key).unwrap(), None);
    }
    assert_eq!(r.occupied_buckets(), 0);
}

#[test]
fn open_on_a_file_shorter_than_the_directory_is_corrupt_header() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), vec![0u8; 100]).unwrap();

    let err = Reader::open(tmp.path()).unwrap_err();
    assert!(matches!(err, CdbError::CorruptHeader));
}
