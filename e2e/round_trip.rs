//! E2E: round-trip lookups through a freshly built database.
//!
//! Values come back exactly as appended, for small and large record sets
//! alike, including a large (1 KiB key, 1 MiB value) record that exercises
//! more than one record-region read.

use cdb::{Reader, Writer};
use tempfile::NamedTempFile;

#[test]
fn three_keys_hit_and_one_miss() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("key1", "value1").unwrap();
    w.append_str("key2", "value2").unwrap();
    w.append_str("key3", "value3").unwrap();
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    assert_eq!(r.get_str("key1").unwrap(), Some(b"value1".to_vec()));
    assert_eq!(r.get_str("key2").unwrap(), Some(b"value2".to_vec()));
    assert_eq!(r.get_str("key3").unwrap(), Some(b"value3".to_vec()));
    assert_eq!(r.get_str("nonexistent").unwrap(), None);
}

#[test]
fn round_trip_returns_first_value_in_append_order() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    for i in 0..500 {
        w.append_str(&format!("k{i}"), &format!("v{i}")).unwrap();
    }
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    for i in 0..500 {
        assert_eq!(
            r.get_str(&format!("k{i}")).unwrap(),
            Some(format!("v{i}").into_bytes())
        );
    }
}

#[test]
fn large_key_and_value_round_trip_byte_exact() {
    // A 1 KiB key paired with a 1 MiB value, both pseudo-random, must come
    // back byte-for-byte.
    let key: Vec<u8> = (0..1024u32).map(|i| (i * 2654435761).to_le_bytes()[0]).collect();
    let value: Vec<u8> = (0..1024 * 1024u32)
        .map(|i| (i.wrapping_mul(2246822519)).to_le_bytes()[1])
        .collect();

    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append(&key, &value).unwrap();
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    let got = r.get(&key).unwrap().expect("large record must be found");
    assert_eq!(got.len(), value.len());
    assert_eq!(got, value);
}

#[test]
fn values_survive_many_distinct_keys_sharing_a_bucket_low_byte() {
    // Force heavy bucket occupancy by writing far more records than buckets,
    // so most buckets end up with several slots and a real probe sequence.
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    for i in 0..4000 {
        w.append_str(&format!("dense-key-{i}"), &format!("dense-value-{i}"))
            .unwrap();
    }
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    for i in (0..4000).step_by(37) {
        assert_eq!(
            r.get_str(&format!("dense-key-{i}")).unwrap(),
            Some(format!("dense-value-{i}").into_bytes())
        );
    }
}
