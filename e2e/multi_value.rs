//! E2E: multi-valued keys.
//!
//! `get` returns the first value under append order, `find` yields the exact
//! multiset of every value stored under a repeated key.

use cdb::{Reader, Writer};
use std::collections::HashMap;
use tempfile::NamedTempFile;

#[test]
fn get_returns_first_find_returns_all() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("k", "a").unwrap();
    w.append_str("k", "b").unwrap();
    w.append_str("k", "c").unwrap();
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    assert_eq!(r.get_str("k").unwrap(), Some(b"a".to_vec()));

    let mut values: Vec<Vec<u8>> = r.find(b"k").collect();
    values.sort();
    assert_eq!(
        values,
        vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
    );
}

#[test]
fn find_count_is_exact_across_many_duplicate_keys() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();

    // Build a map of key -> expected multiset of values, with varying
    // duplication counts and some completely unique keys interleaved.
    let mut expected: HashMap<String, Vec<String>> = HashMap::new();
    for i in 0..50 {
        let key = format!("dup-{}", i % 7);
        let value = format!("v{i}");
        w.append_str(&key, &value).unwrap();
        expected.entry(key).or_default().push(value);
    }
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    for (key, mut want) in expected {
        let mut got: Vec<String> = r
            .find(key.as_bytes())
            .map(|v| String::from_utf8(v).unwrap())
            .collect();
        got.sort();
        want.sort();
        assert_eq!(got, want, "mismatch for key {key:?}");
    }
}

#[test]
fn find_is_finite_and_non_restartable() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("k", "1").unwrap();
    w.append_str("k", "2").unwrap();
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    let mut it = r.find(b"k");
    assert!(it.next().is_some());
    assert!(it.next().is_some());
    // Exhausted: further calls keep returning None, never restart the probe.
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
}

#[test]
fn two_concurrent_find_sequences_on_the_same_key_do_not_interfere() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    for i in 0..10 {
        w.append_str("shared", &i.to_string()).unwrap();
    }
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    let mut a: Vec<Vec<u8>> = r.find(b"shared").collect();
    let mut b: Vec<Vec<u8>> = r.find(b"shared").collect();
    a.sort();
    b.sort();
    assert_eq!(a.len(), 10);
    assert_eq!(a, b);
}
