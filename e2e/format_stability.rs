//! E2E: format stability.
//!
//! Given the same inputs appended in the same order, the writer's
//! deterministic bucket ordering in `finalize` must produce a byte-identical
//! file every time.

use cdb::Writer;
use tempfile::NamedTempFile;

fn build<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> Vec<u8> {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    for (k, v) in pairs {
        w.append_str(k.as_ref(), v.as_ref()).unwrap();
    }
    w.finish().unwrap();
    std::fs::read(tmp.path()).unwrap()
}

#[test]
fn same_inputs_same_order_produce_byte_identical_files() {
    let pairs: Vec<(String, String)> = (0..300)
        .map(|i| (format!("key-{i}"), format!("value-{i}")))
        .collect();

    let first = build(&pairs);
    let second = build(&pairs);
    assert_eq!(first, second, "identical input sequences must produce identical files");
}

#[test]
fn reordering_appends_changes_the_file_but_not_the_readable_contents() {
    let forward = build(&[("a", "1"), ("b", "2"), ("c", "3")]);
    let reversed = build(&[("c", "3"), ("b", "2"), ("a", "1")]);
    // Different append order is allowed to produce a different byte layout...
    assert_ne!(forward, reversed);

    // ...but both must still resolve every key to its value.
    let tmp_fwd = NamedTempFile::new().unwrap();
    std::fs::write(tmp_fwd.path(), &forward).unwrap();
    let r = cdb::Reader::open(tmp_fwd.path()).unwrap();
    assert_eq!(r.get_str("a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(r.get_str("b").unwrap(), Some(b"2".to_vec()));
    assert_eq!(r.get_str("c").unwrap(), Some(b"3".to_vec()));
}

#[test]
fn empty_database_format_is_stable() {
    let first = build::<&str, &str>(&[]);
    let second = build::<&str, &str>(&[]);
    assert_eq!(first, second);
    assert_eq!(first.len(), cdb::codec::DIRECTORY_SIZE);
}
