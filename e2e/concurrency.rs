//! E2E: concurrent readers sharing one open handle.
//!
//! Many threads issuing lookups against a single shared `Reader` must each
//! see exactly the value they asked for, with no lost or cross-contaminated
//! results. This is the direct consequence of positional I/O plus per-call
//! probe state (no shared mutable cursor on `Reader`).

use cdb::{Reader, Writer};
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

#[test]
fn many_threads_many_lookups_on_a_shared_reader() {
    const NUM_KEYS: usize = 1000;
    const NUM_THREADS: usize = 200;
    const LOOKUPS_PER_THREAD: usize = 100;

    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    for i in 0..NUM_KEYS {
        w.append_str(&format!("key-{i}"), &format!("value-{i}"))
            .unwrap();
    }
    w.finish().unwrap();

    let reader = Arc::new(Reader::open(tmp.path()).unwrap());

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|t| {
            let reader = Arc::clone(&reader);
            thread::spawn(move || {
                for j in 0..LOOKUPS_PER_THREAD {
                    let key_idx = (t * LOOKUPS_PER_THREAD + j) % NUM_KEYS;
                    let key = format!("key-{key_idx}");
                    let expected = format!("value-{key_idx}").into_bytes();
                    let got = reader
                        .get_str(&key)
                        .unwrap_or_else(|e| panic!("thread {t} lookup {j} errored: {e}"));
                    assert_eq!(
                        got,
                        Some(expected),
                        "thread {t} lookup {j} for {key} returned the wrong value"
                    );
                }
            })
        })
        .collect();

    for h in handles {
        h.join().expect("lookup thread panicked");
    }
}

#[test]
fn concurrent_find_and_get_on_duplicate_keys_never_cross_contaminate() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    for group in 0..16 {
        for n in 0..8 {
            w.append_str(&format!("group-{group}"), &format!("{group}:{n}"))
                .unwrap();
        }
    }
    w.finish().unwrap();

    let reader = Arc::new(Reader::open(tmp.path()).unwrap());
    let handles: Vec<_> = (0..16)
        .map(|group| {
            let reader = Arc::clone(&reader);
            thread::spawn(move || {
                let key = format!("group-{group}");
                let mut values: Vec<String> = reader
                    .find(key.as_bytes())
                    .map(|v| String::from_utf8(v).unwrap())
                    .collect();
                values.sort();
                let mut expected: Vec<String> =
                    (0..8).map(|n| format!("{group}:{n}")).collect();
                expected.sort();
                assert_eq!(values, expected, "group {group} saw contaminated results");
            })
        })
        .collect();

    for h in handles {
        h.join().expect("find thread panicked");
    }
}
