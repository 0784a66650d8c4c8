//! E2E: error handling and the notification sink.
//!
//! `CorruptHeader` surfaces at open time, `AlreadyFinalized` surfaces from
//! `append`, and the notification level gates `CorruptRecord`/`CloseFailure`
//! stderr output without ever changing what `get`/`find` return.

use cdb::notify::{notification_level, set_notification_level};
use cdb::{CdbError, Reader, Writer};
use std::sync::Mutex;
use tempfile::NamedTempFile;

// `NOTIFY_LEVEL` is a single process-global atomic; serialize every test
// that touches it so they don't race each other's assertions.
static LEVEL_GUARD: Mutex<()> = Mutex::new(());

#[test]
fn corrupt_header_surfaces_at_open_time() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), [0u8; 5]).unwrap();
    let err = Reader::open(tmp.path()).unwrap_err();
    assert!(matches!(err, CdbError::CorruptHeader));
    assert!(err.to_string().contains("corrupt header"));
}

#[test]
fn already_finalized_surfaces_from_append_not_from_finish() {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("k", "v").unwrap();
    w.finish().unwrap();

    // finish() is idempotent, not an error.
    assert!(w.finish().is_ok());
    let err = w.append_str("k2", "v2").unwrap_err();
    assert!(matches!(err, CdbError::AlreadyFinalized));
}

#[test]
fn ordinary_appends_never_trip_the_u32_overflow_guard() {
    // The `InvalidArgument` overflow guard exists for the near-4-GiB
    // boundary on 32-bit record offsets; everyday appends must never
    // spuriously hit it.
    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    let value = vec![0u8; 1024];
    for i in 0..256 {
        w.append_str(&format!("k{i}"), &String::from_utf8_lossy(&value)).unwrap();
    }
    w.finish().unwrap();

    let r = Reader::open(tmp.path()).unwrap();
    assert!(r.get(b"k0").unwrap().is_some());
}

#[test]
fn notification_level_gates_stderr_without_changing_lookup_results() {
    let _g = LEVEL_GUARD.lock().unwrap();
    let previous = notification_level();

    let tmp = NamedTempFile::new().unwrap();
    let mut w = Writer::create(tmp.path()).unwrap();
    w.append_str("k", "v").unwrap();
    w.finish().unwrap();

    // At level 0 (default/silent), lookups succeed identically to level 2;
    // the notification level only gates *logging*, never return values.
    set_notification_level(0);
    let r = Reader::open(tmp.path()).unwrap();
    let silent_result = r.get_str("k").unwrap();

    set_notification_level(2);
    let verbose_result = r.get_str("k").unwrap();

    assert_eq!(silent_result, verbose_result);
    assert_eq!(silent_result, Some(b"v".to_vec()));

    set_notification_level(previous);
}

#[test]
fn set_notification_level_returns_the_level_it_set() {
    let _g = LEVEL_GUARD.lock().unwrap();
    let previous = notification_level();
    assert_eq!(set_notification_level(1), 1);
    assert_eq!(notification_level(), 1);
    set_notification_level(previous);
}
