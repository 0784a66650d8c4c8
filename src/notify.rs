//! Verbosity-gated stderr notifier.
//!
//! A process-global level, a setter, and a gated `eprintln!`. Used for the
//! two non-fatal conditions this crate's contract allows to be logged rather
//! than raised: a corrupt record encountered mid-probe, and a failure to
//! close a file handle.
//!
//! Default level is 0 (silent).

use std::sync::atomic::{AtomicI32, Ordering};

/// Corrupt-record warnings are surfaced at this level or above.
pub const LEVEL_WARNING: i32 = 1;

/// Close failures are surfaced at this level or above.
pub const LEVEL_VERBOSE: i32 = 2;

static NOTIFY_LEVEL: AtomicI32 = AtomicI32::new(0);

/// Set the global notification level. Returns the level that was set.
pub fn set_notification_level(level: i32) -> i32 {
    NOTIFY_LEVEL.store(level, Ordering::Relaxed);
    level
}

/// Current notification level.
pub fn notification_level() -> i32 {
    NOTIFY_LEVEL.load(Ordering::Relaxed)
}

/// Emit `msg` to stderr if the current level is at least `level`.
pub fn notify(level: i32, msg: &str) {
    if NOTIFY_LEVEL.load(Ordering::Relaxed) >= level {
        eprintln!("{msg}");
    }
}

/// Warn about a corrupt record encountered mid-probe. Probing continues
/// regardless — this is purely observational.
pub fn warn_corrupt_record(offset: u64, detail: &str) {
    notify(
        LEVEL_WARNING,
        &format!("cdb: warning: corrupt record at offset {offset}: {detail}"),
    );
}

/// Report a failure to close a file handle. Never overrides a pending error.
pub fn warn_close_failure(context: &str, err: &std::io::Error) {
    notify(
        LEVEL_VERBOSE,
        &format!("cdb: warning: failed to close {context}: {err}"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // NOTIFY_LEVEL is process-global; serialize tests that touch it.
    static GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn set_and_read_level() {
        let _g = GUARD.lock().unwrap();
        set_notification_level(3);
        assert_eq!(notification_level(), 3);
        set_notification_level(0);
        assert_eq!(notification_level(), 0);
    }

    #[test]
    fn default_level_is_silent() {
        let _g = GUARD.lock().unwrap();
        set_notification_level(0);
        assert_eq!(notification_level(), 0);
    }
}
