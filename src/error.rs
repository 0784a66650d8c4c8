//! Shared error type for the reader and writer.
//!
//! A plain enum, no derive-macro error crate: explicit `Display`/`Error`
//! impls, and a manual `From<io::Error>` conversion so `?` works against
//! `std::io` calls.

use std::fmt;
use std::io;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CdbError>;

/// Errors surfaced by [`crate::writer::Writer`] and [`crate::reader::Reader`].
#[derive(Debug)]
pub enum CdbError {
    /// Underlying read/write failed, or a short read/write was observed
    /// where a full one was required.
    Io(io::Error),
    /// Fewer than 2048 bytes were readable at offset 0 during [`crate::reader::Reader::open`].
    CorruptHeader,
    /// A record's length prefix was inconsistent with the file, or a
    /// hash-matching slot's key did not actually match, encountered mid-probe.
    ///
    /// Never returned to callers of `get`/`find`: constructed only to carry
    /// a message to the notification sink (see [`crate::notify`]) before the
    /// probe continues to the next slot.
    CorruptRecord { offset: u64, detail: &'static str },
    /// `append` was called after `finish`.
    AlreadyFinalized,
    /// A key or value given to the writer was invalid (e.g. a length that
    /// would overflow the format's `u32` offsets).
    InvalidArgument(&'static str),
    /// Failed to close the underlying file handle. Internal: swallowed and
    /// logged by callers, never returned from a public API call.
    CloseFailure,
}

impl fmt::Display for CdbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdbError::Io(e) => write!(f, "i/o error: {e}"),
            CdbError::CorruptHeader => {
                write!(f, "corrupt header: fewer than 2048 bytes at offset 0")
            }
            CdbError::CorruptRecord { offset, detail } => {
                write!(f, "corrupt record at offset {offset}: {detail}")
            }
            CdbError::AlreadyFinalized => write!(f, "writer already finalized"),
            CdbError::InvalidArgument(detail) => write!(f, "invalid argument: {detail}"),
            CdbError::CloseFailure => write!(f, "failed to close file handle"),
        }
    }
}

impl std::error::Error for CdbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CdbError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CdbError {
    fn from(e: io::Error) -> Self {
        CdbError::Io(e)
    }
}
