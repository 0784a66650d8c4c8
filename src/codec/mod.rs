//! Binary codec for the CDB slot directory, bucket slots, and record prefixes.
//!
//! Translated from the fixed-layout portions of D. J. Bernstein's `cdb.h`:
//! a 2048-byte slot directory of 256 `(offset, length)` pairs, 8-byte bucket
//! slots, and 8-byte record length prefixes. Every integer is an unsigned
//! 32-bit little-endian value — no padding, no alignment, no host-endianness
//! dependence.

pub mod directory;
pub mod record;
pub mod slot;

/// Number of buckets in the slot directory (one per possible hash low byte).
pub const NUM_BUCKETS: usize = 256;

/// Size in bytes of the fixed slot directory at the start of every file.
pub const DIRECTORY_SIZE: usize = NUM_BUCKETS * 8;

pub use directory::{read_directory, write_directory, DirectoryEntry};
pub use record::{decode_record_prefix, encode_record_prefix};
pub use slot::{decode_slot, encode_slot};
