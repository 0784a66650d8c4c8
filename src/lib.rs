//! CDB — Rust port of D. J. Bernstein's Constant Database format.
//!
//! An immutable, on-disk associative array mapping byte-string keys to
//! byte-string values, built once with [`writer::Writer`] and queried with
//! [`reader::Reader`] at constant cost: at most two disk reads per lookup,
//! multi-valued keys via [`reader::Find`], and any number of threads sharing
//! one open [`reader::Reader`] without locks.

pub mod cli;
pub mod codec;
pub mod error;
pub mod hash;
pub mod notify;
pub mod positional;
pub mod reader;
pub mod writer;

pub use error::{CdbError, Result};
pub use hash::hash as cdb_hash;
pub use reader::{Find, Reader};
pub use writer::Writer;
