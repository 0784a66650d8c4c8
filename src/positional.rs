//! Positional (offset-addressed) I/O.
//!
//! The reader's entire concurrency story rests on never touching a shared
//! file cursor: every read carries its own absolute offset. `std::fs::File`
//! exposes this natively but through two different, platform-specific
//! traits (`FileExt::read_at` on Unix, `FileExt::seek_read` on Windows).
//! [`PositionalRead`] unifies them behind one signature so the probe
//! algorithm in [`crate::reader`] is written once.
//!
//! A platform seam of one trait with two small `impl` blocks gated by
//! `cfg(unix)`/`cfg(windows)`, matching common Rust practice for wrapping
//! platform-specific `FileExt` traits behind a single signature: zero
//! duplicated algorithm code on either side.

use std::fs::File;
use std::io;

/// A file-like handle that can be read from an explicit offset without
/// disturbing any shared position cursor.
///
/// Implementations must fill `buf` completely or return an error — short
/// reads are reported as `io::ErrorKind::UnexpectedEof`, matching
/// `read_exact_at` semantics.
pub trait PositionalRead {
    /// Read `buf.len()` bytes starting at `offset`, or fail.
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()>;

    /// Total length of the underlying file, in bytes.
    fn len(&self) -> io::Result<u64>;
}

#[cfg(unix)]
impl PositionalRead for File {
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        use std::os::unix::fs::FileExt;
        FileExt::read_exact_at(self, buf, offset)
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

#[cfg(windows)]
impl PositionalRead for File {
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        use std::os::windows::fs::FileExt;
        let mut pos = offset;
        let mut filled = 0usize;
        while filled < buf.len() {
            let n = FileExt::seek_read(self, &mut buf[filled..], pos)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "positional read ended before filling buffer",
                ));
            }
            filled += n;
            pos += n as u64;
        }
        Ok(())
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_at_arbitrary_offsets_without_disturbing_cursor() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();
        tmp.flush().unwrap();
        let f = tmp.reopen().unwrap();

        let mut buf = [0u8; 4];
        PositionalRead::read_exact_at(&f, &mut buf, 3).unwrap();
        assert_eq!(&buf, b"3456");

        // Reading again at offset 0 must return the start, proving the
        // previous read did not move a shared cursor.
        PositionalRead::read_exact_at(&f, &mut buf, 0).unwrap();
        assert_eq!(&buf, b"0123");
    }

    #[test]
    fn short_file_yields_unexpected_eof() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let f = tmp.reopen().unwrap();
        let mut buf = [0u8; 8];
        let err = PositionalRead::read_exact_at(&f, &mut buf, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn len_matches_written_size() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0u8; 42]).unwrap();
        tmp.flush().unwrap();
        let f = tmp.reopen().unwrap();
        assert_eq!(PositionalRead::len(&f).unwrap(), 42);
    }
}
