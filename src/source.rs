//! Bounds-checked byte cursor feeding the pull-based codec crates.

use std::io::{self, BufRead, Read, Seek, SeekFrom};

/// Cursor over a caller-owned byte buffer.
///
/// Adapts an in-memory buffer to the `std::io` traits the codec crates pull
/// from. Reads go short at the end of the buffer (the driving codec turns
/// exhaustion into its own truncation error); seeks are bounds-checked
/// against the total length and fail outright instead of clamping or
/// extending past the end. The type is read-only by construction and lives
/// only for the duration of a single decode call.
#[derive(Debug)]
pub(crate) struct ByteSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteSource<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl Read for ByteSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl BufRead for ByteSource<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.data[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.data.len());
    }
}

impl Seek for ByteSource<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.data.len() as i128;
        let target = match pos {
            SeekFrom::Start(off) => off as i128,
            SeekFrom::Current(off) => self.pos as i128 + off as i128,
            SeekFrom::End(off) => len + off as i128,
        };
        if target < 0 || target > len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek outside of buffer",
            ));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_goes_short_at_end() {
        let mut src = ByteSource::new(&[1, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(src.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        // Exhausted: further reads report zero bytes, never an error.
        assert_eq!(src.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn read_in_chunks() {
        let mut src = ByteSource::new(&[1, 2, 3, 4, 5]);
        let mut buf = [0u8; 2];
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [3, 4]);
        assert_eq!(src.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
    }

    #[test]
    fn seek_absolute_and_relative() {
        let mut src = ByteSource::new(&[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(src.seek(SeekFrom::Start(4)).unwrap(), 4);
        assert_eq!(src.seek(SeekFrom::Current(-2)).unwrap(), 2);
        assert_eq!(src.seek(SeekFrom::End(-3)).unwrap(), 5);
        // Seeking exactly to the end is in range.
        assert_eq!(src.seek(SeekFrom::End(0)).unwrap(), 8);
    }

    #[test]
    fn seek_out_of_range_fails() {
        let mut src = ByteSource::new(&[0, 1, 2, 3]);
        assert!(src.seek(SeekFrom::Start(5)).is_err());
        assert!(src.seek(SeekFrom::Current(-1)).is_err());
        assert!(src.seek(SeekFrom::End(1)).is_err());
        assert!(src.seek(SeekFrom::End(-5)).is_err());
        // A failed seek leaves the cursor where it was.
        let mut buf = [0u8; 1];
        assert_eq!(src.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 0);
    }
}
