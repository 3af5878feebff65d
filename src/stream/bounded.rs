//! A size-limited [`Read`] adapter.
use std::io::{self, Read};

use super::error::StreamError;

/// Wraps a reader with two independent limits:
///
/// - `capacity` (a hard cap): reads never return more than `capacity` bytes
///   total; once reached, the stream behaves as if it hit EOF. This models
///   a known `Content-Length` or a fixed buffer a caller wants to cap at.
/// - `limit` (a soft cap, optional): if more than `limit` bytes are ever
///   requested from the underlying reader, [`StreamError::ReadLimitExceeded`]
///   is raised instead of silently truncating. This is the guard used for
///   unbounded bodies (chunked, no declared length) so a malicious or
///   misbehaving peer cannot exhaust memory.
pub struct BoundedReader<R> {
    inner: R,
    capacity: u64,
    limit: Option<u64>,
    read: u64,
}

impl<R: Read> BoundedReader<R> {
    /// Wraps `inner`, permitting at most `capacity` bytes to ever be read
    /// and returning EOF once that many bytes have been produced.
    pub fn new(inner: R, capacity: u64) -> BoundedReader<R> {
        BoundedReader { inner, capacity, limit: None, read: 0 }
    }

    /// Additionally enforces a soft `limit`: exceeding it raises
    /// [`StreamError::ReadLimitExceeded`] rather than truncating.
    pub fn with_limit(mut self, limit: u64) -> BoundedReader<R> {
        self.limit = Some(limit);
        self
    }

    /// Total bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining_capacity = self.capacity.saturating_sub(self.read);
        if remaining_capacity == 0 {
            return Ok(0);
        }
        let max = remaining_capacity.min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max])?;
        self.read += n as u64;
        if let Some(limit) = self.limit {
            if self.read > limit {
                return Err(StreamError::ReadLimitExceeded { limit }.into());
            }
        }
        Ok(n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Read;

    #[test]
    fn caps_at_capacity() {
        let data = b"hello world".as_slice();
        let mut reader = BoundedReader::new(data, 5);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn soft_limit_raises_error() {
        let data = vec![0u8; 100];
        let mut reader = BoundedReader::new(data.as_slice(), 1000).with_limit(10);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn exact_capacity_then_eof() {
        let data = b"abc".as_slice();
        let mut reader = BoundedReader::new(data, 3);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
        assert_eq!(reader.bytes_read(), 3);
    }
}
