//! Chunked transfer-coding (RFC 9112 §7.1) reader and writer.
use std::io::{self, BufRead, BufReader, Read, Write};

use super::error::StreamError;

/// Chunk sizes above this are rejected as [`StreamError::ChunkTooLarge`]
/// rather than accepted and trusted; a legitimate chunk this large is not
/// a realistic streaming unit.
const MAX_CHUNK_SIZE: u64 = 1 << 40;

/// Decodes a chunked-transfer-coded stream into its unwrapped entity body.
///
/// Trailer fields (after the terminating `0\r\n`) are read and discarded,
/// not exposed as headers — folding late trailers into the already-parsed
/// header block would let a peer inject fields the receiver's header logic
/// never validated.
pub struct ChunkedDecoder<R> {
    inner: BufReader<R>,
    remaining_in_chunk: u64,
    finished: bool,
}

impl<R: Read> ChunkedDecoder<R> {
    pub fn new(inner: R) -> ChunkedDecoder<R> {
        ChunkedDecoder { inner: BufReader::new(inner), remaining_in_chunk: 0, finished: false }
    }

    fn read_chunk_header(&mut self) -> io::Result<u64> {
        let mut line = String::new();
        self.inner.read_line(&mut line)?;
        let line = line.trim_end_matches(['\r', '\n']);
        let size_part = line.split(';').next().unwrap_or("");
        if size_part.is_empty() {
            return Err(StreamError::MalformedChunk.into());
        }
        let size = u64::from_str_radix(size_part, 16).map_err(|_| StreamError::MalformedChunk)?;
        if size > MAX_CHUNK_SIZE {
            return Err(StreamError::ChunkTooLarge.into());
        }
        Ok(size)
    }

    fn consume_crlf(&mut self) -> io::Result<()> {
        let mut crlf = [0u8; 2];
        self.inner.read_exact(&mut crlf)?;
        if &crlf != b"\r\n" {
            return Err(StreamError::MalformedChunk.into());
        }
        Ok(())
    }

    fn discard_trailers(&mut self) -> io::Result<()> {
        loop {
            let mut line = String::new();
            self.inner.read_line(&mut line)?;
            if line == "\r\n" || line == "\n" || line.is_empty() {
                break;
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for ChunkedDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished {
            return Ok(0);
        }
        if self.remaining_in_chunk == 0 {
            let size = self.read_chunk_header()?;
            if size == 0 {
                self.discard_trailers()?;
                self.finished = true;
                return Ok(0);
            }
            self.remaining_in_chunk = size;
        }

        let max = (self.remaining_in_chunk.min(buf.len() as u64)) as usize;
        let n = self.inner.read(&mut buf[..max])?;
        if n == 0 {
            return Err(StreamError::MalformedChunk.into());
        }
        self.remaining_in_chunk -= n as u64;
        if self.remaining_in_chunk == 0 {
            self.consume_crlf()?;
        }
        Ok(n)
    }
}

/// Encodes an entity body as chunked-transfer-coding, one chunk per
/// [`ChunkedEncoder::write_chunk`] call plus an explicit
/// [`ChunkedEncoder::finish`] for the terminating zero-length chunk.
pub struct ChunkedEncoder<W> {
    inner: W,
}

impl<W: Write> ChunkedEncoder<W> {
    pub fn new(inner: W) -> ChunkedEncoder<W> {
        ChunkedEncoder { inner }
    }

    /// Writes one chunk. A zero-length `data` is a no-op — use [`Self::finish`]
    /// to terminate the stream.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        write!(self.inner, "{:x}\r\n", data.len())?;
        self.inner.write_all(data)?;
        self.inner.write_all(b"\r\n")?;
        Ok(())
    }

    /// Writes the terminating `0\r\n\r\n` sequence (no trailers).
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(b"0\r\n\r\n")?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_multiple_chunks() {
        let mut buf = Vec::new();
        {
            let mut enc = ChunkedEncoder::new(&mut buf);
            enc.write_chunk(b"hello ").unwrap();
            enc.write_chunk(b"world").unwrap();
            enc.finish().unwrap();
        }
        assert_eq!(buf, b"6\r\nhello \r\n5\r\nworld\r\n0\r\n\r\n".to_vec());

        let mut dec = ChunkedDecoder::new(buf.as_slice());
        let mut out = Vec::new();
        dec.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn chunk_size_is_hex_not_decimal() {
        let mut buf = Vec::new();
        let mut enc = ChunkedEncoder::new(&mut buf);
        enc.write_chunk(&vec![0u8; 16]).unwrap();
        enc.finish().unwrap();
        assert!(buf.starts_with(b"10\r\n"));
    }

    #[test]
    fn rejects_non_hex_size() {
        let mut dec = ChunkedDecoder::new(b"zz\r\nabc\r\n".as_slice());
        let mut out = Vec::new();
        assert!(dec.read_to_end(&mut out).is_err());
    }

    #[test]
    fn discards_trailers() {
        let input = b"3\r\nabc\r\n0\r\nX-Trailer: ignored\r\n\r\n".as_slice();
        let mut dec = ChunkedDecoder::new(input);
        let mut out = Vec::new();
        dec.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }
}
