//! `multipart/form-data` codec (RFC 7578).
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use crate::grammar::parse_header_params;
use crate::headers::{HeaderMap, HeaderName, HeaderValue};

const BUFFER_SIZE: usize = 8 * 1024;

/// One part of a `multipart/form-data` body: either inline text or a file
/// to stream from disk. Both carry the mandatory `Content-Disposition`
/// `name` (and, for files, `filename`).
#[derive(Debug)]
pub enum Part {
    Text(TextPart),
    File(FilePart),
}

#[derive(Debug)]
pub struct TextPart {
    pub name: String,
    pub value: String,
    pub content_type: Option<String>,
}

#[derive(Debug)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub path: PathBuf,
    /// Defaults to `text/plain` per RFC 7578 §4.4 when absent, matching
    /// this crate's rule that a missing `Content-Type` is never emitted as
    /// `Content-Language` or any other unrelated field.
    pub content_type: Option<String>,
}

impl Part {
    pub fn name(&self) -> &str {
        match self {
            Part::Text(t) => &t.name,
            Part::File(f) => &f.name,
        }
    }
}

/// A fully-buffered list of parts to be written as a `multipart/form-data`
/// body, or a reader positioned at the start of such a body to be parsed.
#[derive(Debug)]
pub struct MultipartBody {
    boundary: String,
    parts: Vec<Part>,
}

impl MultipartBody {
    pub fn new(boundary: impl Into<String>) -> MultipartBody {
        MultipartBody { boundary: boundary.into(), parts: Vec::new() }
    }

    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Sum of file sizes is not generally knowable without stat-ing every
    /// file and the encoding overhead besides, so multipart bodies never
    /// report a known size; `ClientEngine` sends them chunked.
    pub fn known_size(&self) -> Option<u64> {
        None
    }

    pub fn open_stream(self) -> Box<dyn Read + Send> {
        Box::new(MultipartWriterStream::new(self.boundary, self.parts))
    }
}

/// Writes parts as they are read, so a large file part is streamed rather
/// than buffered whole into memory.
struct MultipartWriterStream {
    boundary: String,
    parts: std::vec::IntoIter<Part>,
    buffer: Vec<u8>,
    pos: usize,
    current_file: Option<File>,
    finished: bool,
}

impl MultipartWriterStream {
    fn new(boundary: String, parts: Vec<Part>) -> Self {
        MultipartWriterStream {
            boundary,
            parts: parts.into_iter(),
            buffer: Vec::new(),
            pos: 0,
            current_file: None,
            finished: false,
        }
    }

    fn refill(&mut self) -> io::Result<()> {
        self.buffer.clear();
        self.pos = 0;

        if let Some(file) = &mut self.current_file {
            let mut chunk = vec![0u8; BUFFER_SIZE];
            let n = file.read(&mut chunk)?;
            if n > 0 {
                chunk.truncate(n);
                self.buffer = chunk;
                return Ok(());
            }
            self.current_file = None;
            self.buffer.extend_from_slice(b"\r\n");
            return Ok(());
        }

        match self.parts.next() {
            Some(Part::Text(t)) => {
                write!(
                    self.buffer,
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n",
                    self.boundary, t.name
                )?;
                let content_type = t.content_type.as_deref().unwrap_or("text/plain");
                write!(self.buffer, "Content-Type: {content_type}\r\n\r\n")?;
                self.buffer.extend_from_slice(t.value.as_bytes());
                self.buffer.extend_from_slice(b"\r\n");
            }
            Some(Part::File(f)) => {
                write!(
                    self.buffer,
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    self.boundary, f.name, f.filename
                )?;
                let content_type = f.content_type.as_deref().unwrap_or("text/plain");
                write!(self.buffer, "Content-Type: {content_type}\r\n\r\n")?;
                self.current_file = Some(File::open(&f.path)?);
            }
            None => {
                if !self.finished {
                    write!(self.buffer, "--{}--\r\n", self.boundary)?;
                    self.finished = true;
                }
            }
        }
        Ok(())
    }
}

impl Read for MultipartWriterStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.buffer.len() {
                let n = (self.buffer.len() - self.pos).min(buf.len());
                buf[..n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.finished {
                return Ok(0);
            }
            self.refill()?;
            if self.buffer.is_empty() && self.current_file.is_none() && self.finished {
                return Ok(0);
            }
        }
    }
}

/// Reads a `multipart/form-data` body from the wire, calling `on_part` for
/// each part's headers and giving the caller a bounded reader over that
/// part's body, terminated at the next boundary.
pub fn read_parts<R: Read>(
    reader: R,
    boundary: &str,
    mut on_part: impl FnMut(HeaderMap, &mut dyn Read) -> io::Result<()>,
) -> Result<(), MultipartError> {
    let mut reader = BufReader::new(reader);
    let delimiter = format!("--{boundary}");

    let mut preamble = String::new();
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).map_err(MultipartError::Io)?;
        if n == 0 {
            return Err(MultipartError::InvalidMultipartStart);
        }
        if line.trim_end_matches(['\r', '\n']) == delimiter {
            break;
        }
        preamble.push_str(&line);
        if preamble.len() > 64 * 1024 {
            return Err(MultipartError::InvalidMultipartStart);
        }
    }

    loop {
        let mut headers = HeaderMap::new();
        loop {
            let mut line = String::new();
            let n = reader.read_line(&mut line).map_err(MultipartError::Io)?;
            if n == 0 {
                return Err(MultipartError::TruncatedPart);
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                break;
            }
            let (name, value) = trimmed.split_once(':').ok_or(MultipartError::TruncatedPart)?;
            let name = HeaderName::new(name.trim()).map_err(|_| MultipartError::TruncatedPart)?;
            let value = HeaderValue::from_bytes(value.trim().as_bytes().to_vec())
                .map_err(|_| MultipartError::TruncatedPart)?;
            headers.append(name, value);
        }
        if !headers.contains("content-disposition") {
            return Err(MultipartError::TruncatedPart);
        }

        let marker = format!("\r\n{delimiter}").into_bytes();
        let mut part_reader = PartReader { inner: &mut reader, marker, pending: Vec::new(), done: false, eof: false };
        on_part(headers, &mut part_reader).map_err(MultipartError::Io)?;
        part_reader.drain_to_boundary()?;

        // `drain_to_boundary` stops right after the delimiter's leading
        // `CRLF`; the delimiter text itself (`--boundary`) is still ahead.
        let mut delimiter_bytes = vec![0u8; delimiter.len()];
        reader.read_exact(&mut delimiter_bytes).map_err(|_| MultipartError::TruncatedPart)?;
        if delimiter_bytes != delimiter.as_bytes() {
            return Err(MultipartError::TruncatedPart);
        }

        let mut terminator = [0u8; 2];
        match reader.read(&mut terminator) {
            Ok(2) if &terminator == b"--" => break,
            Ok(2) if &terminator == b"\r\n" => continue,
            _ => return Err(MultipartError::TruncatedPart),
        }
    }
    Ok(())
}

/// Gives the caller a [`Read`] over exactly one part's body, stopping at
/// the next `CRLF--boundary` delimiter without consuming it past the
/// leading `CRLF`.
///
/// The search buffer (`pending`) is staged independently of the
/// underlying `BufReader`'s own buffer: bytes are only ever released to
/// the caller once it is certain they are not a prefix of the marker, so
/// a marker that happens to straddle two underlying `read` calls (a
/// partial socket read, or a part body bigger than one `fill_buf`
/// window) is still found intact rather than silently passed through as
/// body content.
struct PartReader<'a, R> {
    inner: &'a mut BufReader<R>,
    marker: Vec<u8>,
    pending: Vec<u8>,
    done: bool,
    eof: bool,
}

impl<R: Read> PartReader<'_, R> {
    fn drain_to_boundary(&mut self) -> Result<(), MultipartError> {
        let mut scratch = [0u8; BUFFER_SIZE];
        while !self.done {
            if self.read_impl(&mut scratch)? == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Tops up `pending` with whatever the underlying reader has ready,
    /// without blocking for more than one `read` call.
    fn top_up(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; BUFFER_SIZE];
        let n = self.inner.read(&mut chunk)?;
        if n == 0 {
            self.eof = true;
        } else {
            self.pending.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }

    fn read_impl(&mut self, buf: &mut [u8]) -> Result<usize, MultipartError> {
        loop {
            if self.done {
                return Ok(0);
            }
            if let Some(pos) = find_subslice(&self.pending, &self.marker) {
                if pos == 0 {
                    self.done = true;
                    self.pending.drain(..2); // the marker's leading CRLF
                    return Ok(0);
                }
                let n = pos.min(buf.len());
                buf[..n].copy_from_slice(&self.pending[..n]);
                self.pending.drain(..n);
                return Ok(n);
            }

            // No full marker yet; the tail of `pending` up to `marker.len() - 1`
            // bytes could still become one once more data arrives, so only the
            // prefix ahead of that tail is safe to release.
            let safe_len = self.pending.len().saturating_sub(self.marker.len().saturating_sub(1));
            if safe_len > 0 {
                let n = safe_len.min(buf.len());
                buf[..n].copy_from_slice(&self.pending[..n]);
                self.pending.drain(..n);
                return Ok(n);
            }

            if self.eof {
                return Err(MultipartError::TruncatedPart);
            }
            self.top_up().map_err(MultipartError::Io)?;
        }
    }
}

impl<R: Read> Read for PartReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_impl(buf).map_err(Into::into)
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Parses the `boundary` parameter out of a `Content-Type:
/// multipart/form-data; boundary=...` value.
pub fn parse_boundary(content_type: &str) -> Option<String> {
    let (media_type, params) = content_type.split_once(';').unwrap_or((content_type, ""));
    if !media_type.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    parse_header_params(params).into_iter().find_map(|(name, value)| {
        if name == "boundary" {
            value
        } else {
            None
        }
    })
}

#[derive(Debug)]
pub enum MultipartError {
    /// The body did not begin with the expected `--boundary` delimiter.
    InvalidMultipartStart,
    /// A part ended before its terminating boundary or header block was
    /// seen.
    TruncatedPart,
    Io(io::Error),
}

impl fmt::Display for MultipartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultipartError::InvalidMultipartStart => f.write_str("multipart body missing initial boundary delimiter"),
            MultipartError::TruncatedPart => f.write_str("multipart part truncated before its terminator"),
            MultipartError::Io(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for MultipartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MultipartError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MultipartError> for io::Error {
    fn from(e: MultipartError) -> Self {
        match e {
            MultipartError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_boundary_from_content_type() {
        let boundary = parse_boundary("multipart/form-data; boundary=abc123");
        assert_eq!(boundary.as_deref(), Some("abc123"));
    }

    #[test]
    fn writes_text_part_with_default_content_type() {
        let mut body = MultipartBody::new("X");
        body.push(Part::Text(TextPart { name: "field".into(), value: "val".into(), content_type: None }));
        let mut out = String::new();
        body.open_stream().read_to_string(&mut out).unwrap();
        assert!(out.contains("Content-Disposition: form-data; name=\"field\""));
        assert!(out.contains("Content-Type: text/plain"));
        assert!(out.ends_with("--X--\r\n"));
    }

    #[test]
    fn round_trips_a_single_text_part() {
        let mut body = MultipartBody::new("BOUND");
        body.push(Part::Text(TextPart { name: "a".into(), value: "hello".into(), content_type: None }));
        let mut encoded = Vec::new();
        body.open_stream().read_to_end(&mut encoded).unwrap();

        let mut seen = Vec::new();
        read_parts(encoded.as_slice(), "BOUND", |headers, body| {
            assert!(headers.contains("content-disposition"));
            let mut s = String::new();
            body.read_to_string(&mut s)?;
            seen.push(s);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["hello".to_owned()]);
    }

    #[test]
    fn rejects_body_missing_initial_boundary() {
        let err = read_parts("not a multipart body".as_bytes(), "X", |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, MultipartError::InvalidMultipartStart));
    }

    /// A reader that only ever yields one byte per `read` call, so a part
    /// body that is otherwise small still forces the boundary marker to be
    /// reassembled across many `top_up` calls instead of arriving intact in
    /// a single underlying read.
    struct OneByteAtATime<'a>(&'a [u8]);

    impl Read for OneByteAtATime<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn finds_boundary_marker_split_across_many_small_reads() {
        let mut body = MultipartBody::new("BOUND");
        body.push(Part::Text(TextPart {
            name: "a".into(),
            value: "hello world, this body is long enough to span several one-byte reads".into(),
            content_type: None,
        }));
        let mut encoded = Vec::new();
        body.open_stream().read_to_end(&mut encoded).unwrap();

        let mut seen = Vec::new();
        read_parts(OneByteAtATime(&encoded), "BOUND", |_headers, body| {
            let mut s = String::new();
            body.read_to_string(&mut s)?;
            seen.push(s);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["hello world, this body is long enough to span several one-byte reads".to_owned()]);
    }
}
