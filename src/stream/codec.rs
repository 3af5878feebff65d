//! Content-coding (`gzip`, `deflate`, `identity`) reader/writer wrapping.
use std::io::{self, Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use super::error::StreamError;

/// Maximum number of nested codings a `Content-Encoding` list may apply
/// (e.g. `gzip, gzip, gzip, ...`); beyond this a peer is almost certainly
/// attempting a decompression-bomb style attack rather than real content
/// negotiation.
pub const MAX_NESTED_CODINGS: usize = 6;

/// A single content-coding token recognized by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coding {
    Identity,
    Gzip,
    Deflate,
}

impl Coding {
    pub fn parse(token: &str) -> Option<Coding> {
        match token.trim().to_ascii_lowercase().as_str() {
            "identity" => Some(Coding::Identity),
            "gzip" | "x-gzip" => Some(Coding::Gzip),
            "deflate" => Some(Coding::Deflate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Coding::Identity => "identity",
            Coding::Gzip => "gzip",
            Coding::Deflate => "deflate",
        }
    }
}

/// Parses a `Content-Encoding`/`Transfer-Encoding` coding list (outermost
/// coding listed last, as applied during encoding), rejecting unknown
/// tokens and lists deeper than [`MAX_NESTED_CODINGS`].
pub fn parse_codings(list: &[String]) -> Result<Vec<Coding>, StreamError> {
    if list.len() > MAX_NESTED_CODINGS {
        return Err(StreamError::UnsupportedCoding(format!(
            "{} nested codings exceeds maximum of {MAX_NESTED_CODINGS}",
            list.len()
        )));
    }
    list.iter()
        .map(|t| Coding::parse(t).ok_or_else(|| StreamError::UnsupportedCoding(t.clone())))
        .collect()
}

/// A reader that applies content-decodings in reverse (innermost-applied
/// first) order, as they were layered on by the sender.
pub enum ContentReader<R: Read> {
    Identity(R),
    Gzip(Box<GzDecoder<R>>),
    Deflate(Box<ZlibDecoder<R>>),
}

impl<R: Read> ContentReader<R> {
    pub fn wrap(inner: R, coding: Coding) -> ContentReader<R> {
        match coding {
            Coding::Identity => ContentReader::Identity(inner),
            Coding::Gzip => ContentReader::Gzip(Box::new(GzDecoder::new(inner))),
            Coding::Deflate => ContentReader::Deflate(Box::new(ZlibDecoder::new(inner))),
        }
    }
}

impl<R: Read> Read for ContentReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ContentReader::Identity(r) => r.read(buf),
            ContentReader::Gzip(r) => r.read(buf),
            ContentReader::Deflate(r) => r.read(buf),
        }
    }
}

/// Applies a chain of codings to a reader, outermost (last listed) first,
/// so the innermost (first applied by the sender) is decoded last. Each
/// step delegates to [`ContentReader::wrap`] rather than re-matching on
/// `Coding` itself.
pub fn layer_decoders<R: Read>(inner: R, codings: &[Coding]) -> Box<dyn Read + '_>
where
    R: 'static,
{
    let mut reader: Box<dyn Read> = Box::new(inner);
    for coding in codings.iter().rev() {
        reader = Box::new(ContentReader::wrap(reader, *coding));
    }
    reader
}

/// A writer that applies a single content-coding to outgoing data; used by
/// the multipart and client-engine writers when emitting a precompressed
/// body is needed. `finish` must be called to flush trailing compressed
/// bytes.
pub enum ContentWriter<W: Write> {
    Identity(W),
    Gzip(Box<GzEncoder<W>>),
    Deflate(Box<ZlibEncoder<W>>),
}

impl<W: Write> ContentWriter<W> {
    pub fn wrap(inner: W, coding: Coding) -> ContentWriter<W> {
        match coding {
            Coding::Identity => ContentWriter::Identity(inner),
            Coding::Gzip => ContentWriter::Gzip(Box::new(GzEncoder::new(inner, Compression::default()))),
            Coding::Deflate => ContentWriter::Deflate(Box::new(ZlibEncoder::new(inner, Compression::default()))),
        }
    }

    pub fn finish(self) -> io::Result<W> {
        match self {
            ContentWriter::Identity(w) => Ok(w),
            ContentWriter::Gzip(w) => w.finish(),
            ContentWriter::Deflate(w) => w.finish(),
        }
    }
}

impl<W: Write> Write for ContentWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ContentWriter::Identity(w) => w.write(buf),
            ContentWriter::Gzip(w) => w.write(buf),
            ContentWriter::Deflate(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ContentWriter::Identity(w) => w.flush(),
            ContentWriter::Gzip(w) => w.flush(),
            ContentWriter::Deflate(w) => w.flush(),
        }
    }
}
