//! Determines how to read a message's body off the wire, honoring
//! `Transfer-Encoding` before `Content-Length`, per RFC 9112 §6.3.
use std::io::Read;

use super::error::BodyError;
use crate::headers::HeaderMap;
use crate::status::StatusCode;
use crate::stream::{layer_decoders, parse_codings, BoundedReader, ChunkedDecoder};

/// How a body is framed on the wire.
#[derive(Debug)]
enum Framing {
    Empty,
    ContentLength(u64),
    Chunked,
}

/// Inspects a message's headers (and, for a response, its status code) and
/// builds a reader that yields the decoded entity body: `Transfer-Encoding`
/// is unwrapped first (chunked, then any content-codings listed), and
/// `Content-Length` framing is honored only when no `Transfer-Encoding` is
/// present.
///
/// 1xx, 204, and 304 responses never have a body regardless of what
/// headers claim, per RFC 9110 §6.4.1 / §15.3.5 — `for_response` encodes
/// that override.
pub struct BodyDecoder;

impl BodyDecoder {
    /// Builds the decoded-body reader for a request or a response whose
    /// status does not forbid a body.
    pub fn open<'a, R: Read + 'a>(
        headers: &HeaderMap,
        transport: R,
        max_raw_length: u64,
    ) -> Result<Box<dyn Read + 'a>, BodyError> {
        let framing = Self::framing(headers)?;
        let codings = Self::content_codings(headers)?;

        let framed: Box<dyn Read> = match framing {
            Framing::Empty => Box::new(std::io::empty()),
            Framing::Chunked => Box::new(ChunkedDecoder::new(BoundedReader::new(transport, u64::MAX).with_limit(max_raw_length))),
            Framing::ContentLength(len) => Box::new(BoundedReader::new(transport, len).with_limit(max_raw_length)),
        };

        Ok(layer_decoders(framed, &codings))
    }

    /// Like [`Self::open`], but forces an empty body regardless of headers
    /// when `status` is informational, `204 No Content`, or `304 Not
    /// Modified`.
    pub fn open_for_response<'a, R: Read + 'a>(
        status: StatusCode,
        headers: &HeaderMap,
        transport: R,
        max_raw_length: u64,
    ) -> Result<Box<dyn Read + 'a>, BodyError> {
        if status.forbids_body() {
            return Ok(Box::new(std::io::empty()));
        }
        Self::open(headers, transport, max_raw_length)
    }

    fn framing(headers: &HeaderMap) -> Result<Framing, BodyError> {
        let transfer_encodings: Vec<String> =
            headers.get_all("transfer-encoding").map(|v| v.to_string()).collect();
        let content_lengths: Vec<&str> = headers
            .get_all("content-length")
            .map(|v| v.to_str().unwrap_or_default())
            .collect();

        if !transfer_encodings.is_empty() {
            if !content_lengths.is_empty() {
                return Err(BodyError::InvalidCodings);
            }
            let last = transfer_encodings.last().unwrap();
            if !last.eq_ignore_ascii_case("chunked") {
                return Err(BodyError::InvalidCodings);
            }
            return Ok(Framing::Chunked);
        }

        match content_lengths.as_slice() {
            [] => Ok(Framing::Empty),
            [single] => single
                .trim()
                .parse::<u64>()
                .map(Framing::ContentLength)
                .map_err(|_| BodyError::InvalidContentLength),
            multiple => {
                if multiple.iter().all(|v| *v == multiple[0]) {
                    multiple[0]
                        .trim()
                        .parse::<u64>()
                        .map(Framing::ContentLength)
                        .map_err(|_| BodyError::InvalidContentLength)
                } else {
                    Err(BodyError::InvalidContentLength)
                }
            }
        }
    }

    fn content_codings(headers: &HeaderMap) -> Result<Vec<crate::stream::Coding>, BodyError> {
        let raw: Vec<String> = headers
            .get("content-encoding")
            .map(|v| v.to_str().unwrap_or_default())
            .map(|s| crate::grammar::parse_list(s, ','))
            .unwrap_or_default();
        Ok(parse_codings(&raw)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::headers::{HeaderName, HeaderValue};
    use std::io::Read;

    fn headers_with(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (n, v) in pairs {
            h.append(HeaderName::new(n).unwrap(), HeaderValue::from_bytes(v.as_bytes().to_vec()).unwrap());
        }
        h
    }

    #[test]
    fn content_length_framing() {
        let headers = headers_with(&[("content-length", "5")]);
        let mut body = BodyDecoder::open(&headers, "hello extra".as_bytes(), 1024).unwrap();
        let mut out = String::new();
        body.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn chunked_takes_priority_over_content_length() {
        let headers = headers_with(&[("transfer-encoding", "chunked")]);
        let wire = b"5\r\nhello\r\n0\r\n\r\n".as_slice();
        let mut body = BodyDecoder::open(&headers, wire, 1024).unwrap();
        let mut out = String::new();
        body.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn conflicting_transfer_encoding_and_content_length_rejected() {
        let headers = headers_with(&[("transfer-encoding", "chunked"), ("content-length", "5")]);
        assert!(matches!(BodyDecoder::framing(&headers), Err(BodyError::InvalidCodings)));
    }

    #[test]
    fn no_headers_means_empty_body() {
        let headers = HeaderMap::new();
        let mut body = BodyDecoder::open(&headers, "unexpected".as_bytes(), 1024).unwrap();
        let mut out = Vec::new();
        body.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn read_limit_applies_even_under_a_larger_content_length() {
        let headers = headers_with(&[("content-length", "9")]);
        let mut body = BodyDecoder::open(&headers, "123456789".as_bytes(), 8).unwrap();
        let mut out = Vec::new();
        let err = body.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        // The structured cause survives the `io::Error` boundary rather than
        // collapsing to a formatted string, so callers can recover the exact
        // limit that was exceeded.
        let cause = err.get_ref().and_then(|e| e.downcast_ref::<crate::stream::StreamError>());
        assert!(matches!(cause, Some(crate::stream::StreamError::ReadLimitExceeded { limit: 8 })));
    }

    #[test]
    fn no_content_status_forces_empty_body_even_with_content_length() {
        let headers = headers_with(&[("content-length", "5")]);
        let mut body =
            BodyDecoder::open_for_response(StatusCode::NO_CONTENT, &headers, "hello".as_bytes(), 1024).unwrap();
        let mut out = Vec::new();
        body.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
