//! Start-line and header-block reading and writing: the boundary between
//! raw transport bytes and the header model.
mod error;

pub use error::WireError;

use std::io::{BufRead, Write};

use crate::headers::{HeaderMap, HeaderName, HeaderValue};
use crate::method::Method;
use crate::status::StatusCode;
use crate::target::Target;
use crate::version::Version;

/// Limits applied while reading a message preamble, guarding against a
/// peer that never sends a terminating `CRLF` or sends unbounded headers.
#[derive(Clone, Copy, Debug)]
pub struct WireLimits {
    /// Maximum length of any single line (start-line or header field),
    /// including the terminating `CRLF`.
    pub max_line_len: usize,
    /// Maximum number of header fields in one message.
    pub max_headers: usize,
}

impl Default for WireLimits {
    fn default() -> WireLimits {
        WireLimits { max_line_len: 8 * 1024, max_headers: 100 }
    }
}

/// Reads one `CRLF`- or bare-`LF`-terminated line, stripping the
/// terminator, enforcing `max_len`. Returns `None` at EOF with nothing
/// read.
fn read_line(reader: &mut impl BufRead, max_len: usize) -> Result<Option<String>, WireError> {
    let mut buf = Vec::new();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return if buf.is_empty() { Ok(None) } else { Err(WireError::MalformedStartLine) };
        }
        if let Some(pos) = available.iter().position(|&b| b == b'\n') {
            buf.extend_from_slice(&available[..=pos]);
            reader.consume(pos + 1);
            break;
        }
        if buf.len() + available.len() > max_len {
            return Err(WireError::LineTooLong);
        }
        buf.extend_from_slice(available);
        let n = available.len();
        reader.consume(n);
    }
    if buf.len() > max_len {
        return Err(WireError::LineTooLong);
    }
    while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
        buf.pop();
    }
    let line = String::from_utf8(buf).map_err(|_| WireError::MalformedStartLine)?;
    Ok(Some(line))
}

/// Reads a request-line: `method SP request-target SP HTTP-version`.
pub fn read_request_line(
    reader: &mut impl BufRead,
    limits: WireLimits,
) -> Result<(Method, Target, Version), WireError> {
    let line = read_line(reader, limits.max_line_len)?.ok_or(WireError::MalformedStartLine)?;
    let mut parts = line.splitn(3, ' ');
    let (method, target, version) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v)) if !m.is_empty() && !t.is_empty() => (m, t, v),
        _ => return Err(WireError::MalformedStartLine),
    };
    let method = Method::from_bytes(method.as_bytes()).map_err(|_| WireError::MalformedStartLine)?;
    let target = Target::parse(target).map_err(|_| WireError::MalformedStartLine)?;
    let version: Version = version.parse().map_err(|_| WireError::MalformedStartLine)?;
    Ok((method, target, version))
}

/// Reads a status-line: `HTTP-version SP status-code SP reason-phrase`.
pub fn read_status_line(
    reader: &mut impl BufRead,
    limits: WireLimits,
) -> Result<(Version, StatusCode, String), WireError> {
    let line = read_line(reader, limits.max_line_len)?.ok_or(WireError::MalformedStartLine)?;
    let mut parts = line.splitn(3, ' ');
    let (version, code, reason) = match (parts.next(), parts.next(), parts.next()) {
        (Some(v), Some(c), reason) if !v.is_empty() && !c.is_empty() => (v, c, reason.unwrap_or("")),
        _ => return Err(WireError::MalformedStartLine),
    };
    let version: Version = version.parse().map_err(|_| WireError::MalformedStartLine)?;
    let code: u16 = code.parse().map_err(|_| WireError::MalformedStartLine)?;
    let status = StatusCode::from_u16(code).map_err(|_| WireError::MalformedStartLine)?;
    Ok((version, status, reason.to_owned()))
}

/// Reads header fields up to the terminating empty line.
///
/// Obsolete line-folding — a continuation line starting with space or tab —
/// is rejected outright (`MalformedHeader`) rather than unfolded; RFC 9112
/// deprecates it and no sender in this crate's scope needs to produce it.
pub fn read_header_block(
    reader: &mut impl BufRead,
    limits: WireLimits,
) -> Result<HeaderMap, WireError> {
    let mut headers = HeaderMap::new();
    loop {
        let line = read_line(reader, limits.max_line_len)?.ok_or(WireError::MalformedHeader)?;
        if line.is_empty() {
            break;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            return Err(WireError::MalformedHeader);
        }
        let (name, value) = line.split_once(':').ok_or(WireError::MalformedHeader)?;
        if name.is_empty() || name.ends_with(' ') || name.ends_with('\t') {
            return Err(WireError::MalformedHeader);
        }
        let value = value.trim_matches([' ', '\t']);
        let name = HeaderName::new(name).map_err(|_| WireError::MalformedHeader)?;
        let value = HeaderValue::from_bytes(value.as_bytes().to_vec())
            .map_err(|_| WireError::MalformedHeader)?;
        headers.append(name, value);
        if headers.len() > limits.max_headers {
            return Err(WireError::TooManyHeaders);
        }
    }
    Ok(headers)
}

/// Writes a request-line.
pub fn write_request_line(
    writer: &mut impl Write,
    method: &Method,
    target: &Target,
    version: Version,
) -> std::io::Result<()> {
    write!(writer, "{method} {target} {version}\r\n")
}

/// Writes a status-line.
pub fn write_status_line(
    writer: &mut impl Write,
    version: Version,
    status: StatusCode,
    reason: &str,
) -> std::io::Result<()> {
    write!(writer, "{version} {status} {reason}\r\n")
}

/// Writes a header block, each field followed by `CRLF`, ending with the
/// terminating blank line.
pub fn write_headers(writer: &mut impl Write, headers: &HeaderMap) -> std::io::Result<()> {
    for (name, value) in headers.iter() {
        writer.write_all(name.as_str().as_bytes())?;
        writer.write_all(b": ")?;
        writer.write_all(value.as_bytes())?;
        writer.write_all(b"\r\n")?;
    }
    writer.write_all(b"\r\n")
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn reads_request_line() {
        let mut r = BufReader::new("GET /a/b?x=1 HTTP/1.1\r\n".as_bytes());
        let (method, target, version) = read_request_line(&mut r, WireLimits::default()).unwrap();
        assert_eq!(method, Method::GET);
        assert_eq!(target.path(), "/a/b");
        assert_eq!(version, Version::HTTP_11);
    }

    #[test]
    fn reads_status_line_with_reason() {
        let mut r = BufReader::new("HTTP/1.1 404 Not Found\r\n".as_bytes());
        let (version, status, reason) = read_status_line(&mut r, WireLimits::default()).unwrap();
        assert_eq!(version, Version::HTTP_11);
        assert_eq!(status.as_u16(), 404);
        assert_eq!(reason, "Not Found");
    }

    #[test]
    fn rejects_line_too_long() {
        let long = "GET ".to_owned() + &"/".repeat(20) + " HTTP/1.1\r\n";
        let mut r = BufReader::new(long.as_bytes());
        let limits = WireLimits { max_line_len: 10, max_headers: 100 };
        assert!(matches!(read_request_line(&mut r, limits), Err(WireError::LineTooLong)));
    }

    #[test]
    fn reads_header_block_and_stops_at_blank_line() {
        let mut r = BufReader::new("Host: example.com\r\nX-A: 1\r\n\r\nbody".as_bytes());
        let headers = read_header_block(&mut r, WireLimits::default()).unwrap();
        assert_eq!(headers.get("host").unwrap().to_str().unwrap(), "example.com");
        assert_eq!(headers.len(), 2);
        let mut rest = String::new();
        std::io::Read::read_to_string(&mut r, &mut rest).unwrap();
        assert_eq!(rest, "body");
    }

    #[test]
    fn rejects_obsolete_line_folding() {
        let mut r = BufReader::new("Host: example.com\r\n continuation\r\n\r\n".as_bytes());
        assert!(matches!(read_header_block(&mut r, WireLimits::default()), Err(WireError::MalformedHeader)));
    }

    #[test]
    fn rejects_too_many_headers() {
        let mut text = String::new();
        for i in 0..5 {
            text.push_str(&format!("X-{i}: v\r\n"));
        }
        text.push_str("\r\n");
        let mut r = BufReader::new(text.as_bytes());
        let limits = WireLimits { max_line_len: 8192, max_headers: 3 };
        assert!(matches!(read_header_block(&mut r, limits), Err(WireError::TooManyHeaders)));
    }

    #[test]
    fn write_round_trips_request() {
        let mut buf = Vec::new();
        write_request_line(&mut buf, &Method::GET, &Target::parse("/x").unwrap(), Version::HTTP_11).unwrap();
        let mut headers = HeaderMap::new();
        headers.append(HeaderName::host(), HeaderValue::from_bytes(b"example.com".to_vec()).unwrap());
        write_headers(&mut buf, &headers).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "GET /x HTTP/1.1\r\nhost: example.com\r\n\r\n");
    }
}
