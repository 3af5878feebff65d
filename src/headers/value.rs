//! HTTP header field value.
use std::fmt;
use std::str::from_utf8;
use std::time::SystemTime;

/// A validated HTTP header field value.
///
/// Field values may carry arbitrary visible US-ASCII/obs-text octets plus
/// horizontal tab; bare `CR`, `LF`, and `DEL` are rejected, matching
/// RFC 9110's `field-value` grammar (obsolete line folding is rejected
/// earlier, by the wire reader).
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderValue(Box<[u8]>);

impl HeaderValue {
    /// Validates and wraps a byte sequence as a header value.
    pub fn from_bytes(value: impl Into<Vec<u8>>) -> Result<HeaderValue, InvalidHeaderValue> {
        let value = value.into();
        if !value.iter().all(|&b| is_field_vchar(b)) {
            return Err(InvalidHeaderValue);
        }
        Ok(HeaderValue(value.into_boxed_slice()))
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the value as UTF-8, if it is valid UTF-8 (not all header
    /// values are, e.g. Latin-1 `obs-text` in legacy servers).
    pub fn to_str(&self) -> Result<&str, std::str::Utf8Error> {
        from_utf8(&self.0)
    }

    /// Formats an integer, e.g. a `Content-Length`.
    pub fn from_i64(value: i64) -> HeaderValue {
        let mut buf = itoa::Buffer::new();
        HeaderValue(buf.format(value).as_bytes().into())
    }

    /// Formats a timestamp as an RFC 1123 date with timezone `GMT`, the
    /// wire form required for `Date`, `Expires`, `Last-Modified`, and the
    /// other date-valued headers.
    pub fn from_date(time: SystemTime) -> HeaderValue {
        HeaderValue(httpdate::fmt_http_date(time).into_bytes().into_boxed_slice())
    }

    /// Parses this value as an RFC 1123 date.
    pub fn to_date(&self) -> Result<SystemTime, InvalidHeaderValue> {
        let text = self.to_str().map_err(|_| InvalidHeaderValue)?;
        httpdate::parse_http_date(text).map_err(|_| InvalidHeaderValue)
    }
}

#[inline]
const fn is_field_vchar(b: u8) -> bool {
    b == b'\t' || (b >= 0x20 && b != 0x7f)
}

impl std::str::FromStr for HeaderValue {
    type Err = InvalidHeaderValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeaderValue::from_bytes(s.as_bytes())
    }
}

impl TryFrom<&str> for HeaderValue {
    type Error = InvalidHeaderValue;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        HeaderValue::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Ok(s) => f.write_str(s),
            Err(_) => f.write_str(&String::from_utf8_lossy(&self.0)),
        }
    }
}

impl fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

/// Error returned when a header value contains a disallowed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHeaderValue;

impl fmt::Display for InvalidHeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("header value contains a disallowed byte")
    }
}

impl std::error::Error for InvalidHeaderValue {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_visible_ascii_and_tab() {
        assert!(HeaderValue::from_bytes(b"text/plain\t".to_vec()).is_ok());
    }

    #[test]
    fn rejects_cr_lf() {
        assert!(HeaderValue::from_bytes(b"a\r\nb".to_vec()).is_err());
    }

    #[test]
    fn displays_as_str() {
        let v = HeaderValue::from_bytes(b"chunked".to_vec()).unwrap();
        assert_eq!(v.to_string(), "chunked");
    }

    #[test]
    fn formats_integer() {
        assert_eq!(HeaderValue::from_i64(1024).to_string(), "1024");
    }

    #[test]
    fn date_round_trips_through_rfc_1123() {
        use std::time::{Duration, UNIX_EPOCH};

        let when = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let value = HeaderValue::from_date(when);
        assert!(value.to_string().ends_with("GMT"));
        assert_eq!(value.to_date().unwrap(), when);
    }
}
