//! HTTP header field name.
use std::fmt;

use crate::grammar::is_token;

/// A validated HTTP header field name.
///
/// The casing supplied at construction is kept verbatim for emission (a
/// server's `Content-Type` should come back out as `Content-Type`, not
/// `content-type`); equality, hashing, and lookup all compare
/// case-insensitively, matching RFC 9110's field-name comparison rule.
#[derive(Clone)]
pub struct HeaderName(Box<str>);

impl HeaderName {
    /// Returns `true` if this name is the same field, ignoring case.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &HeaderName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for HeaderName {}

impl std::hash::Hash for HeaderName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            b.to_ascii_lowercase().hash(state);
        }
    }
}

macro_rules! standard_names {
    ($($(#[$doc:meta])* $id:ident => $name:literal;)*) => {
        impl HeaderName {
            $(
                $(#[$doc])*
                pub fn $id() -> HeaderName {
                    HeaderName($name.into())
                }
            )*
        }
    };
}

standard_names! {
    host => "host";
    user_agent => "user-agent";
    connection => "connection";
    content_length => "content-length";
    transfer_encoding => "transfer-encoding";
    content_encoding => "content-encoding";
    content_type => "content-type";
    content_disposition => "content-disposition";
    content_language => "content-language";
    accept_encoding => "accept-encoding";
    date => "date";
    trailer => "trailer";
    te => "te";
    expect => "expect";
    location => "location";
    authorization => "authorization";
}

impl HeaderName {
    /// Validates and wraps a header field name. Must be a non-empty
    /// RFC 7230 `token`.
    pub fn new(name: &str) -> Result<HeaderName, InvalidHeaderName> {
        if !is_token(name) {
            return Err(InvalidHeaderName);
        }
        Ok(HeaderName(name.into()))
    }

    /// Returns the name in its original casing, as supplied at construction.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for HeaderName {
    type Err = InvalidHeaderName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeaderName::new(s)
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Error returned when a header name fails the `token` grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHeaderName;

impl fmt::Display for InvalidHeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("header name is not a valid token")
    }
}

impl std::error::Error for InvalidHeaderName {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn preserves_casing_for_emission() {
        assert_eq!(HeaderName::new("Content-Type").unwrap().as_str(), "Content-Type");
    }

    #[test]
    fn compares_case_insensitively() {
        assert_eq!(HeaderName::new("Content-Type").unwrap(), HeaderName::new("content-type").unwrap());
        assert!(HeaderName::new("Content-Type").unwrap().matches("CONTENT-TYPE"));
    }

    #[test]
    fn rejects_non_token() {
        assert!(HeaderName::new("bad name").is_err());
        assert!(HeaderName::new("").is_err());
    }

    #[test]
    fn standard_constructors_match_new() {
        assert_eq!(HeaderName::host(), HeaderName::new("Host").unwrap());
    }
}
