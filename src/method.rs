//! HTTP request method.
use std::fmt;

use crate::grammar::is_token;

/// HTTP request method.
///
/// Unlike a closed enum, arbitrary extension tokens are accepted per RFC 9110
/// (`method = token`); [`Method::GET`] and friends are provided as
/// convenience constants over the same representation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Method(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Standard(Standard),
    Extension(Box<str>),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Standard {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Standard {
    const fn as_str(self) -> &'static str {
        match self {
            Standard::Get => "GET",
            Standard::Head => "HEAD",
            Standard::Post => "POST",
            Standard::Put => "PUT",
            Standard::Delete => "DELETE",
            Standard::Connect => "CONNECT",
            Standard::Options => "OPTIONS",
            Standard::Trace => "TRACE",
            Standard::Patch => "PATCH",
        }
    }

    const fn is_safe(self) -> bool {
        matches!(self, Standard::Get | Standard::Head | Standard::Options | Standard::Trace)
    }

    const fn is_idempotent(self) -> bool {
        self.is_safe() || matches!(self, Standard::Put | Standard::Delete)
    }
}

macro_rules! consts {
    ($($(#[$doc:meta])* $name:ident => $variant:ident;)*) => {
        impl Method {
            $(
                $(#[$doc])*
                pub const $name: Method = Method(Repr::Standard(Standard::$variant));
            )*
        }
    };
}

consts! {
    /// Safe, cacheable retrieval of the selected representation.
    GET => Get;
    /// Like `GET`, but the server must not send content in the response.
    HEAD => Head;
    /// Submit data to be processed by the target resource.
    POST => Post;
    /// Replace the target resource with the request's representation.
    PUT => Put;
    /// Remove the association between the target resource and its current state.
    DELETE => Delete;
    /// Establish a tunnel to the destination identified by the target.
    CONNECT => Connect;
    /// Query the communication options available for the target resource.
    OPTIONS => Options;
    /// Application-level loop-back test along the path to the target.
    TRACE => Trace;
    /// Apply partial modifications described in the request body ([RFC 5789]).
    ///
    /// [RFC 5789]: https://www.rfc-editor.org/rfc/rfc5789
    PATCH => Patch;
}

impl Method {
    /// Returns the method's token representation, e.g. `"GET"`.
    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Standard(s) => s.as_str(),
            Repr::Extension(s) => s,
        }
    }

    /// Parses a method token, accepting any valid RFC 7230 `token` as an
    /// extension method.
    pub fn from_bytes(src: &[u8]) -> Result<Method, UnknownMethod> {
        let s = std::str::from_utf8(src).map_err(|_| UnknownMethod)?;
        s.parse()
    }

    /// Returns `true` for the methods defined as "safe" (read-only intent):
    /// GET, HEAD, OPTIONS, TRACE.
    pub fn is_safe(&self) -> bool {
        matches!(&self.0, Repr::Standard(s) if s.is_safe())
    }

    /// Returns `true` for methods whose repeated identical application has
    /// the same effect as a single application.
    pub fn is_idempotent(&self) -> bool {
        matches!(&self.0, Repr::Standard(s) if s.is_idempotent())
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::GET
    }
}

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_token(s) {
            return Err(UnknownMethod);
        }
        Ok(match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "CONNECT" => Method::CONNECT,
            "OPTIONS" => Method::OPTIONS,
            "TRACE" => Method::TRACE,
            "PATCH" => Method::PATCH,
            _ => Method(Repr::Extension(s.into())),
        })
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a method token fails the `token` grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMethod;

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("method is not a valid token")
    }
}

impl std::error::Error for UnknownMethod {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_methods_round_trip() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::GET);
        assert_eq!(Method::POST.as_str(), "POST");
    }

    #[test]
    fn extension_method() {
        let m: Method = "PROPFIND".parse().unwrap();
        assert_eq!(m.as_str(), "PROPFIND");
        assert!(!m.is_safe());
    }

    #[test]
    fn rejects_non_token() {
        assert!("GE T".parse::<Method>().is_err());
        assert!("".parse::<Method>().is_err());
    }

    #[test]
    fn safe_and_idempotent() {
        assert!(Method::GET.is_safe());
        assert!(Method::PUT.is_idempotent());
        assert!(!Method::PUT.is_safe());
        assert!(!Method::POST.is_idempotent());
    }
}
