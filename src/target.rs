//! Request-target grammar (RFC 9112 §3.2): origin-form and absolute-form.
//!
//! CONNECT's authority-form and OPTIONS' asterisk-form are Non-goals (see
//! `SPEC_FULL.md`); only the two forms the client engine and wire codec
//! exchange with an origin server are modeled.
use std::fmt;

/// A parsed request-target: either `origin-form` (`/path?query`, the form
/// carried on the wire to an origin server) or `absolute-form` (a full
/// `scheme://host[:port]/path?query`, the form a client builds a request
/// from before the engine rewrites it to origin-form for transmission).
#[derive(Clone, PartialEq, Eq)]
pub enum Target {
    Origin { path: String, query: Option<String> },
    Absolute {
        scheme: String,
        host: String,
        port: Option<u16>,
        path: String,
        query: Option<String>,
    },
}

impl Target {
    /// Parses either form.
    pub fn parse(s: &str) -> Result<Target, InvalidTarget> {
        if let Some(rest) = s.strip_prefix("http://").or_else(|| s.strip_prefix("https://")) {
            let scheme = s[..s.find(':').ok_or(InvalidTarget)?].to_ascii_lowercase();
            let (authority, path_and_query) = match rest.find('/') {
                Some(i) => (&rest[..i], &rest[i..]),
                None => (rest, "/"),
            };
            if authority.is_empty() {
                return Err(InvalidTarget);
            }
            let (host, port) = match authority.rsplit_once(':') {
                Some((h, p)) => (h, Some(p.parse::<u16>().map_err(|_| InvalidTarget)?)),
                None => (authority, None),
            };
            if host.is_empty() {
                return Err(InvalidTarget);
            }
            let (path, query) = split_path_query(path_and_query);
            Ok(Target::Absolute {
                scheme,
                host: host.to_owned(),
                port,
                path: path.to_owned(),
                query: query.map(str::to_owned),
            })
        } else {
            if !s.starts_with('/') {
                return Err(InvalidTarget);
            }
            let (path, query) = split_path_query(s);
            Ok(Target::Origin { path: path.to_owned(), query: query.map(str::to_owned) })
        }
    }

    /// Returns the request-path component (always present).
    pub fn path(&self) -> &str {
        match self {
            Target::Origin { path, .. } => path,
            Target::Absolute { path, .. } => path,
        }
    }

    /// Returns the raw query-string, if any (without the leading `?`).
    pub fn query(&self) -> Option<&str> {
        match self {
            Target::Origin { query, .. } => query.as_deref(),
            Target::Absolute { query, .. } => query.as_deref(),
        }
    }

    /// Returns the scheme of an absolute-form target, or `None` for
    /// origin-form (which carries no scheme of its own).
    pub fn scheme(&self) -> Option<&str> {
        match self {
            Target::Origin { .. } => None,
            Target::Absolute { scheme, .. } => Some(scheme),
        }
    }

    /// Returns the `(host, port)` pair carried by an absolute-form target,
    /// used by the client engine to derive the `Host` header and the
    /// connection's destination when a caller builds a request this way.
    pub fn authority(&self) -> Option<(&str, Option<u16>)> {
        match self {
            Target::Origin { .. } => None,
            Target::Absolute { host, port, .. } => Some((host, *port)),
        }
    }

    /// Rewrites this target to origin-form, as the client engine does
    /// before writing the request line to the wire.
    pub fn into_origin_form(self) -> Target {
        match self {
            Target::Origin { .. } => self,
            Target::Absolute { path, query, .. } => Target::Origin { path, query },
        }
    }
}

fn split_path_query(s: &str) -> (&str, Option<&str>) {
    match s.find('?') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Origin { path, query } => {
                f.write_str(path)?;
                if let Some(q) = query {
                    write!(f, "?{q}")?;
                }
                Ok(())
            }
            Target::Absolute { scheme, host, port, path, query } => {
                write!(f, "{scheme}://{host}")?;
                if let Some(p) = port {
                    write!(f, ":{p}")?;
                }
                f.write_str(path)?;
                if let Some(q) = query {
                    write!(f, "?{q}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({self})")
    }
}

impl std::str::FromStr for Target {
    type Err = InvalidTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s)
    }
}

/// Error returned when a request-target matches neither origin-form nor
/// absolute-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTarget;

impl fmt::Display for InvalidTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request-target is neither origin-form nor absolute-form")
    }
}

impl std::error::Error for InvalidTarget {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_origin_form() {
        let t = Target::parse("/a/b?x=1").unwrap();
        assert_eq!(t.path(), "/a/b");
        assert_eq!(t.query(), Some("x=1"));
    }

    #[test]
    fn parses_absolute_form_with_port() {
        let t = Target::parse("http://example.com:8080/p").unwrap();
        assert_eq!(t.authority(), Some(("example.com", Some(8080))));
        assert_eq!(t.path(), "/p");
    }

    #[test]
    fn absolute_form_defaults_path_to_root() {
        let t = Target::parse("https://example.com").unwrap();
        assert_eq!(t.path(), "/");
    }

    #[test]
    fn rewrites_to_origin_form() {
        let t = Target::parse("http://example.com/p?q=1").unwrap().into_origin_form();
        assert_eq!(t.to_string(), "/p?q=1");
    }

    #[test]
    fn rejects_malformed() {
        assert!(Target::parse("relative/path").is_err());
        assert!(Target::parse("http://").is_err());
    }
}
