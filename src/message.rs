//! The [`Request`] and [`Response`] message types.
//!
//! Both are built with consuming `with_*` methods rather than mutation
//! through `&mut self`: a message under construction moves from one
//! immutable value to the next, instead of exposing interior mutability
//! that a caller could observe half-applied.
use crate::entity::Entity;
use crate::headers::{HeaderError, HeaderMap, HeaderName, HeaderValue};
use crate::method::Method;
use crate::status::StatusCode;
use crate::target::Target;
use crate::version::Version;

#[derive(Debug)]
pub struct Request {
    method: Method,
    target: Target,
    version: Version,
    headers: HeaderMap,
    body: Entity,
}

impl Request {
    pub fn new(method: Method, target: Target) -> Request {
        Request { method, target, version: Version::default(), headers: HeaderMap::new(), body: Entity::Empty }
    }

    pub fn with_version(mut self, version: Version) -> Request {
        self.version = version;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Request {
        self.headers.with_header(name, value);
        self
    }

    pub fn append_header(mut self, name: HeaderName, value: HeaderValue) -> Request {
        self.headers.append(name, value);
        self
    }

    /// Appends several headers without removing any existing field, in the
    /// order given.
    pub fn add_headers(mut self, fields: impl IntoIterator<Item = (HeaderName, HeaderValue)>) -> Request {
        for (name, value) in fields {
            self.headers.append(name, value);
        }
        self
    }

    /// Removes every field matching any of `names` (case-insensitive).
    pub fn remove_headers<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Request {
        for name in names {
            self.headers.remove(name);
        }
        self
    }

    pub fn with_body(mut self, body: Entity) -> Request {
        self.body = body;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Entity {
        &self.body
    }

    pub fn into_parts(self) -> (Method, Target, Version, HeaderMap, Entity) {
        (self.method, self.target, self.version, self.headers, self.body)
    }

    /// Rebuilds a `Request` from parts previously taken apart with
    /// [`Request::into_parts`] — the inverse, so a caller can mutate the
    /// extracted [`HeaderMap`] (e.g. via [`HeaderMap::remove`]) and hand
    /// the pieces back.
    pub fn from_parts(method: Method, target: Target, version: Version, headers: HeaderMap, body: Entity) -> Request {
        Request { method, target, version, headers, body }
    }

    pub fn header(&self, name: &str) -> Result<&HeaderValue, HeaderError> {
        self.headers.get(name).ok_or_else(|| HeaderError::NotFound { name: name.to_owned() })
    }
}

#[derive(Debug)]
pub struct Response {
    version: Version,
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
    body: Entity,
}

impl Response {
    pub fn new(status: StatusCode) -> Response {
        let reason = crate::status::canonical_reason(status.as_u16()).to_owned();
        Response { version: Version::default(), status, reason, headers: HeaderMap::new(), body: Entity::Empty }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Response {
        self.reason = reason.into();
        self
    }

    pub fn with_version(mut self, version: Version) -> Response {
        self.version = version;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Response {
        self.headers.with_header(name, value);
        self
    }

    pub fn append_header(mut self, name: HeaderName, value: HeaderValue) -> Response {
        self.headers.append(name, value);
        self
    }

    /// Appends several headers without removing any existing field, in the
    /// order given.
    pub fn add_headers(mut self, fields: impl IntoIterator<Item = (HeaderName, HeaderValue)>) -> Response {
        for (name, value) in fields {
            self.headers.append(name, value);
        }
        self
    }

    /// Removes every field matching any of `names` (case-insensitive).
    pub fn remove_headers<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Response {
        for name in names {
            self.headers.remove(name);
        }
        self
    }

    pub fn with_body(mut self, body: Entity) -> Response {
        self.body = body;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Entity {
        &self.body
    }

    pub fn into_parts(self) -> (Version, StatusCode, String, HeaderMap, Entity) {
        (self.version, self.status, self.reason, self.headers, self.body)
    }

    /// Rebuilds a `Response` from parts previously taken apart with
    /// [`Response::into_parts`].
    pub fn from_parts(
        version: Version,
        status: StatusCode,
        reason: String,
        headers: HeaderMap,
        body: Entity,
    ) -> Response {
        Response { version, status, reason, headers, body }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_builder_replaces_same_named_header() {
        let req = Request::new(Method::GET, Target::parse("/").unwrap())
            .with_header(HeaderName::host(), HeaderValue::from_bytes(b"a.com".to_vec()).unwrap())
            .with_header(HeaderName::host(), HeaderValue::from_bytes(b"b.com".to_vec()).unwrap());
        assert_eq!(req.header("host").unwrap().to_str().unwrap(), "b.com");
        assert_eq!(req.headers().len(), 1);
    }

    #[test]
    fn response_default_reason_matches_status() {
        let resp = Response::new(StatusCode::NOT_FOUND);
        assert_eq!(resp.reason(), "Not Found");
    }

    #[test]
    fn add_headers_appends_without_removing_existing() {
        let req = Request::new(Method::GET, Target::parse("/").unwrap())
            .with_header(HeaderName::host(), HeaderValue::from_bytes(b"a.com".to_vec()).unwrap())
            .add_headers([
                (HeaderName::new("x-a").unwrap(), HeaderValue::from_bytes(b"1".to_vec()).unwrap()),
                (HeaderName::new("x-b").unwrap(), HeaderValue::from_bytes(b"2".to_vec()).unwrap()),
            ]);
        assert_eq!(req.headers().len(), 3);
        assert_eq!(req.header("x-a").unwrap().to_str().unwrap(), "1");
        assert_eq!(req.header("x-b").unwrap().to_str().unwrap(), "2");
    }

    #[test]
    fn remove_headers_is_case_insensitive_and_batched() {
        let req = Request::new(Method::GET, Target::parse("/").unwrap())
            .with_header(HeaderName::host(), HeaderValue::from_bytes(b"a.com".to_vec()).unwrap())
            .append_header(HeaderName::new("X-A").unwrap(), HeaderValue::from_bytes(b"1".to_vec()).unwrap())
            .append_header(HeaderName::new("x-b").unwrap(), HeaderValue::from_bytes(b"2".to_vec()).unwrap())
            .remove_headers(["host", "x-a"]);
        assert_eq!(req.headers().len(), 1);
        assert!(req.header("host").is_err());
        assert!(req.header("x-a").is_err());
        assert_eq!(req.header("x-b").unwrap().to_str().unwrap(), "2");
    }

    #[test]
    fn from_parts_is_the_inverse_of_into_parts() {
        let req = Request::new(Method::GET, Target::parse("/a").unwrap())
            .with_header(HeaderName::host(), HeaderValue::from_bytes(b"a.com".to_vec()).unwrap());
        let (method, target, version, headers, body) = req.into_parts();
        let rebuilt = Request::from_parts(method, target, version, headers, body);
        assert_eq!(rebuilt.header("host").unwrap().to_str().unwrap(), "a.com");
    }

    #[test]
    fn response_remove_headers_then_rebuild_from_parts() {
        let resp = Response::new(StatusCode::OK)
            .append_header(HeaderName::new("set-cookie").unwrap(), HeaderValue::from_bytes(b"a=1".to_vec()).unwrap())
            .append_header(HeaderName::new("set-cookie").unwrap(), HeaderValue::from_bytes(b"b=2".to_vec()).unwrap());
        let (version, status, reason, mut headers, body) = resp.into_parts();
        headers.remove("set-cookie");
        let resp = Response::from_parts(version, status, reason, headers, body);
        assert!(!resp.headers().contains("set-cookie"));
    }
}
