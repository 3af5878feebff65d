//! Ordered header field multimap.
use super::error::HeaderError;
use super::name::HeaderName;
use super::value::HeaderValue;

/// An ordered, case-insensitive multimap of header fields.
///
/// Field insertion order is preserved (required for correctly re-emitting
/// `Set-Cookie`-like repeated fields and for round-tripping a message
/// byte-for-byte modulo header reordering); lookups are a linear scan over
/// a `Vec`, which is simple, safe, and fast enough at the header-count
/// scale a single HTTP message ever reaches.
#[derive(Clone, Default, Debug)]
pub struct HeaderMap {
    fields: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderMap {
    /// Creates an empty header map.
    pub fn new() -> HeaderMap {
        HeaderMap { fields: Vec::new() }
    }

    /// Returns the number of fields, counting repeated names separately.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends a field, keeping any existing fields with the same name.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        self.fields.push((name, value));
    }

    /// Removes all fields named `name` and inserts a single field with
    /// `value`, at the position of the first removed field (or at the end
    /// if none existed). This is the "replace" semantics `with_header`
    /// builders rely on.
    pub fn with_header(&mut self, name: HeaderName, value: HeaderValue) {
        if let Some(pos) = self.fields.iter().position(|(n, _)| *n == name) {
            self.fields.retain(|(n, _)| *n != name);
            self.fields.insert(pos.min(self.fields.len()), (name, value));
        } else {
            self.fields.push((name, value));
        }
    }

    /// Returns the first value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.fields.iter().find(|(n, _)| n.matches(name)).map(|(_, v)| v)
    }

    /// Returns all values for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderValue> + 'a {
        self.fields.iter().filter(move |(n, _)| n.matches(name)).map(|(_, v)| v)
    }

    /// Returns `true` if at least one field named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n.matches(name))
    }

    /// Removes all fields named `name`, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.fields.len();
        self.fields.retain(|(n, _)| !n.matches(name));
        before - self.fields.len()
    }

    /// Iterates all fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.fields.iter().map(|(n, v)| (n, v))
    }

    /// Fetches and parses a required header with the given parser, mapping
    /// absence and parse failure to distinct errors per the header model's
    /// contract.
    pub fn get_typed<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, HeaderError> {
        let value = self.get(name).ok_or_else(|| HeaderError::NotFound { name: name.to_owned() })?;
        let text = value.to_str().map_err(|_| HeaderError::Malformed { name: name.to_owned() })?;
        parse(text).ok_or_else(|| HeaderError::Malformed { name: name.to_owned() })
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a HeaderName, &'a HeaderValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a HeaderName, &'a HeaderValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn name(s: &str) -> HeaderName {
        HeaderName::new(s).unwrap()
    }
    fn value(s: &str) -> HeaderValue {
        HeaderValue::from_bytes(s.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn append_preserves_order_and_duplicates() {
        let mut map = HeaderMap::new();
        map.append(name("set-cookie"), value("a=1"));
        map.append(name("set-cookie"), value("b=2"));
        let all: Vec<_> = map.get_all("set-cookie").map(|v| v.to_str().unwrap()).collect();
        assert_eq!(all, vec!["a=1", "b=2"]);
    }

    #[test]
    fn with_header_replaces_all_same_named_fields() {
        let mut map = HeaderMap::new();
        map.append(name("x-a"), value("1"));
        map.append(name("content-type"), value("text/plain"));
        map.append(name("x-b"), value("2"));
        map.with_header(name("content-type"), value("application/json"));
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("content-type").unwrap().to_str().unwrap(), "application/json");
    }

    #[test]
    fn lookup_is_case_insensitive_but_emission_preserves_casing() {
        let mut map = HeaderMap::new();
        map.append(name("Content-Type"), value("text/plain"));
        assert_eq!(map.get("content-type").unwrap().to_str().unwrap(), "text/plain");
        let (emitted_name, _) = map.iter().next().unwrap();
        assert_eq!(emitted_name.as_str(), "Content-Type");
    }

    #[test]
    fn get_typed_distinguishes_absent_from_malformed() {
        let mut map = HeaderMap::new();
        map.append(name("content-length"), value("abc"));
        let err = map.get_typed("content-length", |s| s.parse::<u64>().ok()).unwrap_err();
        assert!(matches!(err, HeaderError::Malformed { .. }));

        let map = HeaderMap::new();
        let err = map.get_typed::<u64>("content-length", |s| s.parse().ok()).unwrap_err();
        assert!(matches!(err, HeaderError::NotFound { .. }));
    }
}
