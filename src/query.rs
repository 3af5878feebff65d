//! Query-string and `application/x-www-form-urlencoded` body parsing.
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by [`QueryString::to_string`]; everything else
/// is percent-encoded, matching `application/x-www-form-urlencoded`'s
/// practice of leaving a small unreserved set bare.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

/// An ordered sequence of `(name, value)` pairs, duplicates preserved.
///
/// Both the URL query-string and the `application/x-www-form-urlencoded`
/// body format share this grammar; [`QueryString::parse`] decodes either.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> QueryString {
        QueryString { pairs: Vec::new() }
    }

    /// Parses a `name=value&name=value` string (as found after `?` or as an
    /// entire form body), percent-decoding names and values and treating
    /// `+` as a literal encoded space per the form media type.
    pub fn parse(s: &str) -> QueryString {
        let mut pairs = Vec::new();
        for item in s.split('&') {
            if item.is_empty() {
                continue;
            }
            let (name, value) = match item.split_once('=') {
                Some((n, v)) => (n, v),
                None => (item, ""),
            };
            pairs.push((decode_component(name), decode_component(value)));
        }
        QueryString { pairs }
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in order — duplicate keys (e.g.
    /// `a=1&a=2`) are never silently collapsed to the last one.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs.iter().filter(move |(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Groups values by name into first-seen order, for callers that want
    /// a `name -> Vec<value>` view instead of the flat pair list.
    pub fn grouped(&self) -> Vec<(String, Vec<String>)> {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (name, value) in &self.pairs {
            match grouped.iter_mut().find(|(n, _)| n == name) {
                Some((_, values)) => values.push(value.clone()),
                None => grouped.push((name.clone(), vec![value.clone()])),
            }
        }
        grouped
    }

    /// Builds a `QueryString` from a `name -> values` grouping, the inverse
    /// of [`Self::grouped`] — each name's values are appended in the order
    /// given, and names are emitted in the order `entries` yields them, so
    /// an ordered `Vec<(_, _)>` round-trips deterministically (an unordered
    /// map does not promise which name comes first, only that a given input
    /// always produces the same output for that input's own iteration
    /// order).
    pub fn from_grouped<N, V, I>(entries: I) -> QueryString
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut qs = QueryString::new();
        for (name, values) in entries {
            let name = name.into();
            for value in values {
                qs.append(name.clone(), value.into());
            }
        }
        qs
    }
}

fn decode_component(s: &str) -> String {
    let replaced = s.replace('+', " ");
    percent_decode_str(&replaced).decode_utf8_lossy().into_owned()
}

impl std::fmt::Display for QueryString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(
                f,
                "{}={}",
                utf8_percent_encode(name, FORM_ENCODE_SET),
                utf8_percent_encode(value, FORM_ENCODE_SET),
            )?;
        }
        Ok(())
    }
}

impl std::str::FromStr for QueryString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(QueryString::parse(s))
    }
}

impl FromIterator<(String, String)> for QueryString {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        QueryString { pairs: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_and_decodes() {
        let q = QueryString::parse("name=John+Doe&tag=a%2Bb");
        assert_eq!(q.get("name"), Some("John Doe"));
        assert_eq!(q.get("tag"), Some("a+b"));
    }

    #[test]
    fn preserves_duplicate_keys() {
        let q = QueryString::parse("a=1&a=2&b=3");
        assert_eq!(q.get_all("a").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(q.grouped(), vec![
            ("a".to_owned(), vec!["1".to_owned(), "2".to_owned()]),
            ("b".to_owned(), vec!["3".to_owned()]),
        ]);
    }

    #[test]
    fn round_trips_through_display() {
        let mut q = QueryString::new();
        q.append("name", "John Doe");
        assert_eq!(q.to_string(), "name=John%20Doe");
        assert_eq!(QueryString::parse(&q.to_string()).get("name"), Some("John Doe"));
    }

    #[test]
    fn empty_string_parses_empty() {
        assert!(QueryString::parse("").is_empty());
    }

    #[test]
    fn from_grouped_round_trips_with_grouped() {
        let q = QueryString::from_grouped(vec![
            ("a", vec!["1", "2"]),
            ("b", vec!["x"]),
        ]);
        assert_eq!(q.to_string(), "a=1&a=2&b=x");
        assert_eq!(q.grouped(), vec![
            ("a".to_owned(), vec!["1".to_owned(), "2".to_owned()]),
            ("b".to_owned(), vec!["x".to_owned()]),
        ]);
    }
}
