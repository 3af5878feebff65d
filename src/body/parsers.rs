//! Typed body parsers: every one of these reads through [`BodyDecoder`]
//! rather than the raw transport, so `Transfer-Encoding`/`Content-Encoding`
//! are always honored first.
use std::io::Read;

use super::decoder::BodyDecoder;
use super::error::BodyError;
use crate::headers::HeaderMap;
use crate::multipart::{self, MultipartError, Part};
use crate::query::QueryString;
use crate::status::StatusCode;

/// Reads up to `max_length` decoded bytes, raising
/// [`BodyError::EntityTooLarge`] if more remain rather than silently
/// truncating.
pub fn read_bytes(
    headers: &HeaderMap,
    transport: impl Read,
    max_length: u64,
) -> Result<Vec<u8>, BodyError> {
    let mut body = BodyDecoder::open(headers, transport, max_length)?;
    read_capped(&mut body, max_length)
}

/// Same as [`read_bytes`], but for a response, honoring the
/// no-body-regardless-of-headers statuses.
pub fn read_bytes_for_response(
    status: StatusCode,
    headers: &HeaderMap,
    transport: impl Read,
    max_length: u64,
) -> Result<Vec<u8>, BodyError> {
    let mut body = BodyDecoder::open_for_response(status, headers, transport, max_length)?;
    read_capped(&mut body, max_length)
}

fn read_capped(reader: &mut impl Read, max_length: u64) -> Result<Vec<u8>, BodyError> {
    let mut out = Vec::new();
    let mut probe = [0u8; 8 * 1024];
    loop {
        let n = reader.read(&mut probe)?;
        if n == 0 {
            break;
        }
        if out.len() as u64 + n as u64 > max_length {
            return Err(BodyError::EntityTooLarge { limit: max_length });
        }
        out.extend_from_slice(&probe[..n]);
    }
    Ok(out)
}

/// Decodes the body as UTF-8 text.
pub fn read_text(headers: &HeaderMap, transport: impl Read, max_length: u64) -> Result<String, BodyError> {
    let bytes = read_bytes(headers, transport, max_length)?;
    String::from_utf8(bytes).map_err(|_| BodyError::InvalidContentLength)
}

/// Parses the body as `application/x-www-form-urlencoded`, preserving
/// duplicate keys as an ordered list of pairs. Use this when the caller
/// wants positional access or a field that may legitimately repeat with
/// different meanings per occurrence; use [`read_form`] when repeats of
/// the same field should be grouped together instead.
pub fn read_query(headers: &HeaderMap, transport: impl Read, max_length: u64) -> Result<QueryString, BodyError> {
    let text = read_text(headers, transport, max_length)?;
    Ok(QueryString::parse(&text))
}

/// Parses the body as `application/x-www-form-urlencoded`, grouping
/// repeated keys into a single `name -> [values]` entry in first-seen
/// order (e.g. `a=1&a=2&b=x` becomes `{"a": ["1", "2"], "b": ["x"]}`).
pub fn read_form(
    headers: &HeaderMap,
    transport: impl Read,
    max_length: u64,
) -> Result<Vec<(String, Vec<String>)>, BodyError> {
    let text = read_text(headers, transport, max_length)?;
    Ok(QueryString::parse(&text).grouped())
}

/// Writes the decoded body to `dest`, capping total bytes written at
/// `max_length`. Used for large bodies a caller wants to stream to disk
/// rather than buffer whole.
pub fn copy_to_file(
    headers: &HeaderMap,
    transport: impl Read,
    dest: &mut std::fs::File,
    max_length: u64,
) -> Result<u64, BodyError> {
    use std::io::Write;
    let mut body = BodyDecoder::open(headers, transport, max_length)?;
    let mut probe = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = body.read(&mut probe)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if total > max_length {
            return Err(BodyError::EntityTooLarge { limit: max_length });
        }
        dest.write_all(&probe[..n])?;
    }
    Ok(total)
}

/// Parses a `multipart/form-data` body into a list of in-memory text parts
/// and disk-spooled file parts, each individually capped by `max_length`.
pub fn read_multipart(
    headers: &HeaderMap,
    transport: impl Read,
    boundary: &str,
    max_length: u64,
    spool_dir: &std::path::Path,
) -> Result<Vec<Part>, BodyError> {
    let mut body = BodyDecoder::open(headers, transport, max_length)?;
    let mut parts = Vec::new();
    let mut index = 0u64;

    multipart::read_parts(&mut body, boundary, |part_headers, reader| {
        let content_disposition = part_headers
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let params = crate::grammar::parse_header_params(&content_disposition);
        let field_name = params
            .iter()
            .find(|(n, _)| n == "name")
            .and_then(|(_, v)| v.clone())
            .unwrap_or_default();
        let filename = params.iter().find(|(n, _)| n == "filename").and_then(|(_, v)| v.clone());
        let content_type = part_headers.get("content-type").and_then(|v| v.to_str().ok()).map(str::to_owned);
        let is_textual = content_type.as_deref().unwrap_or("text/plain").to_ascii_lowercase().starts_with("text/");

        if filename.is_some() || !is_textual {
            let path = spool_dir.join(format!("part-{index}"));
            index += 1;
            let mut file = std::fs::File::create(&path)?;
            std::io::copy(reader, &mut file)?;
            parts.push(Part::File(crate::multipart::FilePart {
                name: field_name,
                filename: filename.unwrap_or_default(),
                path,
                content_type,
            }));
        } else {
            let mut value = String::new();
            reader.read_to_string(&mut value)?;
            parts.push(Part::Text(crate::multipart::TextPart { name: field_name, value, content_type }));
        }
        Ok(())
    })
    .map_err(multipart_to_body_error)?;

    Ok(parts)
}

fn multipart_to_body_error(e: MultipartError) -> BodyError {
    BodyError::Io(e.into())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::headers::{HeaderName, HeaderValue};

    fn headers_with(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (n, v) in pairs {
            h.append(HeaderName::new(n).unwrap(), HeaderValue::from_bytes(v.as_bytes().to_vec()).unwrap());
        }
        h
    }

    #[test]
    fn reads_query_body_preserving_duplicates() {
        let body = "name=John+Doe&age=30";
        let headers = headers_with(&[("content-length", &body.len().to_string())]);
        let query = read_query(&headers, body.as_bytes(), 1024).unwrap();
        assert_eq!(query.get("name"), Some("John Doe"));
        assert_eq!(query.get("age"), Some("30"));
    }

    #[test]
    fn reads_form_body_grouping_duplicate_keys() {
        let body = "a=1&a=2&b=x";
        let headers = headers_with(&[("content-length", &body.len().to_string())]);
        let form = read_form(&headers, body.as_bytes(), 1024).unwrap();
        assert_eq!(
            form,
            vec![("a".to_owned(), vec!["1".to_owned(), "2".to_owned()]), ("b".to_owned(), vec!["x".to_owned()])]
        );
    }

    #[test]
    fn form_entity_round_trips_through_read_form() {
        use crate::entity::Entity;
        use std::io::Read as _;

        let entity = Entity::from_form(vec![("a", vec!["1", "2"]), ("b", vec!["x"])]);
        let mut encoded = Vec::new();
        entity.open_stream().read_to_end(&mut encoded).unwrap();
        assert_eq!(encoded, b"a=1&a=2&b=x");

        let headers = headers_with(&[("content-length", &encoded.len().to_string())]);
        let form = read_form(&headers, encoded.as_slice(), 1024).unwrap();
        assert_eq!(
            form,
            vec![("a".to_owned(), vec!["1".to_owned(), "2".to_owned()]), ("b".to_owned(), vec!["x".to_owned()])]
        );
    }

    #[test]
    fn entity_too_large_is_distinct_error() {
        let body = "x".repeat(100);
        let headers = headers_with(&[("content-length", &body.len().to_string())]);
        let err = read_bytes(&headers, body.as_bytes(), 10).unwrap_err();
        assert!(matches!(err, BodyError::EntityTooLarge { limit: 10 }));
    }

    #[test]
    fn reads_multipart_text_and_file_parts() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("source.bin");
        std::fs::File::create(&source_path).unwrap().write_all(&[0x00, 0x01, 0x02]).unwrap();

        let mut mp = crate::multipart::MultipartBody::new("B");
        mp.push(Part::Text(crate::multipart::TextPart {
            name: "greeting".into(),
            value: "hi".into(),
            content_type: None,
        }));
        mp.push(Part::File(crate::multipart::FilePart {
            name: "f".into(),
            filename: "t.bin".into(),
            path: source_path,
            content_type: Some("application/octet-stream".into()),
        }));
        let mut encoded = Vec::new();
        mp.open_stream().read_to_end(&mut encoded).unwrap();

        let headers = headers_with(&[("content-length", &encoded.len().to_string())]);
        let spool_dir = tempfile::tempdir().unwrap();
        let parts = read_multipart(&headers, encoded.as_slice(), "B", 1024 * 1024, spool_dir.path()).unwrap();

        assert_eq!(parts.len(), 2);
        match &parts[0] {
            Part::Text(t) => {
                assert_eq!(t.name, "greeting");
                assert_eq!(t.value, "hi");
            }
            Part::File(_) => panic!("expected the first part to be text"),
        }
        match &parts[1] {
            Part::File(f) => {
                assert_eq!(f.name, "f");
                assert_eq!(f.filename, "t.bin");
                let spooled = std::fs::read(&f.path).unwrap();
                assert_eq!(spooled, vec![0x00, 0x01, 0x02]);
            }
            Part::Text(_) => panic!("expected the second part to be a file"),
        }
    }
}
