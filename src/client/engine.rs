//! Single-exchange blocking request/response engine.
use std::io::{self, BufRead, BufReader, Read, Write};

use super::config::ClientConfig;
use super::error::ClientError;
use super::transport::Transport;
use crate::body::parsers::read_bytes_for_response;
use crate::headers::{HeaderMap, HeaderName, HeaderValue};
use crate::message::{Request, Response};
use crate::status::StatusCode;
use crate::target::Target;
use crate::version::Version;
use crate::wire;

/// Sends one request over an already-connected `transport` and hands the
/// response (status line, headers, and a body reader) to `handler`.
///
/// The transport is always closed when `handler` returns — whether it
/// returned normally or the body was only partially read — so a caller
/// can never forget to release a connection this engine does not pool.
pub struct ClientEngine;

impl ClientEngine {
    pub fn send<T, H, R>(
        config: &ClientConfig,
        mut transport: T,
        request: Request,
        handler: H,
    ) -> Result<R, ClientError>
    where
        T: Transport,
        H: FnOnce(Response, &mut dyn Read) -> R,
    {
        let result = Self::exchange(config, &mut transport, request, handler);
        // Deliberate best-effort close: the exchange's own error (if any)
        // is what the caller sees, not a failure to shut down a socket
        // that might already be half-dead.
        let _ = transport.shutdown_write();
        drop(transport);
        result
    }

    fn exchange<T, H, R>(
        config: &ClientConfig,
        transport: &mut T,
        request: Request,
        handler: H,
    ) -> Result<R, ClientError>
    where
        T: Transport,
        H: FnOnce(Response, &mut dyn Read) -> R,
    {
        let (method, target, version, mut headers, mut body) = request.into_parts();

        let (host, port) = target.authority().ok_or(ClientError::InvalidTarget)?;
        match target.scheme() {
            Some("http") | Some("https") => {}
            _ => return Err(ClientError::InvalidTarget),
        }
        let host_value = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };
        headers.with_header(HeaderName::host(), HeaderValue::from_bytes(host_value.into_bytes())?);

        if !headers.contains("user-agent") {
            headers.with_header(
                HeaderName::user_agent(),
                HeaderValue::from_bytes(config.user_agent.as_bytes().to_vec())?,
            );
        }
        shape_connection_header(&mut headers)?;

        let origin_target = target.into_origin_form();
        let expects_continue = headers
            .get("expect")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("100-continue"))
            .unwrap_or(false);

        Self::shape_body_headers(&mut headers, &mut body, &method)?;

        wire::write_request_line(transport, &method, &origin_target, version)?;
        wire::write_headers(transport, &headers)?;
        transport.flush()?;

        let mut reader = BufReader::new(&mut *transport);

        let (resp_version, status, reason, resp_headers) = if expects_continue {
            match Self::wait_for_continue(config, &mut reader)? {
                ContinueOutcome::SendBody => {
                    Self::send_body_then_read_response(config, &mut reader, &headers, body)?
                }
                ContinueOutcome::Final(version, status, reason, headers) => {
                    (version, status, reason, headers)
                }
            }
        } else {
            Self::send_body_then_read_response(config, &mut reader, &headers, body)?
        };

        let body_bytes =
            read_bytes_for_response(status, &resp_headers, &mut reader, config.max_response_body)?;
        let response = Response::new(status)
            .with_version(resp_version)
            .with_reason(reason);
        let response = resp_headers
            .iter()
            .fold(response, |r, (n, v)| r.append_header(n.clone(), v.clone()));

        let mut body_reader: &[u8] = &body_bytes;
        Ok(handler(response, &mut body_reader))
    }

    /// Decides how the outgoing body is framed, following the priority
    /// order a client must apply before it writes a single byte:
    ///
    /// 1. A safe method that forbids a request body (`GET`, `HEAD`,
    ///    `DELETE`, `TRACE`) always sends none, regardless of what the
    ///    caller set.
    /// 2. A caller-set `Transfer-Encoding` wins: `chunked` is moved to the
    ///    end of its coding list if not already there, and any
    ///    `Content-Length` is removed (the two framings are exclusive).
    /// 3. A caller-set `Content-Length` is validated (non-negative
    ///    integer) and otherwise trusted; zero empties the body.
    /// 4. Otherwise the body's own known size picks `Content-Length`, or
    ///    its absence picks `Transfer-Encoding: chunked`.
    fn shape_body_headers(
        headers: &mut HeaderMap,
        body: &mut crate::entity::Entity,
        method: &crate::method::Method,
    ) -> Result<(), ClientError> {
        use crate::entity::Entity;
        use crate::method::Method;

        if *method == Method::GET || *method == Method::HEAD || *method == Method::DELETE || *method == Method::TRACE
        {
            *body = Entity::Empty;
            headers.remove("content-length");
            headers.remove("transfer-encoding");
            return Ok(());
        }

        if let Some(existing) = headers.get("transfer-encoding") {
            let text = existing.to_str().unwrap_or_default().to_owned();
            let mut codings = crate::grammar::parse_list(&text, ',');
            codings.retain(|c| !c.eq_ignore_ascii_case("chunked"));
            codings.push("chunked".to_owned());
            headers.with_header(
                HeaderName::transfer_encoding(),
                HeaderValue::from_bytes(codings.join(", ").into_bytes())?,
            );
            headers.remove("content-length");
            return Ok(());
        }

        if let Some(existing) = headers.get("content-length") {
            let text = existing.to_str().map_err(|_| ClientError::InvalidContentLength)?;
            let len: i64 = text.trim().parse().map_err(|_| ClientError::InvalidContentLength)?;
            if len < 0 {
                return Err(ClientError::InvalidContentLength);
            }
            if len == 0 {
                *body = Entity::Empty;
            }
            return Ok(());
        }

        match body.known_size() {
            Some(len) => {
                let mut buf = itoa::Buffer::new();
                headers_with_length(headers, buf.format(len))?;
            }
            None => {
                headers.with_header(HeaderName::transfer_encoding(), HeaderValue::from_bytes(b"chunked".to_vec())?);
            }
        }
        Ok(())
    }

    /// Runs the `Expect: 100-continue` wait (spec §4.9 step 6), sends the
    /// body once the server has cleared it to proceed, and reads the final
    /// status line and header block — all through the one buffered `reader`
    /// also used for the response body, so nothing the peer sent ahead of
    /// schedule is ever dropped.
    fn send_body_then_read_response<T: Transport>(
        config: &ClientConfig,
        reader: &mut BufReader<&mut T>,
        headers: &HeaderMap,
        body: crate::entity::Entity,
    ) -> Result<(Version, StatusCode, String, HeaderMap), ClientError> {
        Self::send_body(reader.get_mut(), headers, body)?;
        reader.get_mut().flush()?;
        let (version, status, reason) = wire::read_status_line(reader, config.wire_limits)?;
        let resp_headers = wire::read_header_block(reader, config.wire_limits)?;
        Ok((version, status, reason, resp_headers))
    }

    /// Waits up to `config.continue_timeout` for a `100 Continue` interim
    /// status line on `reader`, reading through the exact same buffered
    /// reader the final response will later be parsed from. A non-100
    /// status short-circuits the exchange per spec §4.9 step 6: it *is*
    /// the final response, and the handler sees it without the body ever
    /// being sent. A read that times out falls back to sending the body
    /// anyway — the allowance RFC 9110 §10.1.1 gives a client tired of
    /// waiting. A clean connection close while waiting is reported as
    /// [`ClientError::UnexpectedClose`] rather than a malformed start line.
    fn wait_for_continue<T: Transport>(
        config: &ClientConfig,
        reader: &mut BufReader<&mut T>,
    ) -> Result<ContinueOutcome, ClientError> {
        reader.get_mut().set_read_timeout(Some(config.continue_timeout))?;
        let outcome = Self::read_continue_response(config, reader);
        reader.get_mut().set_read_timeout(config.read_timeout)?;
        outcome
    }

    fn read_continue_response<T: Transport>(
        config: &ClientConfig,
        reader: &mut BufReader<&mut T>,
    ) -> Result<ContinueOutcome, ClientError> {
        match reader.fill_buf() {
            Ok(b) if b.is_empty() => return Err(ClientError::UnexpectedClose),
            Ok(_) => {}
            Err(e) if is_read_timeout(&e) => return Ok(ContinueOutcome::SendBody),
            Err(e) => return Err(e.into()),
        }

        let (version, status, reason) = wire::read_status_line(reader, config.wire_limits)?;
        let headers = wire::read_header_block(reader, config.wire_limits)?;
        if status.as_u16() == 100 {
            Ok(ContinueOutcome::SendBody)
        } else {
            Ok(ContinueOutcome::Final(version, status, reason, headers))
        }
    }

    fn send_body<W: Write>(
        mut transport: W,
        headers: &HeaderMap,
        body: crate::entity::Entity,
    ) -> Result<(), ClientError> {
        if body.is_known_empty() {
            return Ok(());
        }
        let chunked = headers
            .get("transfer-encoding")
            .map(|v| v.to_str().unwrap_or_default().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false);

        let mut body_reader = body.open_stream();
        if chunked {
            let mut encoder = crate::stream::ChunkedEncoder::new(&mut transport);
            let mut buf = [0u8; 64 * 1024];
            loop {
                let n = body_reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                encoder.write_chunk(&buf[..n])?;
            }
            encoder.finish()?;
        } else {
            io::copy(&mut body_reader, &mut transport)?;
        }
        Ok(())
    }
}

/// Outcome of waiting for a `100 Continue` interim response (RFC 9110
/// §10.1.1) after the request head is sent but before its body is.
#[derive(Debug)]
enum ContinueOutcome {
    /// `100 Continue` arrived, or the wait timed out — proceed to stream
    /// the request body.
    SendBody,
    /// A non-100 status arrived first; this is the final response, and no
    /// body is ever sent.
    Final(Version, StatusCode, String, HeaderMap),
}

fn is_read_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

fn headers_with_length(headers: &mut HeaderMap, s: &str) -> Result<(), crate::headers::InvalidHeaderValue> {
    headers.with_header(HeaderName::content_length(), HeaderValue::from_bytes(s.as_bytes().to_vec())?);
    Ok(())
}

/// Builds the outgoing `Connection` header: any caller-set tokens survive
/// minus the hop-by-hop ones this engine manages itself, `TE` is appended
/// when the caller set a `TE` header (signaling it), and `close` is always
/// appended since this engine never keeps a connection open past one
/// exchange.
fn shape_connection_header(headers: &mut HeaderMap) -> Result<(), crate::headers::InvalidHeaderValue> {
    const RESERVED: &[&str] = &["close", "te", "keep-alive", "upgrade"];

    let mut tokens: Vec<String> = headers
        .get("connection")
        .and_then(|v| v.to_str().ok())
        .map(|v| crate::grammar::parse_list(v, ','))
        .unwrap_or_default()
        .into_iter()
        .filter(|t| !RESERVED.iter().any(|r| t.eq_ignore_ascii_case(r)))
        .collect();

    if headers.contains("te") {
        tokens.push("TE".to_owned());
    }
    tokens.push("close".to_owned());

    headers.with_header(HeaderName::connection(), HeaderValue::from_bytes(tokens.join(", ").into_bytes())?);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entity::Entity;
    use crate::method::Method;
    use std::io::Cursor;

    struct InMemory {
        read: Cursor<Vec<u8>>,
        write: Vec<u8>,
    }

    impl Read for InMemory {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.read.read(buf)
        }
    }
    impl Write for InMemory {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.write.write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
    impl Transport for InMemory {
        fn shutdown_write(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn minimal_get_round_trip() {
        let response_wire = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello".to_vec();
        let transport = InMemory { read: Cursor::new(response_wire), write: Vec::new() };
        let config = ClientConfig::default();
        let request = Request::new(Method::GET, Target::parse("http://example.com/").unwrap());

        let (status, body, sent) = ClientEngine::send(&config, transport, request, |resp, body| {
            let mut out = Vec::new();
            body.read_to_end(&mut out).unwrap();
            (resp.status().as_u16(), out, ())
        })
        .map(|(status, body, sent)| (status, body, sent))
        .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body, b"hello");
        let _ = sent;
    }

    #[test]
    fn request_line_uses_origin_form_and_sets_host() {
        let response_wire = b"HTTP/1.1 204 No Content\r\n\r\n".to_vec();
        let transport = InMemory { read: Cursor::new(response_wire), write: Vec::new() };
        let config = ClientConfig::default();
        let request = Request::new(Method::GET, Target::parse("http://example.com/a/b").unwrap());

        ClientEngine::send(&config, transport, request, |_resp, _body| ()).unwrap();
    }
}
