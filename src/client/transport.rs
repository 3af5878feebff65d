//! The byte-level connection a [`super::ClientEngine`] speaks HTTP/1.x over.
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// A connected, bidirectional transport. `TcpStream` is the default
/// implementation; a TLS-wrapping stream (or an in-memory one for tests)
/// can implement this trait to plug into the same engine.
pub trait Transport: Read + Write {
    /// Shuts down the write half, signaling the peer no more request data
    /// is coming (used for half-close semantics around `Expect:
    /// 100-continue` and connection reuse decisions).
    fn shutdown_write(&mut self) -> io::Result<()>;

    /// Bounds how long a single `read` may block waiting for the peer.
    /// `None` clears any previously set timeout. The default no-op suits
    /// transports (like an in-memory test double) with nothing to
    /// configure; `TcpStream` wires this to `SO_RCVTIMEO`.
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for TcpStream {
    fn shutdown_write(&mut self) -> io::Result<()> {
        self.shutdown(std::net::Shutdown::Write)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }
}

/// Builds transports for a `(host, port)` destination. The default
/// [`TcpConnector`] opens a plain TCP connection; a caller linking in a
/// TLS crate can supply their own `Connector` for `https` targets.
pub trait Connector {
    type Transport: Transport + Send + 'static;

    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<Self::Transport>;
}

/// Plain-TCP connector — the only transport this crate implements
/// directly; TLS is explicitly out of scope (see `Non-goals`).
#[derive(Debug)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Transport = TcpStream;

    fn connect(&self, host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
        let addrs = (host, port).to_socket_addrs()?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")))
    }
}
