//! Blocking HTTP/1.x client: a connection-per-request [`Client`] built on
//! the [`ClientEngine`] exchange and the transport it speaks over.
mod config;
mod engine;
mod error;
mod transport;

pub use config::ClientConfig;
pub use engine::ClientEngine;
pub use error::ClientError;
pub use transport::{Connector, TcpConnector, Transport};

use std::io::Read;

use crate::message::{Request, Response};
use crate::target::Target;

/// A client bound to a [`Connector`] (plain TCP by default). Each
/// [`Client::send`] call resolves the request's destination, opens a fresh
/// transport, runs exactly one request/response exchange through
/// [`ClientEngine`], and closes the transport before returning — this crate
/// has no keep-alive connection pool (see `Non-goals`).
pub struct Client<C = TcpConnector> {
    connector: C,
    config: ClientConfig,
}

impl<C> std::fmt::Debug for Client<C> {
    /// Omits `connector` — a caller's [`Connector`] impl isn't required to
    /// be `Debug`, so this prints only the type name and the tunables.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("config", &self.config).finish()
    }
}

impl Client<TcpConnector> {
    /// A client that connects over plain TCP with default tunables.
    pub fn new() -> Client<TcpConnector> {
        Client { connector: TcpConnector, config: ClientConfig::default() }
    }
}

impl Default for Client<TcpConnector> {
    fn default() -> Self {
        Client::new()
    }
}

impl<C: Connector> Client<C> {
    /// A client that connects through a caller-supplied [`Connector`] (e.g.
    /// one that wraps `TcpStream` in TLS for `https` targets) with the
    /// given tunables.
    pub fn with_connector(connector: C, config: ClientConfig) -> Client<C> {
        Client { connector, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves `request.target()`'s destination, connects, sends the
    /// request, and hands the response to `handler`. The transport is
    /// always closed when `handler` returns.
    pub fn send<T, H>(&self, request: Request, handler: H) -> Result<T, ClientError>
    where
        H: FnOnce(Response, &mut dyn Read) -> T,
    {
        let (host, port) = destination(request.target())?;
        let mut transport = self.connector.connect(&host, port, self.config.connect_timeout)?;
        transport.set_read_timeout(self.config.read_timeout)?;
        ClientEngine::send(&self.config, transport, request, handler)
    }
}

/// Validates that `target` is usable for a client request (absolute-form,
/// `http` or `https` scheme) and resolves its `(host, port)`, applying the
/// scheme's default port when none was given. Per spec, this is a
/// pre-flight check: a rejected target never opens a connection.
fn destination(target: &Target) -> Result<(String, u16), ClientError> {
    let scheme = target.scheme().ok_or(ClientError::InvalidTarget)?;
    let default_port = match scheme {
        "http" => 80,
        "https" => 443,
        _ => return Err(ClientError::InvalidTarget),
    };
    let (host, port) = target.authority().ok_or(ClientError::InvalidTarget)?;
    Ok((host.to_owned(), port.unwrap_or(default_port)))
}
