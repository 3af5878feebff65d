//! Client engine configuration.
use std::time::Duration;

use crate::wire::WireLimits;

/// Tunables for a single [`crate::client::ClientEngine::send`] exchange.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Value sent in the `User-Agent` header when the caller's request
    /// does not already carry one.
    pub user_agent: String,
    /// Start-line/header-block size limits applied to the response.
    pub wire_limits: WireLimits,
    /// Cap on the raw bytes read for a response body with no declared
    /// length (chunked or connection-close-delimited).
    pub max_response_body: u64,
    /// How long to wait for a `100 Continue` interim response before
    /// sending the request body anyway, when the request declared
    /// `Expect: 100-continue`.
    pub continue_timeout: Duration,
    pub connect_timeout: Duration,
    pub read_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig {
            user_agent: concat!("transit/", env!("CARGO_PKG_VERSION")).to_owned(),
            wire_limits: WireLimits::default(),
            max_response_body: 64 * 1024 * 1024,
            continue_timeout: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Some(Duration::from_secs(30)),
        }
    }
}
