//! # HTTP/1.x message model, wire codec, and blocking client
//!
//! This library provides the building blocks for speaking HTTP/1.x as a
//! client over a blocking transport: a typed message model, the wire
//! grammar to read and write it, body framing and streaming, and a
//! single-exchange client engine built on top.
//!
//! ## Definitions
//!
//! - [`grammar`] RFC 7230/9110 token, quoted-string, and list grammars
//! - [`headers`] HTTP header fields ([RFC9110 Section 5])
//! - [`method`], [`version`], [`status`], [`target`] the request-line and
//!   status-line vocabulary
//! - [`message`] [`Request`] and [`Response`], the typed message model
//! - [`entity`] the outgoing body, modeled by capability rather than by
//!   trait object
//!
//! ## Wire behavior
//!
//! - [`wire`] start-line and header-block framing ([RFC9112])
//! - [`stream`] size-bounded reading, chunked transfer-coding, and
//!   content-coding layered over a raw transport
//! - [`body`] combines `wire` and `stream` to decode an entity body
//!   according to its framing headers
//! - [`multipart`] `multipart/form-data` reading and writing ([RFC7578])
//!
//! ## Client
//!
//! - [`client`] a connection-per-request [`Client`] and the
//!   [`ClientEngine`] exchange it runs
//!
//! # Usage
//!
//! Build a [`Request`] with [`message::Request::new`], send it with
//! [`Client::send`], and inspect the [`Response`] and its body from the
//! handler closure.
//!
//! [RFC9110 Section 5]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-fields>
//! [RFC9112]: <https://www.rfc-editor.org/rfc/rfc9112.html>
//! [RFC7578]: <https://www.rfc-editor.org/rfc/rfc7578.html>
#![warn(missing_debug_implementations)]

mod log;

pub mod body;
pub mod client;
pub mod entity;
pub mod error;
pub mod grammar;
pub mod headers;
pub mod message;
pub mod method;
pub mod multipart;
pub mod pool;
pub mod query;
pub mod status;
pub mod stream;
pub mod target;
pub mod version;
pub mod wire;

pub use client::{Client, ClientConfig, ClientEngine, ClientError};
pub use entity::Entity;
pub use error::Error;
pub use headers::{HeaderMap, HeaderName, HeaderValue};
pub use message::{Request, Response};
pub use method::Method;
pub use status::StatusCode;
pub use target::Target;
pub use version::Version;
