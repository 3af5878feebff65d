//! HTTP header field model: [`HeaderName`], [`HeaderValue`], and the
//! order-preserving [`HeaderMap`] multimap.
//!
//! Duplicate field names (`Set-Cookie`, repeated `Via`) are kept distinct
//! rather than auto-joined with `,`; callers that want the RFC 9110
//! comma-combined view can fold [`HeaderMap::get_all`] themselves.

mod error;
mod map;
mod name;
mod value;

pub use error::HeaderError;
pub use map::HeaderMap;
pub use name::{HeaderName, InvalidHeaderName};
pub use value::{HeaderValue, InvalidHeaderValue};
