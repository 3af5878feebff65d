//! Decoding an entity body off the wire: [`BodyDecoder`] determines the
//! framing and content-codings; [`parsers`] gives typed accessors built on
//! top of it.
mod decoder;
pub mod error;
pub mod parsers;

pub use decoder::BodyDecoder;
pub use error::BodyError;
