//! Stream filters layered between the wire and a decoded entity body:
//! size bounding, chunked transfer-coding, and content-coding.

mod bounded;
mod chunked;
mod codec;
mod error;

pub use bounded::BoundedReader;
pub use chunked::{ChunkedDecoder, ChunkedEncoder};
pub use codec::{layer_decoders, parse_codings, Coding, ContentReader, ContentWriter, MAX_NESTED_CODINGS};
pub use error::StreamError;
