//! The message body abstraction: [`Entity`].
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bytes::Bytes;

use crate::multipart::MultipartBody;
use crate::pool::WriterPool;
use crate::query::QueryString;

/// A message body, modeled by capability rather than by a single "body
/// reader" trait object: most entities know their exact size up front
/// (`Bytes`, `File`), some never do (`Stream`), and `Writer` lets a caller
/// produce a body incrementally from another thread without first
/// buffering it all in memory.
pub enum Entity {
    /// No body at all (distinct from a zero-length body — see
    /// `known_size` below, both report `Some(0)`).
    Empty,
    Bytes(Bytes),
    File(File, u64),
    /// A body of unknown length, read until EOF or a content-length-driven
    /// stream filter reports completion.
    Stream(Box<dyn Read + Send>),
    Multipart(MultipartBody),
    /// A body produced by a closure running on a pooled worker thread,
    /// writing into a bounded pipe that the reading side drains.
    Writer(crate::pool::PipeReader),
}

impl Entity {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Entity {
        Entity::Bytes(bytes.into())
    }

    pub fn from_string(s: impl Into<String>) -> Entity {
        Entity::Bytes(Bytes::from(s.into()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Entity> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Entity::File(file, len))
    }

    pub fn from_stream(stream: impl Read + Send + 'static) -> Entity {
        Entity::Stream(Box::new(stream))
    }

    pub fn from_query(query: &QueryString) -> Entity {
        Entity::Bytes(Bytes::from(query.to_string().into_bytes()))
    }

    /// Encodes a `name -> values` grouping as an
    /// `application/x-www-form-urlencoded` body, e.g.
    /// `Entity::from_form([("a", vec!["1", "2"]), ("b", vec!["x"])])` encodes
    /// to `a=1&a=2&b=x`. Built on [`QueryString::from_grouped`] followed by
    /// [`Self::from_query`] — the same escaping and ordering rules apply.
    pub fn from_form<N, V, I>(entries: I) -> Entity
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Entity::from_query(&QueryString::from_grouped(entries))
    }

    pub fn from_multipart(body: MultipartBody) -> Entity {
        Entity::Multipart(body)
    }

    /// Spawns `produce` on `pool`, streaming whatever it writes into the
    /// returned entity's pipe back to the caller as it runs.
    pub fn from_writer<F>(pool: &WriterPool, produce: F) -> Entity
    where
        F: FnOnce(&mut dyn std::io::Write) -> io::Result<()> + Send + 'static,
    {
        Entity::Writer(pool.spawn(produce))
    }

    /// Returns the body's length if it is known without reading it —
    /// `Empty` and a zero-length `Bytes`/`File` both report `Some(0)`,
    /// distinguishing "no body" from "an empty body" is the caller's job
    /// via `matches!(entity, Entity::Empty)`.
    pub fn known_size(&self) -> Option<u64> {
        match self {
            Entity::Empty => Some(0),
            Entity::Bytes(b) => Some(b.len() as u64),
            Entity::File(_, len) => Some(*len),
            Entity::Stream(_) => None,
            Entity::Multipart(m) => m.known_size(),
            Entity::Writer(_) => None,
        }
    }

    pub fn is_known_empty(&self) -> bool {
        matches!(self, Entity::Empty) || self.known_size() == Some(0)
    }

    /// Opens the entity for reading, consuming it.
    pub fn open_stream(self) -> Box<dyn Read + Send> {
        match self {
            Entity::Empty => Box::new(io::empty()),
            Entity::Bytes(b) => Box::new(io::Cursor::new(b)),
            Entity::File(f, _) => Box::new(f),
            Entity::Stream(s) => s,
            Entity::Multipart(m) => m.open_stream(),
            Entity::Writer(pipe) => Box::new(pipe),
        }
    }
}

impl Default for Entity {
    fn default() -> Entity {
        Entity::Empty
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Empty => f.write_str("Entity::Empty"),
            Entity::Bytes(b) => f.debug_tuple("Entity::Bytes").field(&b.len()).finish(),
            Entity::File(_, len) => f.debug_struct("Entity::File").field("len", len).finish(),
            Entity::Stream(_) => f.write_str("Entity::Stream(..)"),
            Entity::Multipart(m) => f.debug_tuple("Entity::Multipart").field(m).finish(),
            Entity::Writer(_) => f.write_str("Entity::Writer(..)"),
        }
    }
}

impl From<Vec<u8>> for Entity {
    fn from(v: Vec<u8>) -> Entity {
        Entity::Bytes(Bytes::from(v))
    }
}

impl From<String> for Entity {
    fn from(s: String) -> Entity {
        Entity::from_string(s)
    }
}
