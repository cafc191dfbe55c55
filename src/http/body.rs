//! Message bodies.
//!
//! `BodyStream` is the rewindable in-memory stream attached to canonical
//! requests. `ResponseBody` is what the dispatcher hands back: either a
//! seekable buffer with a known size or a forward-only reader whose size may
//! be unknown.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Rewindable in-memory byte stream.
#[derive(Debug, Clone, Default)]
pub struct BodyStream {
    inner: Cursor<Vec<u8>>,
}

impl BodyStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream over `bytes`, positioned at the start.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Cursor::new(bytes.into()),
        }
    }

    /// Current read/write position.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// The full content regardless of position.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    /// Independent reader positioned at zero.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.inner.get_ref().as_slice())
    }
}

impl Read for BodyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for BodyStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for BodyStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Response body produced by the dispatcher.
pub enum ResponseBody {
    /// Seekable buffer; size is always known.
    Buffered(Cursor<Vec<u8>>),
    /// Forward-only reader with an optional declared length.
    Stream {
        reader: Box<dyn Read + Send>,
        size: Option<u64>,
    },
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self::Buffered(Cursor::new(Vec::new()))
    }

    pub fn streaming(reader: impl Read + Send + 'static, size: Option<u64>) -> Self {
        Self::Stream {
            reader: Box::new(reader),
            size,
        }
    }

    /// Declared size in bytes, if known.
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::Buffered(cursor) => Some(cursor.get_ref().len() as u64),
            Self::Stream { size, .. } => *size,
        }
    }

    pub fn is_seekable(&self) -> bool {
        matches!(self, Self::Buffered(_))
    }

    /// Seek back to the start. Fails on forward-only streams.
    pub fn rewind(&mut self) -> io::Result<()> {
        match self {
            Self::Buffered(cursor) => {
                cursor.set_position(0);
                Ok(())
            }
            Self::Stream { .. } => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "response body stream is not seekable",
            )),
        }
    }

    /// Read everything from the current position to the end.
    pub fn read_remaining(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            Self::Buffered(cursor) => {
                cursor.read_to_end(&mut out)?;
            }
            Self::Stream { reader, .. } => {
                reader.read_to_end(&mut out)?;
            }
        }
        Ok(out)
    }

    /// Append bytes to a buffered body. Streams are replaced by a buffer
    /// holding what they had not yet produced followed by `bytes`.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if matches!(self, Self::Stream { .. }) {
            let pending = self.read_remaining()?;
            *self = Self::Buffered(Cursor::new(pending));
        }
        if let Self::Buffered(cursor) = self {
            cursor.seek(SeekFrom::End(0))?;
            cursor.write_all(bytes)?;
        }
        Ok(())
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffered(Cursor::new(bytes))
    }
}

impl From<&[u8]> for ResponseBody {
    fn from(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::from(text.into_bytes())
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(cursor) => f
                .debug_struct("Buffered")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Self::Stream { size, .. } => f.debug_struct("Stream").field("size", size).finish(),
        }
    }
}
