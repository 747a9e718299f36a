//! ContentSource: a byte stream plus its declared length.
//!
//! When blobs arrive from network locations the stream may have no knowable
//! length, so the declared length may be negative (= unknown). Equality is
//! defined by length alone; content bytes are NOT compared. Callers that
//! need content equality must use [`bytes_equal`].

use std::fmt;
use std::io::Cursor;

use tokio::io::{AsyncRead, AsyncReadExt};

/// A readable byte stream with a declared length.
pub struct ContentSource {
    length: i64,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl ContentSource {
    /// Wrap an arbitrary reader with a declared length.
    ///
    /// Pass a negative `length` when the source length is unknown
    /// (e.g. a non-seekable network stream).
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static, length: i64) -> Self {
        Self {
            length,
            reader: Box::new(reader),
        }
    }

    /// An in-memory source over owned bytes; length is the byte count.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let length = bytes.len() as i64;
        Self::new(Cursor::new(bytes), length)
    }

    /// A zero-length source over no bytes.
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// The declared length; negative means unknown.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// The declared length clamped to zero when negative.
    pub fn unsigned_length(&self) -> u64 {
        if self.length < 0 {
            0
        } else {
            self.length as u64
        }
    }

    /// Consume the source, yielding its reader.
    pub fn into_reader(self) -> Box<dyn AsyncRead + Send + Unpin> {
        self.reader
    }

    /// Consume the source and read everything into memory.
    pub async fn read_to_end(self) -> std::io::Result<Vec<u8>> {
        let mut reader = self.reader;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

/// Length-only equivalence. Two sources with equal declared (and derived
/// unsigned) lengths compare equal regardless of their bytes.
impl PartialEq for ContentSource {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.unsigned_length() == other.unsigned_length()
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSource")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Byte-wise comparison of two sources, consuming both.
///
/// Streams both readers in chunks; never buffers more than one chunk per
/// side. Use this where content equality actually matters.
pub async fn bytes_equal(a: ContentSource, b: ContentSource) -> std::io::Result<bool> {
    const CHUNK: usize = 64 * 1024;

    let mut ra = a.into_reader();
    let mut rb = b.into_reader();
    let mut buf_a = vec![0u8; CHUNK];
    let mut buf_b = vec![0u8; CHUNK];

    loop {
        let na = ra.read(&mut buf_a).await?;
        // Fill the same amount from b so the windows stay aligned.
        let mut nb = 0;
        while nb < na {
            let n = rb.read(&mut buf_b[nb..na]).await?;
            if n == 0 {
                return Ok(false);
            }
            nb += n;
        }

        if na == 0 {
            // a is exhausted; b must be too.
            let n = rb.read(&mut buf_b).await?;
            return Ok(n == 0);
        }

        if buf_a[..na] != buf_b[..na] {
            return Ok(false);
        }
    }
}
