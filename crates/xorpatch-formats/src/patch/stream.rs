//! Byte stream collaborators
//!
//! The orchestrators never own their inputs or output. Inputs are read
//! through [`ByteSource`], which supports random-access reads of a known
//! total length, and output is written through [`ByteSink`], which only
//! supports sequential appends followed by a single finalize step.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Random-access byte stream with a known length
pub trait ByteSource {
    /// Total length of the stream in bytes
    fn len(&self) -> u64;

    /// Whether the stream holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `offset`
    ///
    /// The requested range must lie within the stream.
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;
}

/// Sequential append-only output
pub trait ByteSink {
    /// Artifact produced once all chunks have been appended
    type Output;

    /// Append the next chunk of output
    fn append(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Finish the output and hand back the artifact
    fn finalize(self) -> io::Result<Self::Output>;
}

/// Fill `buf` from `source` at `offset`, zero-extending past the end
///
/// Bytes the source cannot supply are set to zero, the identity for XOR.
/// Returns the number of bytes actually read from the source.
pub fn read_zero_extended(
    source: &mut dyn ByteSource,
    offset: u64,
    buf: &mut [u8],
) -> io::Result<usize> {
    let available = source.len().saturating_sub(offset);
    let take = buf.len().min(usize::try_from(available).unwrap_or(usize::MAX));

    if take > 0 {
        source.read_exact_at(offset, &mut buf[..take])?;
    }
    buf[take..].fill(0);

    Ok(take)
}

/// In-memory source over a borrowed slice
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Wrap a byte slice
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl ByteSource for SliceSource<'_> {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "offset out of range"))?;
        let end = start
            .checked_add(buf.len())
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "read of {} bytes at offset {offset} exceeds stream length {}",
                        buf.len(),
                        self.data.len()
                    ),
                )
            })?;

        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }
}

/// Source over any seekable reader, such as an open file
#[derive(Debug)]
pub struct ReaderSource<R: Read + Seek> {
    reader: R,
    len: u64,
}

impl<R: Read + Seek> ReaderSource<R> {
    /// Wrap a reader, discovering its length by seeking to the end
    pub fn new(mut reader: R) -> io::Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, len })
    }
}

impl<R: Read + Seek> ByteSource for ReaderSource<R> {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(buf)
    }
}

/// Sink collecting output into memory
#[derive(Debug, Default)]
pub struct VecSink {
    data: Vec<u8>,
}

impl VecSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }
}

impl ByteSink for VecSink {
    type Output = Vec<u8>;

    fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    fn finalize(self) -> io::Result<Vec<u8>> {
        Ok(self.data)
    }
}

/// Sink writing output through to any writer
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    type Output = W;

    fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.writer.write_all(chunk)
    }

    fn finalize(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
