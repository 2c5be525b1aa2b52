//! Byte stream access for sample payloads and atom payloads.

use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek, SeekFrom},
    path::Path,
};

use binrw::{BinRead, BinReaderExt};

use crate::Mp4Error;

/// Positioned reads from the underlying media data.
///
/// A single read is issued per call. Short reads
/// are errors, never retried.
pub trait ByteStream {
    /// Reads exactly `len` bytes starting at absolute position `offset`.
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, Mp4Error>;
}

/// Seekable reader over an MP4 file
/// (or any other `Read + Seek` source, e.g. an in-memory `Cursor`).
#[derive(Debug)]
pub struct Mp4Reader<R: Read + Seek = BufReader<File>> {
    /// Stream size.
    len: u64,
    reader: R,
}

impl Mp4Reader<BufReader<File>> {
    /// Opens the file at `path` behind a `BufReader`
    /// with default capacity (8KiB).
    pub fn open(path: &Path) -> Result<Self, Mp4Error> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }

    /// Opens the file at `path` with a custom buffer size,
    /// e.g. to match a typical chunk size.
    pub fn with_capacity(path: &Path, capacity: usize) -> Result<Self, Mp4Error> {
        let file = File::open(path)?;
        Self::new(BufReader::with_capacity(capacity, file))
    }
}

impl Mp4Reader<Cursor<Vec<u8>>> {
    /// In-memory stream.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            len: bytes.len() as u64,
            reader: Cursor::new(bytes),
        }
    }
}

impl <R: Read + Seek> Mp4Reader<R> {
    pub fn new(mut reader: R) -> Result<Self, Mp4Error> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {len, reader})
    }

    /// Stream size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads `len` bytes at `offset` into an in-memory buffer.
    pub fn cursor(&mut self, offset: u64, len: usize) -> Result<Cursor<Vec<u8>>, Mp4Error> {
        Ok(Cursor::new(self.read_at(offset, len)?))
    }

    /// Decodes the atom payload (the bytes following the atom header)
    /// of size `len` at `offset`.
    pub fn atom<T>(&mut self, offset: u64, len: usize) -> Result<T, Mp4Error>
    where
        T: BinRead,
        for<'a> T::Args<'a>: Default,
    {
        let mut cursor = self.cursor(offset, len)?;
        Ok(cursor.read_be::<T>()?)
    }

    /// Decodes an atom payload that requires arguments,
    /// e.g. `Stsd` which needs the handler's media kind.
    pub fn atom_args<T>(&mut self, offset: u64, len: usize, args: T::Args<'_>) -> Result<T, Mp4Error>
    where
        T: BinRead,
    {
        let mut cursor = self.cursor(offset, len)?;
        Ok(cursor.read_be_args::<T>(args)?)
    }
}

impl <R: Read + Seek> ByteStream for Mp4Reader<R> {
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, Mp4Error> {
        self.reader.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::with_capacity(len);
        let got = self.reader.by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)?;
        if got != len {
            return Err(Mp4Error::ReadMismatch{got: got as u64, expected: len as u64})
        }
        Ok(buf)
    }
}

impl <S: ByteStream + ?Sized> ByteStream for &mut S {
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, Mp4Error> {
        (**self).read_at(offset, len)
    }
}
