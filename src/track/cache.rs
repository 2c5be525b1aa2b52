//! Read-through cache for chunk data.

use crate::{ByteStream, Mp4Error};

use super::Chunk;

/// Last read window of chunk data. Samples are mostly read in order,
/// so reading a whole chunk at once saves a seek and read per sample.
/// Chunks above the read size limit are read in windows instead.
#[derive(Debug, Default, Clone)]
pub(crate) struct ChunkCache {
    /// Chunk number the buffer belongs to.
    chunk_number: Option<u32>,
    /// Absolute file position of the first byte in `data`.
    offset: u64,
    data: Vec<u8>,
}

impl ChunkCache {
    fn covers(&self, chunk: &Chunk, pos: u64, length: u64) -> bool {
        self.chunk_number == Some(chunk.number)
            && self.offset <= pos
            && pos + length <= self.offset + self.data.len() as u64
    }

    /// Returns the `length` bytes at `pos` in `chunk`,
    /// reading from `stream` if not in the cache.
    pub(crate) fn read<S: ByteStream + ?Sized>(
        &mut self,
        stream: &mut S,
        chunk: &Chunk,
        pos: u64,
        length: u32,
        max_read_size: usize,
    ) -> Result<Vec<u8>, Mp4Error> {
        let length = length as u64;

        if !self.covers(chunk, pos, length) {
            let in_chunk = chunk.data_offset <= pos && pos + length <= chunk.end();
            let (offset, size) = match in_chunk && chunk.length <= max_read_size as u64 {
                true => (chunk.data_offset, chunk.length),
                false => {
                    let window = (max_read_size as u64).max(length);
                    let to_chunk_end = chunk.end().saturating_sub(pos);
                    (pos, window.min(to_chunk_end).max(length))
                }
            };

            // Invalidated before reading.
            self.chunk_number = None;
            self.data = stream.read_at(offset, size as usize)?;
            self.offset = offset;
            self.chunk_number = Some(chunk.number);
        }

        let start = (pos - self.offset) as usize;
        self.data.get(start .. start + length as usize)
            .map(|b| b.to_vec())
            .ok_or(Mp4Error::ReadMismatch{
                got: self.data.len().saturating_sub(start) as u64,
                expected: length
            })
    }

    /// Forgets the cached window.
    pub(crate) fn clear(&mut self) {
        self.chunk_number = None;
        self.offset = 0;
        self.data = Vec::new();
    }

    pub(crate) fn window(&self) -> Option<(u32, u64, usize)> {
        self.chunk_number.map(|n| (n, self.offset, self.data.len()))
    }
}
