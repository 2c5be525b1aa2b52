//! Physically contiguous run of sample data.

/// Contiguous byte range in the media data holding one or more
/// consecutive samples. Samples refer to their chunk by index
/// into the timeline's chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based chunk number. Chunks from track fragments
    /// continue the numbering of the sample table chunks.
    pub(crate) number: u32,
    /// Absolute file position of the first byte.
    pub(crate) data_offset: u64,
    /// Total size in bytes of all samples in the chunk.
    pub(crate) length: u64,
    /// Data reference index, if the data is in the file being read.
    /// `None` for external data references.
    pub(crate) data_reference: Option<u16>,
}

impl Chunk {
    pub(crate) fn new(number: u32, data_offset: u64, data_reference: Option<u16>) -> Self {
        Self {
            number,
            data_offset,
            length: 0,
            data_reference,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Absolute file position following the last byte.
    pub fn end(&self) -> u64 {
        self.data_offset + self.length
    }

    pub fn data_reference(&self) -> Option<u16> {
        self.data_reference
    }

    /// Returns true if the sample data can be read
    /// from the current file.
    pub fn is_resolvable(&self) -> bool {
        self.data_reference.is_some()
    }
}
