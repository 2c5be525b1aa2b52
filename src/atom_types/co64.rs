//! Chunk to offset atom for file sizes above the 32bit limit (`co64`).
//! The 64-bit equivalent of the `stco` atom.
//!
//! Path: `moov/trak[multiple]/mdia/minf/stbl/co64`

use binrw::BinRead;

use super::Stco;

/// Chunk to offset atom for file sizes above the 32bit limit (`co64`).
/// The 64-bit equivalent of the `stco` atom.
///
/// The timeline builder only works with 64-bit offsets,
/// `stco` is converted via `From<Stco>`.
///
/// Path: `moov/trak/mdia/minf/stbl/co64`
#[derive(Debug, Default, BinRead, Clone)]
#[br(big)]
pub struct Co64 {
    _version: u8,
    _flags: [u8; 3],
    no_of_entries: u32,
    #[br(count = no_of_entries)]
    offsets: Vec<u64>
}

impl Co64 {
    pub fn new(offsets: &[u64]) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            no_of_entries: offsets.len() as u32,
            offsets: offsets.to_vec()
        }
    }

    /// Returns number of chunks.
    /// (each chunk corresponds to one or more samples).
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns chunk byte offsets.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Returns byte offset for 1-based chunk number.
    pub fn get(&self, chunk_number: u32) -> Option<u64> {
        let index = usize::try_from(chunk_number.checked_sub(1)?).ok()?;
        self.offsets.get(index).copied()
    }
}

impl From<Stco> for Co64 {
    fn from(value: Stco) -> Self {
        Self {
            _version: value.version,
            _flags: value.flags,
            no_of_entries: value.no_of_entries,
            offsets: value.offsets
                .iter()
                .map(|n| *n as u64)
                .collect()
        }
    }
}
