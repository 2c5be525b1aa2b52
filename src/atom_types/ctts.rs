//! Composition offset atom (`ctts`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/ctts`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/composition_offset_atom>

use binrw::BinRead;

use crate::track::Run;

/// Composition offset atom (`ctts`).
///
/// Offsets are stored as raw 32-bit patterns.
/// Version 1 (and QuickTime files) interpret them as signed.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/composition_offset_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Ctts {
    pub(crate) version: u8,
    _flags: [u8; 3],
    entry_count: u32,
    #[br(count = entry_count)]
    offset_table: Vec<OffsetTableEntry>
}

impl Ctts {
    /// Create from `(SAMPLE_COUNT, SAMPLE_OFFSET)` runs.
    pub fn new(version: u8, runs: &[(u32, i32)]) -> Self {
        let offset_table: Vec<OffsetTableEntry> = runs.iter()
            .map(|(sample_count, offset)| OffsetTableEntry {
                sample_count: *sample_count,
                sample_offset: *offset as u32
            })
            .collect();
        Self {
            version,
            _flags: [0; 3],
            entry_count: offset_table.len() as u32,
            offset_table
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn offset_table(&self) -> &[OffsetTableEntry] {
        &self.offset_table
    }
}

/// Composition offset table
#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct OffsetTableEntry {
    pub sample_count: u32,
    pub sample_offset: u32
}

impl Run for OffsetTableEntry {
    type Value = u32;

    fn count(&self) -> u32 {
        self.sample_count
    }

    fn value(&self) -> u32 {
        self.sample_offset
    }
}
