//! Data reference atom (`dref`).
//! Declares source(s) of media data in track.
//!
//! Location: `moov/trak[multiple]/mdia/minf/dinf/dref`

use binrw::BinRead;

use crate::{consts::DREF_SELF_CONTAINED, support::{flags_from_bytes, string_from_be_u32}};

/// Data reference atom (`dref`).
/// Declares source(s) of media data in track.
///
/// Location: `moov/trak[multiple]/mdia/minf/dinf/dref`
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Dref {
    _version: u8,
    _flags: [u8; 3],
    number_of_entries: u32,
    #[br(count = number_of_entries)]
    table: Vec<DataReference>
}

impl Dref {
    pub fn new(table: Vec<DataReference>) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            number_of_entries: table.len() as u32,
            table
        }
    }

    pub fn table(&self) -> &[DataReference] {
        &self.table
    }

    /// Returns entry for 1-based data reference index.
    pub fn get(&self, data_reference_index: u16) -> Option<&DataReference> {
        let index = usize::from(data_reference_index.checked_sub(1)?);
        self.table.get(index)
    }
}

/// Data reference entry, e.g. `url `, `alis`.
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct DataReference {
    pub size: u32,
    pub kind: u32,
    _version: u8,
    #[br(map = |b: [u8; 3]| flags_from_bytes(b))]
    pub flags: u32,
    #[br(count = size.saturating_sub(12))]
    pub data: Vec<u8>,
}

impl DataReference {
    /// Self-contained `url ` entry.
    pub fn self_contained() -> Self {
        Self {
            size: 12,
            kind: u32::from_be_bytes(*b"url "),
            _version: 0,
            flags: DREF_SELF_CONTAINED,
            data: Vec::new(),
        }
    }

    /// External reference, e.g. a `url ` entry with a location string.
    pub fn external(kind: u32, data: Vec<u8>) -> Self {
        Self {
            size: 12 + data.len() as u32,
            kind,
            _version: 0,
            flags: 0,
            data,
        }
    }

    pub fn kind_string(&self) -> String {
        string_from_be_u32(self.kind, false)
    }

    /// Media data is in the same file as the movie atom.
    pub fn is_self_contained(&self) -> bool {
        self.flags & DREF_SELF_CONTAINED != 0
    }
}
