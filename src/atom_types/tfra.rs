//! Track fragment random access atom (`tfra`).
//!
//! Location: `mfra/tfra`
//!
//! Lists sync samples in fragments by `moof` position
//! and traf/trun/sample number (1-based).

use binrw::BinRead;

use crate::support::{sized_u32, version_u64};

/// Track fragment random access atom (`tfra`).
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Tfra {
    version: u8,
    _flags: [u8; 3],
    pub(crate) track_id: u32,
    /// `reserved(26) traf(2) trun(2) sample(2)`,
    /// each size stored minus one.
    #[br(map = |v: u32| [((v >> 4) & 0b11) as u8 + 1, ((v >> 2) & 0b11) as u8 + 1, (v & 0b11) as u8 + 1])]
    sizes: [u8; 3],
    number_of_entry: u32,
    #[br(args {count: number_of_entry as usize, inner: (version, sizes)})]
    pub(crate) entries: Vec<TfraEntry>,
}

impl Tfra {
    pub fn new(track_id: u32, entries: Vec<TfraEntry>) -> Self {
        Self {
            version: 1,
            _flags: [0; 3],
            track_id,
            sizes: [4; 3],
            number_of_entry: entries.len() as u32,
            entries,
        }
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn entries(&self) -> &[TfraEntry] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big, import(version: u8, sizes: [u8; 3]))]
pub struct TfraEntry {
    /// Presentation time of the sync sample.
    #[br(parse_with = version_u64, args(version))]
    pub time: u64,
    /// Absolute file position of the `moof`.
    #[br(parse_with = version_u64, args(version))]
    pub moof_offset: u64,
    #[br(parse_with = sized_u32, args(sizes[0]))]
    pub traf_number: u32,
    #[br(parse_with = sized_u32, args(sizes[1]))]
    pub trun_number: u32,
    #[br(parse_with = sized_u32, args(sizes[2]))]
    pub sample_number: u32,
}

impl TfraEntry {
    pub fn new(time: u64, moof_offset: u64, traf_number: u32, trun_number: u32, sample_number: u32) -> Self {
        Self{time, moof_offset, traf_number, trun_number, sample_number}
    }
}
