//! Sample dependency flags atom (`sdtp`)
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/sdtp`, `moof/traf/sdtp`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_dependency_flags_atom>

use binrw::BinRead;

/// Sample dependency flags atom (`sdtp`).
///
/// The atom has no entry count. The number of entries
/// is derived from the atom's data size, one byte per sample.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sample_dependency_flags_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big, import {data_size: u32})]
pub struct Sdtp {
    _version: u8,
    _flags: [u8; 3],
    #[br(
        count = data_size.saturating_sub(4),
        map = |bytes: Vec<u8>| bytes.into_iter().map(SampleDependency::from_byte).collect()
    )]
    pub(crate) entries: Vec<SampleDependency>
}

impl Sdtp {
    pub fn new(entries: Vec<SampleDependency>) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            entries
        }
    }

    pub fn entries(&self) -> &[SampleDependency] {
        &self.entries
    }
}

/// One `sdtp` byte split into four 2-bit fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleDependency {
    /// `is_leading` under ISO, `sample_is_earlier_pts_allowed` under QuickTime.
    pub is_leading: u8,
    pub sample_depends_on: u8,
    pub sample_is_depended_on: u8,
    pub sample_has_redundancy: u8,
}

impl SampleDependency {
    pub fn new(
        is_leading: u8,
        sample_depends_on: u8,
        sample_is_depended_on: u8,
        sample_has_redundancy: u8,
    ) -> Self {
        Self {
            is_leading,
            sample_depends_on,
            sample_is_depended_on,
            sample_has_redundancy,
        }
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            is_leading: (byte >> 6) & 0b11,
            sample_depends_on: (byte >> 4) & 0b11,
            sample_is_depended_on: (byte >> 2) & 0b11,
            sample_has_redundancy: byte & 0b11,
        }
    }
}
