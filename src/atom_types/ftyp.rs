//! File type compatibility atom (`ftyp`).
//!
//! Location: `ftyp` (the very first atom in an MP4 file)
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/file_type_compatibility_atom>

use binrw::BinRead;

use crate::support::string_from_be_u32;

/// File type compatibility atom (`ftyp`).
///
/// Location: `ftyp` (the very first atom in an MP4 file)
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/file_type_compatibility_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big, import {data_size: u32})]
pub struct Ftyp {
    pub(crate) major_brand: u32,
    /// MP4: seems to be set to 0.
    /// QuickTime: Four binary-coded decimal values, indicating the century, year, and month of format spec.
    pub(crate) minor_version: u32,
    #[br(count = data_size.saturating_sub(8) / 4)]
    pub(crate) compatible_brands: Vec<u32>
}

impl Ftyp {
    pub fn new(major_brand: &[u8; 4], compatible_brands: &[&[u8; 4]]) -> Self {
        Self {
            major_brand: u32::from_be_bytes(*major_brand),
            minor_version: 0,
            compatible_brands: compatible_brands.iter()
                .map(|b| u32::from_be_bytes(**b))
                .collect()
        }
    }

    pub fn major_brand(&self) -> String {
        string_from_be_u32(self.major_brand, false)
    }

    pub fn minor_version(&self) -> u32 {
        self.minor_version
    }

    pub fn compatible_brands(&self) -> Vec<String> {
        self.compatible_brands
            .iter()
            .map(|c| string_from_be_u32(*c, false))
            .collect()
    }

    /// Major brand followed by all compatible brands.
    pub(crate) fn brands(&self) -> impl Iterator<Item = u32> + '_ {
        std::iter::once(self.major_brand).chain(self.compatible_brands.iter().copied())
    }
}
