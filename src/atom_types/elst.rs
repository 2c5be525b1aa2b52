//! Edit list atom (`elst`).
//!
//! Location: `moov/trak[multiple]/edts/elst`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/edit_list_atom>

use binrw::BinRead;

use crate::{consts::EDIT_MODE_EMPTY, support::{version_i64, version_u64}};

/// Edit list atom (`elst`).
///
/// Location: `moov/trak[multiple]/edts/elst`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/edit_list_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Elst {
    version: u8,
    _flags: [u8; 3],
    number_of_entries: u32,
    #[br(args {count: number_of_entries as usize, inner: (version,)})]
    pub(crate) entries: Vec<EditEntry>
}

impl Elst {
    pub fn new(entries: Vec<EditEntry>) -> Self {
        Self {
            version: 1,
            _flags: [0; 3],
            number_of_entries: entries.len() as u32,
            entries
        }
    }

    pub fn entries(&self) -> &[EditEntry] {
        &self.entries
    }
}

/// A single edit. Widths are normalized to 64 bits regardless of atom version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big, import(version: u8))]
pub struct EditEntry {
    /// Duration of this edit in movie time scale units.
    /// 0 in fragmented files means "the rest of the media".
    #[br(parse_with = version_u64, args(version))]
    pub segment_duration: u64,
    /// Starting time within the media in media time scale units.
    /// `-1` for an empty edit.
    #[br(parse_with = version_i64, args(version))]
    pub media_time: i64,
    /// 16.16 fixed-point playback rate.
    pub media_rate: i32,
}

impl EditEntry {
    pub fn new(segment_duration: u64, media_time: i64, media_rate: i32) -> Self {
        Self{segment_duration, media_time, media_rate}
    }

    pub fn is_empty_edit(&self) -> bool {
        self.media_time == EDIT_MODE_EMPTY
    }

    /// Playback rate as a float. `1.0` is normal speed.
    pub fn rate(&self) -> f64 {
        self.media_rate as f64 / 2_u32.pow(16) as f64
    }
}
