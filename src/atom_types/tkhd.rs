//! Track header atom (`tkhd`).
//!
//! Location: `moov/trak[multiple]/tkhd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/track_header_atom>

use binrw::BinRead;

use crate::support::version_u64;

/// Track header atom (`tkhd`).
///
/// Only the leading fields up to and including the duration are decoded.
///
/// Location: `moov/trak[multiple]/tkhd`
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Tkhd {
    version: u8,
    _flags: [u8; 3],
    #[br(parse_with = version_u64, args(version))]
    pub(crate) creation_time: u64,
    #[br(parse_with = version_u64, args(version))]
    pub(crate) modification_time: u64,
    /// Uniquely identifies the track.
    /// Value 0 cannot be used.
    pub(crate) track_id: u32,
    _reserved1: [u8; 4],
    /// Indicates the duration of this track,
    /// in the movie’s time coordinate system.
    /// The value of this field is equal to the sum of the durations
    /// of all of the track’s edits.
    #[br(parse_with = version_u64, args(version))]
    pub(crate) duration: u64,
}

impl Tkhd {
    pub fn new(track_id: u32, duration: u64) -> Self {
        Self {
            version: 1,
            _flags: [0; 3],
            creation_time: 0,
            modification_time: 0,
            track_id,
            _reserved1: [0; 4],
            duration,
        }
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    /// Unscaled track duration in movie time scale units.
    pub fn duration(&self) -> u64 {
        self.duration
    }
}
