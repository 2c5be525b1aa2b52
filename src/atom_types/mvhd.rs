//! Movie header atom (`mvhd`).
//!
//! Location: `moov/mvhd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/movie_header_atom>

use binrw::BinRead;
use time::{Duration, ext::NumericalDuration};

use crate::support::version_u64;

/// Movie header atom (`mvhd`).
///
/// Only the fields the timeline needs are decoded.
/// The remaining bytes (rate, volume, matrix, etc) are skipped by the caller.
///
/// Location: `moov/mvhd`
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Mvhd {
    version: u8,
    _flags: [u8; 3],
    /// Seconds since midnight, 1904-01-01 UTC
    #[br(parse_with = version_u64, args(version))]
    pub creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC
    #[br(parse_with = version_u64, args(version))]
    pub modification_time: u64,
    /// Number of time units that pass in one second
    pub time_scale: u32,
    /// Unscaled duration of the longest track.
    #[br(parse_with = version_u64, args(version))]
    pub duration: u64,
}

impl Mvhd {
    pub fn new(time_scale: u32, duration: u64) -> Self {
        Self {
            version: 1,
            _flags: [0; 3],
            creation_time: 0,
            modification_time: 0,
            time_scale,
            duration,
        }
    }

    /// Duration of the longest track in seconds.
    pub fn duration(&self) -> Duration {
        (self.duration as f64 / self.time_scale.max(1) as f64).seconds()
    }
}
