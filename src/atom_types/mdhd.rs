//! Media header atom (`mdhd`).
//!
//! Location: `moov/trak/mdia/mdhd`
//!
//! Holds the media time scale that all sample table
//! durations and timestamps are expressed in.

use binrw::BinRead;
use time::{ext::NumericalDuration, Duration};

use crate::support::version_u64;

/// Media header atom (`mdhd`). One per track.
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Mdhd {
    version: u8,
    _flags: [u8; 3],
    #[br(parse_with = version_u64, args(version))]
    _creation_time: u64,
    #[br(parse_with = version_u64, args(version))]
    _modification_time: u64,
    pub(crate) time_scale: u32,
    /// Media duration in media time scale units.
    #[br(parse_with = version_u64, args(version))]
    pub(crate) duration: u64,
    /// Packed ISO-639-2/T code, left as is.
    _language: u16,
    _quality: u16,
}

impl Mdhd {
    pub fn new(time_scale: u32, duration: u64) -> Self {
        Self {
            version: 1,
            _flags: [0; 3],
            _creation_time: 0,
            _modification_time: 0,
            time_scale,
            duration,
            _language: 0x55c4, // "und"
            _quality: 0,
        }
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn duration_unscaled(&self) -> u64 {
        self.duration
    }

    pub fn duration(&self) -> Duration {
        (self.duration as f64 / self.time_scale.max(1) as f64).seconds()
    }
}
