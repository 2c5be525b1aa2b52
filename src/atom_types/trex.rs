//! Track extends atom (`trex`).
//!
//! Location: `moov/mvex/trex`
//!
//! Sets up default values used by the movie fragments.
//! One per track.

use binrw::BinRead;

use super::SampleFlags;

/// Track extends atom (`trex`).
///
/// Location: `moov/mvex/trex`
#[derive(Debug, Clone, Copy, Default, BinRead)]
#[br(big)]
pub struct Trex {
    _version: u8,
    _flags: [u8; 3],
    pub(crate) track_id: u32,
    pub(crate) default_sample_description_index: u32,
    pub(crate) default_sample_duration: u32,
    pub(crate) default_sample_size: u32,
    #[br(map = |f: u32| SampleFlags::from(f))]
    pub(crate) default_sample_flags: SampleFlags,
}

impl Trex {
    pub fn new(
        track_id: u32,
        default_sample_description_index: u32,
        default_sample_duration: u32,
        default_sample_size: u32,
        default_sample_flags: SampleFlags,
    ) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            track_id,
            default_sample_description_index,
            default_sample_duration,
            default_sample_size,
            default_sample_flags,
        }
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn default_sample_description_index(&self) -> u32 {
        self.default_sample_description_index
    }

    pub fn default_sample_duration(&self) -> u32 {
        self.default_sample_duration
    }

    pub fn default_sample_size(&self) -> u32 {
        self.default_sample_size
    }

    pub fn default_sample_flags(&self) -> SampleFlags {
        self.default_sample_flags
    }
}
