//! Track fragment header atom (`tfhd`).
//!
//! Location: `moof/traf/tfhd`
//!
//! Optional fields are present depending on `tf_flags`.

use binrw::BinRead;

use crate::{consts::tf_flags, support::flags_from_bytes};

use super::SampleFlags;

/// Track fragment header atom (`tfhd`).
///
/// Location: `moof/traf/tfhd`
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Tfhd {
    _version: u8,
    #[br(map = |b: [u8; 3]| flags_from_bytes(b))]
    pub(crate) flags: u32,
    pub(crate) track_id: u32,
    #[br(if(flags & tf_flags::BASE_DATA_OFFSET_PRESENT != 0))]
    pub(crate) base_data_offset: Option<u64>,
    #[br(if(flags & tf_flags::SAMPLE_DESCRIPTION_INDEX_PRESENT != 0))]
    pub(crate) sample_description_index: Option<u32>,
    #[br(if(flags & tf_flags::DEFAULT_SAMPLE_DURATION_PRESENT != 0))]
    pub(crate) default_sample_duration: Option<u32>,
    #[br(if(flags & tf_flags::DEFAULT_SAMPLE_SIZE_PRESENT != 0))]
    pub(crate) default_sample_size: Option<u32>,
    /// Raw sample flags, see `SampleFlags`.
    #[br(if(flags & tf_flags::DEFAULT_SAMPLE_FLAGS_PRESENT != 0))]
    pub(crate) default_sample_flags: Option<u32>,
}

impl Tfhd {
    /// Header with no optional fields.
    /// Use the `with_*` methods to set them, which also sets
    /// the corresponding flag.
    pub fn new(track_id: u32) -> Self {
        Self {
            track_id,
            ..Self::default()
        }
    }

    pub fn with_base_data_offset(self, base_data_offset: u64) -> Self {
        Self {
            flags: self.flags | tf_flags::BASE_DATA_OFFSET_PRESENT,
            base_data_offset: Some(base_data_offset),
            ..self
        }
    }

    pub fn with_sample_description_index(self, index: u32) -> Self {
        Self {
            flags: self.flags | tf_flags::SAMPLE_DESCRIPTION_INDEX_PRESENT,
            sample_description_index: Some(index),
            ..self
        }
    }

    pub fn with_default_sample_duration(self, duration: u32) -> Self {
        Self {
            flags: self.flags | tf_flags::DEFAULT_SAMPLE_DURATION_PRESENT,
            default_sample_duration: Some(duration),
            ..self
        }
    }

    pub fn with_default_sample_size(self, size: u32) -> Self {
        Self {
            flags: self.flags | tf_flags::DEFAULT_SAMPLE_SIZE_PRESENT,
            default_sample_size: Some(size),
            ..self
        }
    }

    pub fn with_default_sample_flags(self, sample_flags: SampleFlags) -> Self {
        Self {
            flags: self.flags | tf_flags::DEFAULT_SAMPLE_FLAGS_PRESENT,
            default_sample_flags: Some(sample_flags.into()),
            ..self
        }
    }

    /// Base data offset is the start of the enclosing `moof`.
    pub fn with_default_base_is_moof(self) -> Self {
        Self {
            flags: self.flags | tf_flags::DEFAULT_BASE_IS_MOOF,
            ..self
        }
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn base_data_offset(&self) -> Option<u64> {
        self.base_data_offset
    }

    pub fn default_sample_flags(&self) -> Option<SampleFlags> {
        self.default_sample_flags.map(SampleFlags::from)
    }

    pub(crate) fn default_base_is_moof(&self) -> bool {
        self.flags & tf_flags::DEFAULT_BASE_IS_MOOF != 0
    }
}
