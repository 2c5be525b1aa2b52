//! Sound sample description.
//!
//! Covers QuickTime sound description versions 0, 1, and 2.
//! ISO audio sample entries share the version 0 layout.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sound_sample_description_version_0>

use binrw::BinRead;

#[derive(Debug, Clone, BinRead)]
#[br(big, import {size: u32})]
pub struct AudioDescription {
    /// A 16-bit integer that holds the sample description version (currently 0 or 1).
    pub(crate) version: u16,
    /// A 16-bit integer that must be set to 0.
    _revision_level: u16,
    /// A 32-bit integer that must be set to 0.
    _vendor: u32,
    /// A 16-bit integer that indicates the number of sound channels used by the sound sample.
    /// Set to 1 for monaural sounds, 2 for stereo sounds. Set to 3 for version 2.
    pub(crate) number_of_channels: u16,
    /// A 16-bit integer that specifies the number of bits in each uncompressed sound sample.
    /// Allowable values are 8 or 16.
    pub(crate) sample_size: u16,
    /// A 16-bit integer that must be set to 0 for version 0 sound descriptions.
    /// This may be set to –2 for some version 1 sound descriptions.
    pub(crate) compression_id: i16,
    /// A 16-bit integer that must be set to 0.
    _packet_size: u16,
    /// A 32-bit unsigned fixed-point number (16.16) that indicates the rate
    /// at which the sound samples were obtained.
    pub(crate) sample_rate: u32,
    #[br(if(version == 1))]
    pub(crate) v1: Option<SoundV1>,
    #[br(if(version == 2))]
    pub(crate) v2: Option<SoundV2>,
    /// Sound extension atoms as raw bytes.
    #[br(count = size.saturating_sub(
        36
        + v1.as_ref().map_or(0, |_| 16)
        + v2.as_ref().map_or(0, |_| 36)
    ))]
    extensions: Vec<u8>,
}

/// Version 1 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct SoundV1 {
    pub samples_per_packet: u32,
    pub bytes_per_packet: u32,
    pub bytes_per_frame: u32,
    pub bytes_per_sample: u32,
}

/// Version 2 fields.
#[derive(Debug, Clone, Copy, PartialEq, BinRead)]
#[br(big)]
pub struct SoundV2 {
    pub size_of_struct_only: u32,
    pub audio_sample_rate: f64,
    pub num_audio_channels: u32,
    _always_7f000000: u32,
    pub const_bits_per_channel: u32,
    pub format_specific_flags: u32,
    pub const_bytes_per_audio_packet: u32,
    pub const_lpcm_frames_per_audio_packet: u32,
}

impl SoundV2 {
    pub fn new(
        audio_sample_rate: f64,
        num_audio_channels: u32,
        const_bits_per_channel: u32,
        const_bytes_per_audio_packet: u32,
        const_lpcm_frames_per_audio_packet: u32,
    ) -> Self {
        Self {
            size_of_struct_only: 72,
            audio_sample_rate,
            num_audio_channels,
            _always_7f000000: 0x7F00_0000,
            const_bits_per_channel,
            format_specific_flags: 0,
            const_bytes_per_audio_packet,
            const_lpcm_frames_per_audio_packet,
        }
    }
}

impl AudioDescription {
    /// Version 0 sound description.
    pub fn v0(number_of_channels: u16, sample_size: u16, compression_id: i16, sample_rate: u16) -> Self {
        Self {
            version: 0,
            _revision_level: 0,
            _vendor: 0,
            number_of_channels,
            sample_size,
            compression_id,
            _packet_size: 0,
            sample_rate: (sample_rate as u32) << 16,
            v1: None,
            v2: None,
            extensions: Vec::new(),
        }
    }

    /// Version 1 sound description.
    pub fn v1(number_of_channels: u16, compression_id: i16, sample_rate: u16, v1: SoundV1) -> Self {
        Self {
            version: 1,
            v1: Some(v1),
            ..Self::v0(number_of_channels, 16, compression_id, sample_rate)
        }
    }

    /// Version 2 sound description.
    pub fn v2(compression_id: i16, v2: SoundV2) -> Self {
        Self {
            version: 2,
            v2: Some(v2),
            ..Self::v0(3, 16, compression_id, 1)
        }
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn number_of_channels(&self) -> u16 {
        self.number_of_channels
    }

    pub fn sample_size(&self) -> u16 {
        self.sample_size
    }

    pub fn compression_id(&self) -> i16 {
        self.compression_id
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        match &self.v2 {
            Some(v2) => v2.audio_sample_rate,
            None => self.sample_rate as f64 / 2_u32.pow(16) as f64
        }
    }

    pub fn extensions(&self) -> &[u8] {
        &self.extensions
    }
}
