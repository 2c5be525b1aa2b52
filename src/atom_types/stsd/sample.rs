//! Sample description. Part of `stsd` atom.

use binrw::BinRead;
use log::warn;

use crate::{consts::QT_AUDIO_COMPRESSION_ID_VARIABLE_COMPRESSION, support::string_from_be_u32};

use super::{AudioDescription, AudioFormat, DataLoad, MediaKind};

#[derive(Debug, Clone, BinRead)]
#[br(big, import(media: MediaKind))]
pub struct SampleDescription {
    // General fields. Apply to all stsd atoms.
    // 16 bytes.

    /// Sample description size
    size: u32,
    /// Data format, technically 4 character ascii string
    pub(crate) data_format: u32,
    /// Reserved. Must be set to 0.
    _reserved: [u8; 6],
    /// 1-based index into the `dref` table.
    pub(crate) data_reference_index: u16,
    #[br(calc = media)]
    pub(crate) media: MediaKind,

    // Custom fields. Depend on media type and data format.

    // size is total,
    // size of preceding fields (16 bytes) should be subtracted
    #[br(args {size, media})]
    data: DataLoad,
}

impl SampleDescription {
    /// Non-audio sample description with an opaque payload.
    pub fn new(data_format: &[u8; 4], media: MediaKind, data_reference_index: u16) -> Self {
        Self {
            size: 16,
            data_format: u32::from_be_bytes(*data_format),
            _reserved: [0; 6],
            data_reference_index,
            media,
            data: DataLoad::Binary(Vec::new()),
        }
    }

    /// Sound sample description.
    pub fn audio_with(data_format: &[u8; 4], data_reference_index: u16, audio: AudioDescription) -> Self {
        Self {
            media: MediaKind::Audio,
            data: DataLoad::Audio(audio),
            ..Self::new(data_format, MediaKind::Audio, data_reference_index)
        }
    }

    pub fn data(&self) -> &DataLoad {
        &self.data
    }

    pub fn data_format_string(&self) -> String {
        string_from_be_u32(self.data_format, false)
    }

    pub fn data_reference_index(&self) -> u16 {
        self.data_reference_index
    }

    pub fn media(&self) -> MediaKind {
        self.media
    }

    /// Returns true if the sample description is for audio.
    pub fn is_audio(&self) -> bool {
        self.media == MediaKind::Audio
    }

    /// Returns the sound sample description.
    pub fn audio(&self) -> Option<&AudioDescription> {
        self.data.audio()
    }

    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::from_be_u32(self.data_format)
    }

    /// Constant size uncompressed audio.
    pub fn is_lpcm(&self) -> bool {
        self.audio_format().is_lpcm(self.media)
    }

    /// QuickTime audio where every packet has the same size
    /// and duration. LPCM is a special case of fixed compression.
    pub fn is_fixed_compression(&self) -> bool {
        let Some(audio) = self.audio() else {
            return false
        };
        self.audio_format().is_qt_audio()
            && audio.compression_id != QT_AUDIO_COMPRESSION_ID_VARIABLE_COMPRESSION
    }

    /// Returns `(SAMPLES_PER_PACKET, BYTES_PER_PACKET)`
    /// for fixed compression audio.
    pub(crate) fn packet_layout(&self) -> Option<(u32, u32)> {
        if !self.is_fixed_compression() {
            return None
        }
        let audio = self.audio()?;
        let format = self.audio_format();
        let layout = match (audio.version, &audio.v1, &audio.v2) {
            (1, Some(v1), _) => (v1.samples_per_packet, v1.bytes_per_frame),
            (2, _, Some(v2)) => (v2.const_lpcm_frames_per_audio_packet, v2.const_bytes_per_audio_packet),
            _ => {
                let channels = audio.number_of_channels as u32;
                match format.implicit_packet_layout(channels) {
                    Some(layout) => layout,
                    None => {
                        if !format.is_lpcm(self.media) {
                            warn!("unsupported implicit sample table for '{}'", self.data_format_string());
                        }
                        (1, audio.sample_size as u32 * channels / 8)
                    }
                }
            }
        };
        Some(layout)
    }
}
