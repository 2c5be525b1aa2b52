use std::fmt::Display;

use binrw::BinRead;

use super::AudioDescription;

/// Media type of the track owning a sample description,
/// derived from the handler type (`hdlr`).
///
/// Needed since a few format codes are shared between media types,
/// e.g. `raw ` is both uncompressed RGB video and 8-bit offset binary audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaKind {
    /// `soun`
    Audio,
    /// `vide`
    Video,
    #[default]
    Other,
}

impl MediaKind {
    /// From handler type, e.g. `soun`.
    pub fn from_handler(handler_type: &[u8; 4]) -> Self {
        match handler_type {
            b"soun" => Self::Audio,
            b"vide" => Self::Video,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, BinRead)]
#[br(import {size: u32, media: MediaKind})]
pub enum DataLoad {
    #[br(pre_assert(media == MediaKind::Audio))]
    Audio(
        #[br(args {size})]
        AudioDescription
    ),
    Binary(
        #[br(count = size.saturating_sub(16))]
        Vec<u8>
    ),
}

impl DataLoad {
    pub fn audio(&self) -> Option<&AudioDescription> {
        match &self {
            Self::Audio(a) => Some(a),
            _ => None,
        }
    }

    pub fn binary(&self) -> Option<&[u8]> {
        match &self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// QuickTime sound format codes.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sound_sample_descriptions>
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AudioFormat {
    /// `0x00000000` Not specified
    NotSpecified,
    /// `23ni` 32-bit little-endian integer
    TwentyThreeNi,
    /// `NONE` kSoundNotCompressed
    None,
    /// `lpcm` Linear PCM, parameters in the sound description
    Lpcm,
    /// `raw ` k8BitOffsetBinaryFormat
    Raw,
    /// `twos` k16BitBigEndianFormat
    Twos,
    /// `sowt` k16BitLittleEndianFormat
    Sowt,
    /// `fl32` 32-bit floating point
    Fl32,
    /// `fl64` 64-bit floating point
    Fl64,
    /// `in24` 24-bit integer
    In24,
    /// `in32` 32-bit integer
    In32,
    /// `MAC3` MACE 3:1
    Mac3,
    /// `MAC6` MACE 6:1
    Mac6,
    /// `ima4` IMA 4:1
    Ima4,
    /// `ulaw` uLaw 2:1
    Ulaw,
    /// `alaw` aLaw 2:1
    Alaw,
    /// `agsm` GSM
    Agsm,
    /// `alac` Apple Lossless
    Alac,
    /// `cdx2`
    Cdx2,
    /// `cdx4`
    Cdx4,
    /// `dvca` DV Audio
    Dvca,
    /// `dvi ` DVI/Intel IMA
    Dvi,
    /// `vdva` DV Audio variant
    Vdva,
    /// `QDMC` QDesign music
    Qdmc,
    /// `QDM2` QDesign music version 2
    Qdm2,
    /// `Qclp` QUALCOMM PureVoice
    Qclp,
    /// `ac-3` Digital Audio Compression Standard
    Ac3,
    /// `mp4a` MPEG-4 Advanced Audio Coding
    Mp4a,
    /// `.mp3` MPEG-1 layer 3, CBR & VBR
    FullMp3,
    /// `ms\0U` MPEG-1 layer 3, CBR only
    Mp3,
    /// `ms\0\x02` Microsoft ADPCM
    MsAdpcm,
    /// `ms\0\x11` DVI/Intel IMA ADPCM
    IntelAdpcm,
    /// `ms\0\x31` Microsoft GSM 6.10
    Gsm49,
    /// Unknown/undocumented audio format
    Unknown
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str().unwrap_or("Unknown"))
    }
}

impl AudioFormat {
    /// Convert from Big Endian `u32` to `AudioFormat`
    pub fn from_be_u32(value: u32) -> Self {
        match &value.to_be_bytes() {
            b"\0\0\0\0" => Self::NotSpecified,
            b"23ni" => Self::TwentyThreeNi,
            b"NONE" => Self::None,
            b"lpcm" => Self::Lpcm,
            b"raw " => Self::Raw,
            b"twos" => Self::Twos,
            b"sowt" => Self::Sowt,
            b"fl32" => Self::Fl32,
            b"fl64" => Self::Fl64,
            b"in24" => Self::In24,
            b"in32" => Self::In32,
            b"MAC3" => Self::Mac3,
            b"MAC6" => Self::Mac6,
            b"ima4" => Self::Ima4,
            b"ulaw" => Self::Ulaw,
            b"alaw" => Self::Alaw,
            b"agsm" => Self::Agsm,
            b"alac" => Self::Alac,
            b"cdx2" => Self::Cdx2,
            b"cdx4" => Self::Cdx4,
            b"dvca" => Self::Dvca,
            b"dvi " => Self::Dvi,
            b"vdva" => Self::Vdva,
            b"QDMC" => Self::Qdmc,
            b"QDM2" => Self::Qdm2,
            b"Qclp" => Self::Qclp,
            b"ac-3" => Self::Ac3,
            b"mp4a" => Self::Mp4a,
            b".mp3" => Self::FullMp3,
            b"ms\0U" => Self::Mp3,
            b"ms\0\x02" => Self::MsAdpcm,
            b"ms\0\x11" => Self::IntelAdpcm,
            b"ms\0\x31" => Self::Gsm49,
            _ => Self::Unknown
        }
    }

    // Returns `&str` in the same form
    // format is stored, e.g. with added
    // space if only three bytes/characters.
    pub fn to_str(&self) -> Option<&str> {
        match self {
            AudioFormat::NotSpecified => Some("\0\0\0\0"),
            AudioFormat::TwentyThreeNi => Some("23ni"),
            AudioFormat::None => Some("NONE"),
            AudioFormat::Lpcm => Some("lpcm"),
            AudioFormat::Raw => Some("raw "),
            AudioFormat::Twos => Some("twos"),
            AudioFormat::Sowt => Some("sowt"),
            AudioFormat::Fl32 => Some("fl32"),
            AudioFormat::Fl64 => Some("fl64"),
            AudioFormat::In24 => Some("in24"),
            AudioFormat::In32 => Some("in32"),
            AudioFormat::Mac3 => Some("MAC3"),
            AudioFormat::Mac6 => Some("MAC6"),
            AudioFormat::Ima4 => Some("ima4"),
            AudioFormat::Ulaw => Some("ulaw"),
            AudioFormat::Alaw => Some("alaw"),
            AudioFormat::Agsm => Some("agsm"),
            AudioFormat::Alac => Some("alac"),
            AudioFormat::Cdx2 => Some("cdx2"),
            AudioFormat::Cdx4 => Some("cdx4"),
            AudioFormat::Dvca => Some("dvca"),
            AudioFormat::Dvi => Some("dvi "),
            AudioFormat::Vdva => Some("vdva"),
            AudioFormat::Qdmc => Some("QDMC"),
            AudioFormat::Qdm2 => Some("QDM2"),
            AudioFormat::Qclp => Some("Qclp"),
            AudioFormat::Ac3 => Some("ac-3"),
            AudioFormat::Mp4a => Some("mp4a"),
            AudioFormat::FullMp3 => Some(".mp3"),
            AudioFormat::Mp3 => Some("ms\0U"),
            AudioFormat::MsAdpcm => Some("ms\0\x02"),
            AudioFormat::IntelAdpcm => Some("ms\0\x11"),
            AudioFormat::Gsm49 => Some("ms\0\x31"),
            AudioFormat::Unknown => None,
        }
    }

    /// Uncompressed PCM, stored with a constant size per sample.
    ///
    /// `raw ` only counts when the owning track is audio,
    /// since the same code is used for uncompressed RGB video.
    pub fn is_lpcm(&self, media: MediaKind) -> bool {
        match self {
            Self::TwentyThreeNi
            | Self::None
            | Self::Lpcm
            | Self::Sowt
            | Self::Twos
            | Self::Fl32
            | Self::Fl64
            | Self::In24
            | Self::In32
            | Self::NotSpecified => true,
            Self::Raw => media == MediaKind::Audio,
            _ => false
        }
    }

    /// Known QuickTime sound format.
    pub fn is_qt_audio(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Samples per packet and bytes per packet for version 0
    /// sound descriptions of compressed formats with an implicit layout.
    pub(crate) fn implicit_packet_layout(&self, channels: u32) -> Option<(u32, u32)> {
        match self {
            Self::Mac3 => Some((6, 2 * channels)),
            Self::Mac6 => Some((6, channels)),
            Self::IntelAdpcm => Some((64, 34 * channels)),
            Self::Agsm => Some((160, 33)),
            Self::Alaw | Self::Ulaw => Some((1, channels)),
            _ => None
        }
    }
}
