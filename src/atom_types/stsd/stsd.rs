//! Sample description atom (`stsd`).
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_description_atom>

use binrw::BinRead;

use super::{MediaKind, SampleDescription};

/// Sample description atom (`stsd`).
///
/// The media type of the owning track must be passed in,
/// since the payload layout depends on it.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sample_description_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big, import(media: MediaKind))]
pub struct Stsd {
    _version: u8,
    _flags: [u8; 3],
    _no_of_entries: u32,
    #[br(args {count: _no_of_entries as usize, inner: (media,)})]
    descriptions: Vec<SampleDescription>
}

impl Stsd {
    pub fn new(descriptions: Vec<SampleDescription>) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            _no_of_entries: descriptions.len() as u32,
            descriptions
        }
    }

    pub fn descriptions(&self) -> &[SampleDescription] {
        &self.descriptions
    }

    /// Returns sample description for 1-based index.
    pub fn get(&self, sample_description_index: u32) -> Option<&SampleDescription> {
        let index = usize::try_from(sample_description_index.checked_sub(1)?).ok()?;
        self.descriptions.get(index)
    }

    /// Returns `true` if the current `stsd`
    /// describes audio.
    pub fn is_audio(&self) -> bool {
        self.descriptions.iter()
            .any(|s| s.is_audio())
    }
}
