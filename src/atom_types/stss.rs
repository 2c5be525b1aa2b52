//! Sync sample atom (`stss`).
//! Partial sync sample atom (`stps`) shares the same layout.
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stss`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sync_sample_atom>

use binrw::BinRead;

/// Sync sample atom (`stss`), or partial sync sample atom (`stps`).
///
/// Sample numbers are 1-based and in ascending order.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sync_sample_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Stss {
    _version: u8,
    _flags: [u8; 3],
    number_of_entries: u32,
    #[br(count = number_of_entries)]
    pub(crate) sample_numbers: Vec<u32>
}

impl Stss {
    pub fn new(sample_numbers: &[u32]) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            number_of_entries: sample_numbers.len() as u32,
            sample_numbers: sample_numbers.to_vec()
        }
    }

    pub fn sample_numbers(&self) -> &[u32] {
        &self.sample_numbers
    }
}
