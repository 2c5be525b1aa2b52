//! Time-to-sample atom (`stts`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stts`
//!
//! See <https://developer.apple.com/documentation/quicktime-file-format/time-to-sample_atom>

use binrw::BinRead;

use crate::track::Run;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct TimeToSample {
    pub(crate) sample_count: u32,
    pub(crate) sample_delta: u32,
}

impl TimeToSample {
    pub fn new(sample_count: u32, sample_delta: u32) -> Self {
        Self{sample_count, sample_delta}
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn sample_delta(&self) -> u32 {
        self.sample_delta
    }
}

impl Run for TimeToSample {
    type Value = u32;

    fn count(&self) -> u32 {
        self.sample_count
    }

    fn value(&self) -> u32 {
        self.sample_delta
    }
}

/// Time to sample atom (`stts`).
///
/// Path: `moov/trak[multiple]/mdia/minf/stbl/stts`
///
/// See <https://developer.apple.com/documentation/quicktime-file-format/time-to-sample_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Stts {
    _version: u8,
    _flags: [u8; 3],
    entry_count: u32,
    #[br(count = entry_count)]
    table: Vec<TimeToSample>
}

impl Stts {
    /// Create from `(SAMPLE_COUNT, SAMPLE_DELTA)` runs.
    pub fn new(runs: &[(u32, u32)]) -> Self {
        let table: Vec<TimeToSample> = runs.iter()
            .map(|(count, delta)| TimeToSample::new(*count, *delta))
            .collect();
        Self {
            _version: 0,
            _flags: [0; 3],
            entry_count: table.len() as u32,
            table
        }
    }

    /// Returns total number of samples.
    ///
    /// If an entry lists a duration for four samples,
    /// it counts as four entries towards the total.
    pub fn len(&self) -> usize {
        self.table.iter()
            .map(|t| t.sample_count as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &[TimeToSample] {
        &self.table
    }

    /// Sum of all sample deltas.
    pub fn duration_sum(&self) -> u64 {
        self.table.iter()
            .map(|t| t.sample_delta as u64 * t.sample_count as u64)
            .sum()
    }
}
