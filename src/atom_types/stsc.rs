//! Sample to chunk atom (`stsc`)
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsc`
//!
//! See:
//! - Sample to chunk atom: <https://developer.apple.com/documentation/quicktime-file-format/sample-to-chunk_atom>
//! - Sample to chunk table: <https://developer.apple.com/documentation/quicktime-file-format/sample-to-chunk_atom/sample-to-chunk_table>
//! - <https://github.com/essential61/mp4analyser/wiki/Understanding-The-Sample-Tables:-An-Example>

use binrw::BinRead;

/// Sample to chunk atom (`stsc`)
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Stsc {
    _version: u8,
    _flags: [u8; 3],
    entry_count: u32,
    #[br(count = entry_count)]
    pub(crate) sample_to_chunk_table: Vec<SampleToChunk>,
}

impl Stsc {
    /// Create from `(FIRST_CHUNK, SAMPLES_PER_CHUNK, SAMPLE_DESCRIPTION_INDEX)` entries.
    pub fn new(entries: &[(u32, u32, u32)]) -> Self {
        let sample_to_chunk_table: Vec<SampleToChunk> = entries.iter()
            .map(|(first_chunk, samples_per_chunk, sample_description_index)| SampleToChunk {
                first_chunk: *first_chunk,
                samples_per_chunk: *samples_per_chunk,
                sample_description_index: *sample_description_index,
            })
            .collect();
        Self {
            _version: 0,
            _flags: [0; 3],
            entry_count: sample_to_chunk_table.len() as u32,
            sample_to_chunk_table
        }
    }

    pub fn table(&self) -> &[SampleToChunk] {
        &self.sample_to_chunk_table
    }

    pub fn len(&self) -> usize {
        self.sample_to_chunk_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_to_chunk_table.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct SampleToChunk {
    /// 1-based index of first chunk
    /// that contains the number of
    /// samples specified in `samples_per_chunk`.
    /// The following chunks will all contain the
    /// same number of samples until the next
    /// sample to chunk entry.
    pub(crate) first_chunk: u32,
    /// Number of samples for chunk number
    /// specified by `first_chunk` and on,
    /// until the next sample to chunk entry.
    pub(crate) samples_per_chunk: u32,
    pub(crate) sample_description_index: u32,
}

impl SampleToChunk {
    pub fn first_chunk(&self) -> u32 {
        self.first_chunk
    }

    pub fn samples_per_chunk(&self) -> u32 {
        self.samples_per_chunk
    }

    pub fn sample_description_index(&self) -> u32 {
        self.sample_description_index
    }
}
