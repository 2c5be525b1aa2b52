//! Per-track sample timeline.
//!
//! Lookups are O(1) for sequential access, forwards or backwards,
//! relative to the last lookup, and a linear scan otherwise.

use std::fmt;

use time::{Duration, ext::NumericalDuration};

use crate::{atom_types::EditEntry, ByteStream, Mp4Error};

use super::{
    builder::TimelineBuilder,
    cache::ChunkCache,
    Chunk,
    Compatibility,
    LpcmBunch,
    MovieFragments,
    Property,
    Sample,
    SampleInfo,
    SampleMetadata,
    TrackTables,
};

/// Sample records, either one per sample or LPCM bunches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleIndex {
    General(Vec<SampleInfo>),
    Lpcm(Vec<LpcmBunch>),
}

impl SampleIndex {
    /// Number of records (not samples).
    pub fn len(&self) -> usize {
        match self {
            Self::General(infos) => infos.len(),
            Self::Lpcm(bunches) => bunches.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_lpcm(&self) -> bool {
        matches!(self, Self::Lpcm(_))
    }
}

/// Tolerated inconsistency found while building the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineWarning {
    /// `stsc` entry with a `first_chunk` lower than the current chunk
    /// was skipped. `entry` is 1-based.
    SkippedStscEntry{entry: u32, first_chunk: u32, chunk_number: u32},
}

impl fmt::Display for TimelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedStscEntry{entry, first_chunk, chunk_number} => write!(f,
                "Ignored broken 'stsc' entry {entry} (first chunk {first_chunk}) at chunk {chunk_number}, timeline might be corrupted."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DtsCache {
    pub(crate) sample_number: u32,
    pub(crate) dts: u64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BunchCache {
    /// 0-based index into the bunch list.
    pub(crate) index: usize,
    pub(crate) first_sample_number: u32,
    pub(crate) sample_count: u32,
    pub(crate) duration: u32,
    /// DTS of the first sample in the bunch.
    pub(crate) dts: u64,
}

/// Sample timeline for a single track.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub(crate) track_id: u32,
    pub(crate) movie_timescale: u32,
    pub(crate) media_timescale: u32,
    /// Movie time scale units.
    pub(crate) track_duration: u64,
    pub(crate) fragmented: bool,
    pub(crate) compatibility: Compatibility,
    pub(crate) edits: Vec<EditEntry>,
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) index: SampleIndex,
    pub(crate) sample_count: u32,
    pub(crate) max_sample_size: u32,
    /// Media time scale units.
    pub(crate) media_duration: u64,
    pub(crate) ctd_shift: u32,
    pub(crate) warnings: Vec<TimelineWarning>,
    pub(crate) dts_cache: Option<DtsCache>,
    pub(crate) bunch_cache: Option<BunchCache>,
    pub(crate) chunk_cache: ChunkCache,
}

impl Timeline {
    /// Builds the timeline for the track in `tables`.
    /// `fragments` are only used if they contain at least
    /// one `moof` and one `trex`.
    pub fn build(
        tables: &TrackTables,
        fragments: Option<&MovieFragments>,
        compatibility: Compatibility,
    ) -> Result<Self, Mp4Error> {
        TimelineBuilder::build(tables, fragments, compatibility)
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn movie_timescale(&self) -> u32 {
        self.movie_timescale
    }

    pub fn media_timescale(&self) -> u32 {
        self.media_timescale
    }

    /// Track duration in movie time scale units.
    pub fn track_duration(&self) -> u64 {
        self.track_duration
    }

    /// Sum of all sample durations in media time scale units.
    pub fn media_duration(&self) -> u64 {
        self.media_duration
    }

    /// Media duration as `time::Duration`.
    pub fn duration(&self) -> Duration {
        (self.media_duration as f64 / self.media_timescale as f64).seconds()
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Largest sample size in bytes.
    pub fn max_sample_size(&self) -> u32 {
        self.max_sample_size
    }

    /// Composition to decode shift. Adding this to a sample's CTS
    /// gives a non-negative presentation time.
    pub fn composition_to_decode_shift(&self) -> u32 {
        self.ctd_shift
    }

    pub fn is_lpcm(&self) -> bool {
        self.index.is_lpcm()
    }

    pub fn is_fragmented(&self) -> bool {
        self.fragmented
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn index(&self) -> &SampleIndex {
        &self.index
    }

    /// Tolerated inconsistencies found while building the timeline.
    pub fn warnings(&self) -> &[TimelineWarning] {
        &self.warnings
    }

    /// Edit list (timeline map).
    pub fn edit_list(&self) -> &[EditEntry] {
        &self.edits
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Returns edit for 1-based edit number.
    pub fn edit(&self, edit_number: u32) -> Option<&EditEntry> {
        let index = usize::try_from(edit_number.checked_sub(1)?).ok()?;
        self.edits.get(index)
    }

    pub(crate) fn reset_caches(&mut self) {
        self.dts_cache = None;
        self.bunch_cache = None;
        self.chunk_cache.clear();
    }

    pub(crate) fn check_range(&self, sample_number: u32) -> Result<(), Mp4Error> {
        if sample_number == 0 || sample_number > self.sample_count {
            return Err(Mp4Error::SampleOutOfRange{
                sample_number,
                sample_count: self.sample_count
            })
        }
        Ok(())
    }

    /// CTS from DTS and the stored offset.
    /// The offset is signed only if the track has a composition shift.
    pub(crate) fn composition(&self, dts: u64, offset: u32) -> i64 {
        match self.ctd_shift {
            0 => dts as i64 + offset as i64,
            _ => dts as i64 + offset as i32 as i64,
        }
    }

    /// Record for 1-based sample number, general tracks only.
    pub(crate) fn info(&self, sample_number: u32) -> Option<&SampleInfo> {
        match &self.index {
            SampleIndex::General(infos) => infos.get(sample_number.checked_sub(1)? as usize),
            SampleIndex::Lpcm(_) => None,
        }
    }

    pub(crate) fn require_info(&self, sample_number: u32) -> Result<&SampleInfo, Mp4Error> {
        self.info(sample_number)
            .ok_or(Mp4Error::MissingSampleRecord(sample_number))
    }

    /// Locates the LPCM bunch containing `sample_number`.
    /// Returns the bunch, the DTS of the sample,
    /// and its 0-based position within the bunch.
    fn locate_bunch(&mut self, sample_number: u32) -> Result<(LpcmBunch, u64, u32), Mp4Error> {
        let SampleIndex::Lpcm(bunches) = &self.index else {
            return Err(Mp4Error::MissingSampleRecord(sample_number))
        };

        if let Some(cache) = self.bunch_cache {
            if sample_number >= cache.first_sample_number
                && sample_number < cache.first_sample_number + cache.sample_count
            {
                let k = sample_number - cache.first_sample_number;
                let bunch = bunches.get(cache.index)
                    .ok_or(Mp4Error::MissingSampleRecord(sample_number))?;
                return Ok((*bunch, cache.dts + k as u64 * cache.duration as u64, k))
            }
        }

        // Continue from the cached bunch if the sample is after it.
        let (mut index, mut first_sample_number, mut dts) = match self.bunch_cache {
            Some(cache) if cache.first_sample_number <= sample_number => (
                cache.index + 1,
                cache.first_sample_number + cache.sample_count,
                cache.dts + cache.duration as u64 * cache.sample_count as u64
            ),
            _ => (0, 1, 0)
        };

        let bunch = loop {
            let bunch = bunches.get(index)
                .ok_or(Mp4Error::MissingSampleRecord(sample_number))?;
            if sample_number < first_sample_number + bunch.sample_count {
                break *bunch
            }
            dts += bunch.total_duration();
            first_sample_number += bunch.sample_count;
            index += 1;
        };

        self.bunch_cache = Some(BunchCache {
            index,
            first_sample_number,
            sample_count: bunch.sample_count,
            duration: bunch.duration,
            dts,
        });

        let k = sample_number - first_sample_number;
        Ok((bunch, dts + k as u64 * bunch.duration as u64, k))
    }

    fn dts_general(&mut self, sample_number: u32) -> Result<u64, Mp4Error> {
        let dts = match self.dts_cache {
            Some(cache) if cache.sample_number == sample_number => cache.dts,
            _ if sample_number == 1 => 0,
            Some(cache) if sample_number == cache.sample_number + 1 => {
                cache.dts + self.require_info(cache.sample_number)?.duration as u64
            },
            Some(cache) if sample_number + 1 == cache.sample_number => {
                cache.dts.saturating_sub(self.require_info(sample_number)?.duration as u64)
            },
            _ => {
                let SampleIndex::General(infos) = &self.index else {
                    return Err(Mp4Error::MissingSampleRecord(sample_number))
                };
                if sample_number as usize > infos.len() {
                    return Err(Mp4Error::MissingSampleRecord(sample_number))
                }
                infos.iter()
                    .take(sample_number as usize - 1)
                    .map(|i| i.duration as u64)
                    .sum()
            }
        };
        self.dts_cache = Some(DtsCache{sample_number, dts});
        Ok(dts)
    }

    /// Decoding timestamp of 1-based `sample_number`
    /// in media time scale units.
    pub fn dts(&mut self, sample_number: u32) -> Result<u64, Mp4Error> {
        self.check_range(sample_number)?;
        match self.index {
            SampleIndex::General(_) => self.dts_general(sample_number),
            SampleIndex::Lpcm(_) => Ok(self.locate_bunch(sample_number)?.1),
        }
    }

    /// Composition timestamp of 1-based `sample_number`
    /// in media time scale units.
    /// Negative if the sample precedes the composition shift.
    pub fn cts(&mut self, sample_number: u32) -> Result<i64, Mp4Error> {
        Ok(self.metadata(sample_number)?.0.cts)
    }

    /// Decoding timestamp as `time::Duration`.
    pub fn dts_time(&mut self, sample_number: u32) -> Result<Duration, Mp4Error> {
        let dts = self.dts(sample_number)?;
        Ok((dts as f64 / self.media_timescale as f64).seconds())
    }

    /// Duration of 1-based `sample_number`
    /// in media time scale units.
    pub fn sample_duration(&mut self, sample_number: u32) -> Result<u32, Mp4Error> {
        self.check_range(sample_number)?;
        match self.index {
            SampleIndex::General(_) => Ok(self.require_info(sample_number)?.duration),
            SampleIndex::Lpcm(_) => Ok(self.locate_bunch(sample_number)?.0.duration),
        }
    }

    /// Same as `sample_duration()`.
    pub fn sample_delta(&mut self, sample_number: u32) -> Result<u32, Mp4Error> {
        self.sample_duration(sample_number)
    }

    /// Duration of the last sample.
    pub fn last_sample_delta(&mut self) -> Result<u32, Mp4Error> {
        self.sample_duration(self.sample_count)
    }

    /// Metadata and chunk index for 1-based `sample_number`.
    fn metadata(&mut self, sample_number: u32) -> Result<(SampleMetadata, usize), Mp4Error> {
        self.check_range(sample_number)?;
        match self.index {
            SampleIndex::General(_) => {
                let dts = self.dts_general(sample_number)?;
                let info = *self.require_info(sample_number)?;
                let metadata = SampleMetadata {
                    dts,
                    cts: self.composition(dts, info.offset),
                    pos: info.pos,
                    length: info.length,
                    duration: info.duration,
                    index: info.index,
                    property: info.property,
                };
                Ok((metadata, info.chunk))
            },
            SampleIndex::Lpcm(_) => {
                let (bunch, dts, k) = self.locate_bunch(sample_number)?;
                let metadata = SampleMetadata {
                    dts,
                    cts: self.composition(dts, bunch.offset),
                    pos: bunch.pos + k as u64 * bunch.length as u64,
                    length: bunch.length,
                    duration: bunch.duration,
                    index: bunch.index,
                    property: Property::sync(),
                };
                Ok((metadata, bunch.chunk))
            }
        }
    }

    /// Timestamps, position, size, and property
    /// of 1-based `sample_number`, without reading its data.
    pub fn sample_info(&mut self, sample_number: u32) -> Result<SampleMetadata, Mp4Error> {
        Ok(self.metadata(sample_number)?.0)
    }

    /// Property of 1-based `sample_number`.
    /// LPCM samples are always sync samples.
    pub fn sample_property(&mut self, sample_number: u32) -> Result<Property, Mp4Error> {
        self.check_range(sample_number)?;
        match self.index {
            SampleIndex::General(_) => Ok(self.require_info(sample_number)?.property),
            SampleIndex::Lpcm(_) => Ok(Property::sync()),
        }
    }

    /// Returns true if `sample_number` is in range
    /// and its data is in the file being read.
    pub fn check_sample_existence(&mut self, sample_number: u32) -> bool {
        if self.check_range(sample_number).is_err() {
            return false
        }
        let chunk_index = match self.index {
            SampleIndex::General(_) => self.info(sample_number).map(|i| i.chunk),
            SampleIndex::Lpcm(_) => self.locate_bunch(sample_number).ok().map(|b| b.0.chunk),
        };
        chunk_index
            .and_then(|i| self.chunks.get(i))
            .is_some_and(|c| c.is_resolvable())
    }

    /// Reads 1-based `sample_number` from `stream`.
    ///
    /// Chunk data is read at most `max_read_size` bytes at a time
    /// and kept until a sample outside the cached window is requested.
    pub fn sample<S: ByteStream + ?Sized>(
        &mut self,
        stream: &mut S,
        sample_number: u32,
        max_read_size: usize,
    ) -> Result<Sample, Mp4Error> {
        let (metadata, chunk_index) = self.metadata(sample_number)?;
        let chunk = *self.chunks.get(chunk_index)
            .ok_or(Mp4Error::MissingSampleRecord(sample_number))?;
        if !chunk.is_resolvable() {
            return Err(Mp4Error::ExternalDataReference(sample_number))
        }
        let data = self.chunk_cache.read(stream, &chunk, metadata.pos, metadata.length, max_read_size)?;
        Ok(Sample::new(metadata, self.media_timescale, data))
    }
}
