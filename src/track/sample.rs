//! Per-sample records and the sample payload.
//!
//! `Sample` wraps an in-memory buffer `Cursor<Vec<u8>>`,
//! complete with timestamps, position, and sample property.

use std::io::{BufRead, Cursor, Read, Seek, SeekFrom};

use time::{Duration, ext::NumericalDuration};

use super::Property;

/// Timeline record for a single sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleInfo {
    /// Absolute file position.
    pub(crate) pos: u64,
    pub(crate) duration: u32,
    /// Composition offset (CTS - DTS) as a 32-bit pattern.
    /// Interpreted as signed if the track has a composition shift.
    pub(crate) offset: u32,
    pub(crate) length: u32,
    /// 1-based sample description index.
    pub(crate) index: u32,
    /// Index into the timeline's chunk list.
    pub(crate) chunk: usize,
    pub(crate) property: Property,
}

impl SampleInfo {
    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn sample_description_index(&self) -> u32 {
        self.index
    }

    /// Index into `Timeline::chunks()`.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    pub fn property(&self) -> &Property {
        &self.property
    }
}

/// Run of consecutive constant size LPCM samples that only differ
/// in position and timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LpcmBunch {
    /// Absolute file position of the first sample.
    pub(crate) pos: u64,
    pub(crate) duration: u32,
    pub(crate) offset: u32,
    pub(crate) length: u32,
    pub(crate) index: u32,
    pub(crate) chunk: usize,
    pub(crate) property: Property,
    pub(crate) sample_count: u32,
}

impl LpcmBunch {
    pub(crate) fn start(info: &SampleInfo) -> Self {
        Self {
            pos: info.pos,
            duration: info.duration,
            offset: info.offset,
            length: info.length,
            index: info.index,
            chunk: info.chunk,
            property: info.property,
            sample_count: 1,
        }
    }

    /// Returns true if `info` can extend this bunch.
    pub(crate) fn accepts(&self, info: &SampleInfo) -> bool {
        info.duration == self.duration
            && info.offset == self.offset
            && info.length == self.length
            && info.index == self.index
            && info.chunk == self.chunk
    }

    pub fn pos(&self) -> u64 {
        self.pos
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Total duration of all samples in the bunch.
    pub fn total_duration(&self) -> u64 {
        self.duration as u64 * self.sample_count as u64
    }
}

/// Timestamps, location, and property of a sample,
/// without its payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleMetadata {
    pub dts: u64,
    /// Composition timestamp. Negative only if the track
    /// has a composition to decode shift.
    pub cts: i64,
    /// Absolute file position.
    pub pos: u64,
    pub length: u32,
    pub duration: u32,
    /// 1-based sample description index.
    pub index: u32,
    pub property: Property,
}

/// Sample payload with its timeline metadata.
#[derive(Debug, Default, Clone)]
pub struct Sample {
    metadata: SampleMetadata,
    media_timescale: u32,
    reader: Cursor<Vec<u8>>
}

impl From<Sample> for Cursor<Vec<u8>> {
    fn from(sample: Sample) -> Self {
        sample.reader
    }
}

impl Seek for Sample {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl Read for Sample {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for Sample {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Sample {
    pub(crate) fn new(metadata: SampleMetadata, media_timescale: u32, data: Vec<u8>) -> Self {
        Self {
            metadata,
            media_timescale,
            reader: Cursor::new(data)
        }
    }

    pub fn metadata(&self) -> &SampleMetadata {
        &self.metadata
    }

    /// Decoding timestamp in media time scale units.
    pub fn dts(&self) -> u64 {
        self.metadata.dts
    }

    /// Composition timestamp in media time scale units.
    pub fn cts(&self) -> i64 {
        self.metadata.cts
    }

    /// Absolute file position.
    pub fn pos(&self) -> u64 {
        self.metadata.pos
    }

    pub fn sample_description_index(&self) -> u32 {
        self.metadata.index
    }

    pub fn property(&self) -> &Property {
        &self.metadata.property
    }

    /// Returns sample duration.
    pub fn duration(&self) -> Duration {
        (self.metadata.duration as f64 / self.media_timescale as f64).seconds()
    }

    /// Returns decoding time relative to the start of the media.
    pub fn relative(&self) -> Duration {
        (self.metadata.dts as f64 / self.media_timescale as f64).seconds()
    }

    /// Returns relative decoding time and sample duration
    /// as the tuple `(RELATIVE_TIME, SAMPLE_DURATION)`.
    pub fn time(&self) -> (Duration, Duration) {
        (self.relative(), self.duration())
    }

    /// Returns the raw bytes as a slice.
    pub fn raw(&self) -> &[u8] {
        self.reader.get_ref()
    }

    /// Sample size in bytes.
    pub fn len(&self) -> usize {
        self.reader.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.get_ref().is_empty()
    }
}
