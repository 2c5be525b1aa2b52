//! Various timeline construction and lookup errors.

use std::fmt;

/// Timeline construction, lookup, and re-timestamping errors.
#[derive(Debug)]
pub enum Mp4Error {
    /// Converted `BinResult` error.
    BinReadError(binrw::Error),
    /// IO error
    IOError(std::io::Error),
    /// Stream returned fewer bytes than requested.
    ReadMismatch{got: u64, expected: u64},
    /// A run-length or per-sample table ran out
    /// before all samples were covered,
    /// e.g. `stsz` declaring more samples than it lists sizes for.
    TableExhausted{table: &'static str, sample_number: u32},
    /// A table required to build a non-fragmented track is absent.
    MissingRequiredTable(&'static str),
    /// Sample description index not present in `stsd`.
    MissingSampleDescription(u32),
    /// Group description index not present in `sgpd`
    /// for the specified grouping type.
    MissingGroupDescription{grouping_type: String, index: u32},
    /// No `trex` for the track referenced by a track fragment.
    MissingTrackDefaults(u32),
    /// Track has no samples at all.
    NoSamples(u32),
    /// Track mixes constant size PCM samples
    /// and variable size samples.
    MixedLpcm,
    /// Sample number outside `1..=sample_count`.
    SampleOutOfRange{sample_number: u32, sample_count: u32},
    /// Internal record missing for an in-range sample number.
    MissingSampleRecord(u32),
    /// No random access point before or after the specified sample.
    NoRandomAccessPoint(u32),
    /// Sample data lives in a file other than the one being read.
    ExternalDataReference(u32),
    /// No timeline constructed for the specified track ID.
    NoSuchTimeline(u32),
    /// Time scale of 0.
    InvalidTimescale,
    /// Track ID of 0.
    InvalidTrackId,
    /// Timestamps can not be changed for LPCM tracks.
    LpcmTimestampsUnsupported,
    /// Number of timestamps differs from number of samples.
    TimestampCountMismatch{got: usize, expected: u32},
    /// First decoding timestamp must be 0.
    NonZeroFirstDts(u64),
    /// Decoding timestamps must be non-decreasing.
    DecreasingDts{sample_number: u32},
    /// Negative composition offsets are not allowed for this file.
    CompositionShiftNotAllowed(u32),
}

impl std::error::Error for Mp4Error {}

impl fmt::Display for Mp4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mp4Error::BinReadError(err) => write!(f, "{err}"),
            Mp4Error::IOError(err) => write!(f, "IO error: {}", err),
            Mp4Error::ReadMismatch{got, expected} => write!(f, "Read {got} bytes, expected {expected} bytes."),
            Mp4Error::TableExhausted{table, sample_number} => write!(f, "'{table}' ran out of entries at sample {sample_number}."),
            Mp4Error::MissingRequiredTable(name) => write!(f, "Missing required table '{name}'."),
            Mp4Error::MissingSampleDescription(index) => write!(f, "No sample description with index {index} in 'stsd'."),
            Mp4Error::MissingGroupDescription{grouping_type, index} => write!(f, "No '{grouping_type}' group description with index {index} in 'sgpd'."),
            Mp4Error::MissingTrackDefaults(id) => write!(f, "No 'trex' for track ID {id}."),
            Mp4Error::NoSamples(id) => write!(f, "Track ID {id} has no samples."),
            Mp4Error::MixedLpcm => write!(f, "LPCM + non-LPCM track is not supported."),
            Mp4Error::SampleOutOfRange{sample_number, sample_count} => write!(f, "Sample number {sample_number} out of range 1-{sample_count}."),
            Mp4Error::MissingSampleRecord(n) => write!(f, "No sample record for sample number {n}."),
            Mp4Error::NoRandomAccessPoint(n) => write!(f, "No random access point around sample number {n}."),
            Mp4Error::ExternalDataReference(n) => write!(f, "Sample number {n} refers to external media data."),
            Mp4Error::NoSuchTimeline(id) => write!(f, "No timeline for track ID {id}."),
            Mp4Error::InvalidTimescale => write!(f, "Time scale must be non-zero."),
            Mp4Error::InvalidTrackId => write!(f, "Track ID must be non-zero."),
            Mp4Error::LpcmTimestampsUnsupported => write!(f, "Changing timestamps of LPCM track is not supported."),
            Mp4Error::TimestampCountMismatch{got, expected} => write!(f, "Got {got} timestamps, expected {expected}."),
            Mp4Error::NonZeroFirstDts(dts) => write!(f, "First DTS must be 0, got {dts}."),
            Mp4Error::DecreasingDts{sample_number} => write!(f, "DTS decreases at sample number {sample_number}."),
            Mp4Error::CompositionShiftNotAllowed(shift) => write!(f, "Composition to decode shift {shift} not allowed for this file."),
        }
    }
}

/// Converts std::io::Error to Mp4Error
impl From<std::io::Error> for Mp4Error {
    fn from(err: std::io::Error) -> Self {
        Mp4Error::IOError(err)
    }
}

/// Converts Mp4Error to std::io::Error
impl From<Mp4Error> for std::io::Error {
    fn from(err: Mp4Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err)
    }
}

/// Converts binrw::Error to Mp4Error
impl From<binrw::Error> for Mp4Error {
    fn from(err: binrw::Error) -> Mp4Error {
        Mp4Error::BinReadError(err)
    }
}
