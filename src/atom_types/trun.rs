//! Track fragment run atom (`trun`).
//!
//! Location: `moof/traf/trun`
//!
//! Per-sample rows only contain the fields flagged as present in `tr_flags`.
//! Absent values fall back to the `tfhd` defaults, then the `trex` defaults.

use binrw::BinRead;

use crate::{consts::tr_flags, support::flags_from_bytes};

use super::SampleFlags;

/// Track fragment run atom (`trun`).
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Trun {
    pub(crate) version: u8,
    #[br(map = |b: [u8; 3]| flags_from_bytes(b))]
    pub(crate) flags: u32,
    pub(crate) sample_count: u32,
    /// Signed offset from the base data offset.
    #[br(if(flags & tr_flags::DATA_OFFSET_PRESENT != 0))]
    pub(crate) data_offset: Option<i32>,
    #[br(if(flags & tr_flags::FIRST_SAMPLE_FLAGS_PRESENT != 0))]
    pub(crate) first_sample_flags: Option<u32>,
    #[br(
        if(flags & TrunRow::PRESENCE_MASK != 0),
        args {count: sample_count as usize, inner: (flags,)}
    )]
    pub(crate) rows: Vec<TrunRow>,
}

impl Trun {
    /// Run of `sample_count` samples using only defaults.
    pub fn new(version: u8, sample_count: u32) -> Self {
        Self {
            version,
            sample_count,
            ..Self::default()
        }
    }

    /// Run with explicit per-sample rows.
    /// `flags` decide which row fields are considered present.
    pub fn with_rows(version: u8, flags: u32, rows: Vec<TrunRow>) -> Self {
        Self {
            version,
            flags: flags & TrunRow::PRESENCE_MASK,
            sample_count: rows.len() as u32,
            rows,
            ..Self::default()
        }
    }

    pub fn with_data_offset(self, data_offset: i32) -> Self {
        Self {
            flags: self.flags | tr_flags::DATA_OFFSET_PRESENT,
            data_offset: Some(data_offset),
            ..self
        }
    }

    pub fn with_first_sample_flags(self, sample_flags: SampleFlags) -> Self {
        Self {
            flags: self.flags | tr_flags::FIRST_SAMPLE_FLAGS_PRESENT,
            first_sample_flags: Some(sample_flags.into()),
            ..self
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn first_sample_flags(&self) -> Option<SampleFlags> {
        self.first_sample_flags.map(SampleFlags::from)
    }

    /// Returns row for 0-based index within the run, if rows are present.
    pub(crate) fn row(&self, index: usize) -> Option<&TrunRow> {
        self.rows.get(index)
    }
}

/// Per-sample override values in a `trun`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(big, import(run_flags: u32))]
pub struct TrunRow {
    #[br(if(run_flags & tr_flags::SAMPLE_DURATION_PRESENT != 0))]
    pub duration: Option<u32>,
    #[br(if(run_flags & tr_flags::SAMPLE_SIZE_PRESENT != 0))]
    pub size: Option<u32>,
    /// Raw sample flags, see `SampleFlags`.
    #[br(if(run_flags & tr_flags::SAMPLE_FLAGS_PRESENT != 0))]
    pub flags: Option<u32>,
    /// Raw 32-bit pattern. Signed for version 1 runs.
    #[br(if(run_flags & tr_flags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT != 0))]
    pub composition_time_offset: Option<u32>,
}

impl TrunRow {
    pub fn new(
        duration: Option<u32>,
        size: Option<u32>,
        flags: Option<SampleFlags>,
        composition_time_offset: Option<i32>,
    ) -> Self {
        Self {
            duration,
            size,
            flags: flags.map(u32::from),
            composition_time_offset: composition_time_offset.map(|o| o as u32),
        }
    }

    pub fn sample_flags(&self) -> Option<SampleFlags> {
        self.flags.map(SampleFlags::from)
    }

    pub(crate) const PRESENCE_MASK: u32 = tr_flags::SAMPLE_DURATION_PRESENT
        | tr_flags::SAMPLE_SIZE_PRESENT
        | tr_flags::SAMPLE_FLAGS_PRESENT
        | tr_flags::SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT;
}
