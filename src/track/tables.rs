//! Decoded tables the timeline is built from.
//!
//! Locating and decoding the atoms is left to the caller.
//! Build a `TrackTables` per track with the atoms found under
//! `moov/trak`, and optionally a single `MovieFragments`
//! for the whole file.

use crate::{
    atom_types::{
        Co64, Ctts, Dref, Elst, Ftyp, Mdhd, Mvhd, Sbgp, Sdtp, Sgpd, Stco, Stsc, Stsd, Stss,
        Stsz, Stts, Tfhd, Tfra, Tkhd, Trex, Trun,
    },
    Mp4Error,
};

/// Sample to group assignments and the group descriptions
/// they refer to, for a single grouping type.
#[derive(Debug, Clone, Default)]
pub struct SampleGroup {
    pub sbgp: Option<Sbgp>,
    pub sgpd: Option<Sgpd>,
}

impl SampleGroup {
    pub fn new(sbgp: Sbgp, sgpd: Sgpd) -> Self {
        Self {
            sbgp: Some(sbgp),
            sgpd: Some(sgpd),
        }
    }
}

/// Sample groups used for random access.
#[derive(Debug, Clone, Default)]
pub struct SampleGroups {
    /// Roll recovery (`roll`, or `prol` for audio pre-roll).
    pub roll: SampleGroup,
    /// Random access point (`rap `).
    pub rap: SampleGroup,
}

/// File level flags derived from `ftyp`,
/// deciding how some tables are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compatibility {
    /// Highest `isom`/`isoN` brand version, 0 if none.
    pub max_isom_version: u8,
    /// `avc1` or `iso2`-`iso6` brand present.
    pub avc_extensions: bool,
    /// QuickTime file format (`qt  ` brand).
    pub qt_compatible: bool,
}

impl Compatibility {
    /// Derive from the file's brands. Without `ftyp`
    /// the file is QuickTime, unless an `iods` atom is present,
    /// in which case it is MP4 version 1.
    pub fn from_ftyp(ftyp: Option<&Ftyp>, iods_present: bool) -> Self {
        let mut compat = Self::default();
        let Some(ftyp) = ftyp else {
            compat.qt_compatible = !iods_present;
            return compat
        };
        for brand in ftyp.brands() {
            match &brand.to_be_bytes() {
                b"qt  " => compat.qt_compatible = true,
                b"isom" | b"avc1" => compat.raise_isom_version(1),
                [b'i', b's', b'o', v @ b'2'..=b'7'] => compat.raise_isom_version(v - b'0'),
                _ => (),
            }
            if matches!(&brand.to_be_bytes(), b"avc1" | [b'i', b's', b'o', b'2'..=b'6']) {
                compat.avc_extensions = true;
            }
        }
        compat
    }

    /// Plain QuickTime file.
    pub fn quicktime() -> Self {
        Self {
            qt_compatible: true,
            ..Self::default()
        }
    }

    /// ISO base media file with the specified `isoN` brand.
    pub fn isom(version: u8) -> Self {
        Self {
            max_isom_version: version,
            avc_extensions: (2..=6).contains(&version),
            qt_compatible: false,
        }
    }

    fn raise_isom_version(&mut self, version: u8) {
        self.max_isom_version = self.max_isom_version.max(version);
    }

    /// `ctts` offsets may be negative.
    pub(crate) fn allows_negative_ctts(&self, ctts: &Ctts) -> bool {
        (self.max_isom_version >= 4 && ctts.version == 1) || self.qt_compatible
    }

    /// `trun` composition time offsets are signed.
    pub(crate) fn allows_negative_trun_offset(&self, trun: &Trun) -> bool {
        self.max_isom_version >= 6 && trun.version != 0
    }

    /// Initial guess for the meaning of the first two bits in `sdtp`.
    pub(crate) fn iso_sdtp(&self) -> bool {
        self.max_isom_version >= 2 || self.avc_extensions
    }

    /// Re-timestamping may introduce a composition to decode shift.
    pub(crate) fn allows_composition_shift(&self) -> bool {
        self.qt_compatible && self.max_isom_version >= 4
    }
}

/// Sample table and header values for a single track.
#[derive(Debug, Clone)]
pub struct TrackTables {
    pub(crate) track_id: u32,
    pub(crate) movie_timescale: u32,
    pub(crate) media_timescale: u32,
    /// Track duration in movie time scale units.
    pub(crate) track_duration: u64,
    pub(crate) elst: Option<Elst>,
    pub(crate) dref: Option<Dref>,
    pub(crate) stsd: Stsd,
    pub(crate) stts: Option<Stts>,
    pub(crate) ctts: Option<Ctts>,
    pub(crate) stsc: Option<Stsc>,
    /// `stco` or `co64`.
    pub(crate) chunk_offsets: Option<Co64>,
    pub(crate) stsz: Option<Stsz>,
    pub(crate) stss: Option<Stss>,
    pub(crate) stps: Option<Stss>,
    pub(crate) sdtp: Option<Sdtp>,
    pub(crate) sample_groups: SampleGroups,
}

impl TrackTables {
    pub fn new(
        track_id: u32,
        movie_timescale: u32,
        media_timescale: u32,
        stsd: Stsd,
    ) -> Result<Self, Mp4Error> {
        if track_id == 0 {
            return Err(Mp4Error::InvalidTrackId)
        }
        if movie_timescale == 0 || media_timescale == 0 {
            return Err(Mp4Error::InvalidTimescale)
        }
        Ok(Self {
            track_id,
            movie_timescale,
            media_timescale,
            track_duration: 0,
            elst: None,
            dref: None,
            stsd,
            stts: None,
            ctts: None,
            stsc: None,
            chunk_offsets: None,
            stsz: None,
            stss: None,
            stps: None,
            sdtp: None,
            sample_groups: SampleGroups::default(),
        })
    }

    /// Create from the movie, track, and media headers.
    pub fn from_headers(
        mvhd: &Mvhd,
        tkhd: &Tkhd,
        mdhd: &Mdhd,
        stsd: Stsd,
    ) -> Result<Self, Mp4Error> {
        Ok(Self::new(tkhd.track_id(), mvhd.time_scale, mdhd.time_scale(), stsd)?
            .with_track_duration(tkhd.duration()))
    }

    pub fn with_track_duration(self, track_duration: u64) -> Self {
        Self {track_duration, ..self}
    }

    pub fn with_elst(self, elst: Elst) -> Self {
        Self {elst: Some(elst), ..self}
    }

    pub fn with_dref(self, dref: Dref) -> Self {
        Self {dref: Some(dref), ..self}
    }

    pub fn with_stts(self, stts: Stts) -> Self {
        Self {stts: Some(stts), ..self}
    }

    pub fn with_ctts(self, ctts: Ctts) -> Self {
        Self {ctts: Some(ctts), ..self}
    }

    pub fn with_stsc(self, stsc: Stsc) -> Self {
        Self {stsc: Some(stsc), ..self}
    }

    pub fn with_stco(self, stco: Stco) -> Self {
        Self {chunk_offsets: Some(Co64::from(stco)), ..self}
    }

    pub fn with_co64(self, co64: Co64) -> Self {
        Self {chunk_offsets: Some(co64), ..self}
    }

    pub fn with_stsz(self, stsz: Stsz) -> Self {
        Self {stsz: Some(stsz), ..self}
    }

    pub fn with_stss(self, stss: Stss) -> Self {
        Self {stss: Some(stss), ..self}
    }

    /// Partial sync samples (`stps`, QuickTime).
    pub fn with_stps(self, stps: Stss) -> Self {
        Self {stps: Some(stps), ..self}
    }

    pub fn with_sdtp(self, sdtp: Sdtp) -> Self {
        Self {sdtp: Some(sdtp), ..self}
    }

    pub fn with_sample_groups(self, sample_groups: SampleGroups) -> Self {
        Self {sample_groups, ..self}
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

    pub fn stsd(&self) -> &Stsd {
        &self.stsd
    }

    /// Data reference index to use for chunks with the specified
    /// sample description. `None` if the media data is
    /// in another file.
    pub(crate) fn data_reference(&self, data_reference_index: u16) -> Option<u16> {
        match &self.dref {
            None => Some(data_reference_index),
            Some(dref) => match dref.get(data_reference_index) {
                Some(entry) if !entry.is_self_contained() => None,
                _ => Some(data_reference_index),
            }
        }
    }
}

/// Track fragment (`traf`).
#[derive(Debug, Clone)]
pub struct Traf {
    pub tfhd: Tfhd,
    pub truns: Vec<Trun>,
    pub sdtp: Option<Sdtp>,
    pub sample_groups: SampleGroups,
}

impl Traf {
    pub fn new(tfhd: Tfhd, truns: Vec<Trun>) -> Self {
        Self {
            tfhd,
            truns,
            sdtp: None,
            sample_groups: SampleGroups::default(),
        }
    }

    pub fn with_sdtp(self, sdtp: Sdtp) -> Self {
        Self {sdtp: Some(sdtp), ..self}
    }

    pub fn with_sample_groups(self, sample_groups: SampleGroups) -> Self {
        Self {sample_groups, ..self}
    }
}

/// Movie fragment (`moof`).
#[derive(Debug, Clone)]
pub struct Moof {
    /// Absolute file position of the first byte of the `moof` atom.
    pub pos: u64,
    pub trafs: Vec<Traf>,
}

impl Moof {
    pub fn new(pos: u64, trafs: Vec<Traf>) -> Self {
        Self {pos, trafs}
    }
}

/// Movie fragments in file order, with the per-track defaults
/// from `moov/mvex` and the optional random access tables from `mfra`.
#[derive(Debug, Clone, Default)]
pub struct MovieFragments {
    pub trex: Vec<Trex>,
    pub moofs: Vec<Moof>,
    pub tfra: Vec<Tfra>,
}

impl MovieFragments {
    pub fn new(trex: Vec<Trex>, moofs: Vec<Moof>) -> Self {
        Self {
            trex,
            moofs,
            tfra: Vec::new(),
        }
    }

    pub fn with_tfra(self, tfra: Vec<Tfra>) -> Self {
        Self {tfra, ..self}
    }

    /// Returns true if there is at least one `moof`
    /// and track defaults to resolve it against.
    pub fn is_present(&self) -> bool {
        !self.trex.is_empty() && !self.moofs.is_empty()
    }

    pub(crate) fn trex(&self, track_id: u32) -> Option<&Trex> {
        self.trex.iter().find(|t| t.track_id() == track_id)
    }

    pub(crate) fn tfra(&self, track_id: u32) -> Option<&Tfra> {
        self.tfra.iter().find(|t| t.track_id() == track_id)
    }
}
