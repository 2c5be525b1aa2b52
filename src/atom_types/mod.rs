//! Typed atom payloads consumed by the timeline builder.
//!
//! Each type is read from the atom's payload, i.e. the bytes
//! following the 8 (or 16) byte atom header.
//! Locating the atoms in the file is left to the caller.

mod co64;
mod ctts;
mod dref;
mod elst;
mod ftyp;
mod mdhd;
mod mvhd;
mod sample_flags;
mod sbgp;
mod sdtp;
mod sgpd;
mod stco;
mod stsc;
mod stsd;
mod stss;
mod stsz;
mod stts;
mod tfhd;
mod tfra;
mod tkhd;
mod trex;
mod trun;

pub use co64::Co64;
pub use ctts::{Ctts, OffsetTableEntry};
pub use dref::{Dref, DataReference};
pub use elst::{Elst, EditEntry};
pub use ftyp::Ftyp;
pub use mdhd::Mdhd;
pub use mvhd::Mvhd;
pub use sample_flags::SampleFlags;
pub use sbgp::{Sbgp, GroupAssignment};
pub use sdtp::{Sdtp, SampleDependency};
pub use sgpd::{Sgpd, GroupEntry, GroupDescription};
pub use stco::Stco;
pub use stsc::{Stsc, SampleToChunk};
pub use stsd::{
    Stsd,
    SampleDescription,
    AudioDescription,
    AudioFormat,
    DataLoad,
    MediaKind,
    SoundV1,
    SoundV2,
};
pub use stss::Stss;
pub use stsz::Stsz;
pub use stts::{Stts, TimeToSample};
pub use tfhd::Tfhd;
pub use tfra::{Tfra, TfraEntry};
pub use tkhd::Tkhd;
pub use trex::Trex;
pub use trun::{Trun, TrunRow};
