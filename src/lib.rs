//! Sample timelines for MP4 (ISO base media) and QuickTime tracks.
//! Does not and will not support any kind of video de/encoding.
//!
//! A timeline is built per track from already decoded sample tables
//! (`stts`, `ctts`, `stsc`, `stco`/`co64`, `stsz`, `stss`, `stps`, `sdtp`,
//! `sbgp`/`sgpd`) and, for fragmented files, movie fragments (`trex`, `moof`, `tfra`).
//! Each sample then resolves to its decoding and composition timestamps,
//! file position, size, sample description, and random access properties,
//! and its payload can be read from the file.
//!
//! Lookups are fast for sequential access, forwards or backwards.
//! Constant size PCM audio is stored as runs (bunches) rather than
//! one record per sample.
//!
//! ```rs
//! use mp4timeline::{Mp4, Mp4Reader, TrackTables, atom_types::{Mvhd, Tkhd, Mdhd, Stsd, Stts, Stsc, Stco, Stsz}};
//! use std::path::Path;
//!
//! fn main() -> Result<(), mp4timeline::Mp4Error> {
//!     let mut reader = Mp4Reader::open(Path::new("VIDEO.MP4"))?;
//!     // Payload offsets and sizes located by the caller
//!     let mvhd: Mvhd = reader.atom(mvhd_offset, mvhd_size)?;
//!     // ...
//!     let tables = TrackTables::from_headers(&mvhd, &tkhd, &mdhd, stsd)?
//!         .with_stts(stts)
//!         .with_stsc(stsc)
//!         .with_stco(stco)
//!         .with_stsz(stsz);
//!
//!     let mut mp4 = mp4timeline::Mp4::new(reader);
//!     let timeline = mp4.construct_timeline(&tables)?;
//!     println!("{:?}", timeline.duration());
//!
//!     // Closest earlier random access point for sample 100
//!     println!("{:?}", mp4.random_access_point_detail(tables.track_id(), 100)?);
//!
//!     Ok(())
//! }
//! ```

pub mod mp4;
pub mod atom_types;
pub mod consts;
pub mod track;
pub mod errors;
pub mod reader;
pub(crate) mod support;
pub mod tests;

pub use mp4::{Mp4, TimelineOptions};
pub use reader::{ByteStream, Mp4Reader};
pub use track::{
    Chunk,
    Compatibility,
    MediaTimestamp,
    MediaTimestamps,
    MovieFragments,
    Property,
    RaFlags,
    RapDetail,
    Sample,
    SampleMetadata,
    Timeline,
    TimelineWarning,
    TrackTables,
};
pub use atom_types::{
    Co64,
    Ctts,
    Dref,
    Elst,
    EditEntry,
    Ftyp,
    Mdhd,
    Mvhd,
    Sbgp,
    Sdtp,
    Sgpd,
    Stco,
    Stsc,
    Stsd,
    Stss,
    Stsz,
    Stts,
    Tfhd,
    Tfra,
    Tkhd,
    Trex,
    Trun,
    SampleDescription, // stsd component
    MediaKind, // stsd component
};
pub use consts::DEFAULT_MAX_READ_SIZE;
pub use errors::Mp4Error;
