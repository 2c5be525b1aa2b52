//! Track sample timelines: construction from sample tables
//! and movie fragments, sample lookups, and random access.

mod builder;
mod cache;
mod chunk;
mod cursor;
mod fragment;
mod property;
mod rap;
mod sample;
mod tables;
mod timeline;
mod timestamps;

pub use chunk::Chunk;
pub use cursor::Run;
pub(crate) use cursor::{EntryCursor, RunCursor, SampleNumberCursor};
pub use property::{PostRoll, PreRoll, Property, RaFlags};
pub use rap::RapDetail;
pub use sample::{LpcmBunch, Sample, SampleInfo, SampleMetadata};
pub use tables::{
    Compatibility,
    Moof,
    MovieFragments,
    SampleGroup,
    SampleGroups,
    Traf,
    TrackTables,
};
pub use timeline::{SampleIndex, Timeline, TimelineWarning};
pub use timestamps::{MediaTimestamp, MediaTimestamps};
