//! Timeline registry for the tracks of a single MP4 file.
//!
//! Atoms are located and decoded by the caller, then handed over
//! per track as `TrackTables`. Sample payloads are read from
//! the stream owned by `Mp4`.
//!
//! ```rs
//! use mp4timeline::{Mp4, TrackTables};
//! use std::path::Path;
//!
//! fn main() -> Result<(), mp4timeline::Mp4Error> {
//!     let mut mp4 = Mp4::open(Path::new("VIDEO.MP4"))?;
//!     let tables: TrackTables = todo!("decode 'trak' atoms");
//!     mp4.construct_timeline(&tables)?;
//!
//!     for n in 1 ..= mp4.sample_count(tables.track_id())? {
//!         let sample = mp4.sample(tables.track_id(), n)?;
//!         println!("{} {} {}", sample.dts(), sample.cts(), sample.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::{collections::HashMap, path::Path};

use log::debug;
use time::Duration;

use crate::{
    atom_types::EditEntry,
    consts::DEFAULT_MAX_READ_SIZE,
    track::{
        Compatibility,
        MediaTimestamps,
        MovieFragments,
        Property,
        RapDetail,
        Sample,
        SampleMetadata,
        Timeline,
        TrackTables,
    },
    ByteStream,
    Mp4Error,
    Mp4Reader,
};

/// Settings shared by all timelines of an `Mp4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Largest number of bytes read in one go when
    /// filling the chunk cache.
    pub max_read_size: usize,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self{max_read_size: DEFAULT_MAX_READ_SIZE}
    }
}

/// MP4 stream with per-track timelines, keyed by track ID.
#[derive(Debug)]
pub struct Mp4<S: ByteStream = Mp4Reader> {
    stream: S,
    options: TimelineOptions,
    compatibility: Compatibility,
    fragments: Option<MovieFragments>,
    timelines: HashMap<u32, Timeline>,
}

impl Mp4<Mp4Reader> {
    /// Opens the MP4 file at `path`.
    pub fn open(path: &Path) -> Result<Self, Mp4Error> {
        Ok(Self::new(Mp4Reader::open(path)?))
    }
}

impl <S: ByteStream> Mp4<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            options: TimelineOptions::default(),
            compatibility: Compatibility::default(),
            fragments: None,
            timelines: HashMap::new(),
        }
    }

    pub fn with_options(self, options: TimelineOptions) -> Self {
        Self{options, ..self}
    }

    /// File compatibility, usually from `ftyp`.
    /// Applies to timelines constructed afterwards.
    pub fn with_compatibility(self, compatibility: Compatibility) -> Self {
        Self{compatibility, ..self}
    }

    /// Movie fragments (`mvex`, `moof`, `mfra`).
    /// Applies to timelines constructed afterwards.
    pub fn with_fragments(self, fragments: MovieFragments) -> Self {
        Self{fragments: Some(fragments), ..self}
    }

    pub fn options(&self) -> TimelineOptions {
        self.options
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn fragments(&self) -> Option<&MovieFragments> {
        self.fragments.as_ref()
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Builds and registers the timeline for the track in `tables`,
    /// replacing any previous timeline with the same track ID.
    /// Nothing is registered on failure.
    pub fn construct_timeline(&mut self, tables: &TrackTables) -> Result<&Timeline, Mp4Error> {
        let timeline = Timeline::build(tables, self.fragments.as_ref(), self.compatibility)?;
        let track_id = timeline.track_id();
        if self.timelines.insert(track_id, timeline).is_some() {
            debug!("replaced timeline for track {track_id}");
        }
        self.timeline(track_id)
    }

    /// Removes the timeline for `track_id`, returning it if it existed.
    pub fn destruct_timeline(&mut self, track_id: u32) -> Option<Timeline> {
        self.timelines.remove(&track_id)
    }

    /// Removes all timelines.
    pub fn destruct_timelines(&mut self) {
        self.timelines.clear()
    }

    pub fn timeline(&self, track_id: u32) -> Result<&Timeline, Mp4Error> {
        self.timelines.get(&track_id)
            .ok_or(Mp4Error::NoSuchTimeline(track_id))
    }

    pub fn timeline_mut(&mut self, track_id: u32) -> Result<&mut Timeline, Mp4Error> {
        self.timelines.get_mut(&track_id)
            .ok_or(Mp4Error::NoSuchTimeline(track_id))
    }

    /// Sorted track IDs with a timeline.
    pub fn track_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.timelines.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Media duration of the longest track.
    pub fn duration(&self) -> Option<Duration> {
        self.timelines.values()
            .map(|t| t.duration())
            .max()
    }

    pub fn dts(&mut self, track_id: u32, sample_number: u32) -> Result<u64, Mp4Error> {
        self.timeline_mut(track_id)?.dts(sample_number)
    }

    pub fn cts(&mut self, track_id: u32, sample_number: u32) -> Result<i64, Mp4Error> {
        self.timeline_mut(track_id)?.cts(sample_number)
    }

    pub fn sample_duration(&mut self, track_id: u32, sample_number: u32) -> Result<u32, Mp4Error> {
        self.timeline_mut(track_id)?.sample_duration(sample_number)
    }

    pub fn sample_delta(&mut self, track_id: u32, sample_number: u32) -> Result<u32, Mp4Error> {
        self.timeline_mut(track_id)?.sample_delta(sample_number)
    }

    pub fn last_sample_delta(&mut self, track_id: u32) -> Result<u32, Mp4Error> {
        self.timeline_mut(track_id)?.last_sample_delta()
    }

    /// Reads sample `sample_number` of `track_id` from the stream.
    pub fn sample(&mut self, track_id: u32, sample_number: u32) -> Result<Sample, Mp4Error> {
        let max_read_size = self.options.max_read_size;
        let timeline = self.timelines.get_mut(&track_id)
            .ok_or(Mp4Error::NoSuchTimeline(track_id))?;
        timeline.sample(&mut self.stream, sample_number, max_read_size)
    }

    pub fn sample_info(&mut self, track_id: u32, sample_number: u32) -> Result<SampleMetadata, Mp4Error> {
        self.timeline_mut(track_id)?.sample_info(sample_number)
    }

    pub fn sample_property(&mut self, track_id: u32, sample_number: u32) -> Result<Property, Mp4Error> {
        self.timeline_mut(track_id)?.sample_property(sample_number)
    }

    /// Returns false for unknown tracks.
    pub fn check_sample_existence(&mut self, track_id: u32, sample_number: u32) -> bool {
        self.timelines.get_mut(&track_id)
            .is_some_and(|t| t.check_sample_existence(sample_number))
    }

    pub fn closest_random_access_point(&self, track_id: u32, sample_number: u32) -> Result<u32, Mp4Error> {
        self.timeline(track_id)?.closest_random_access_point(sample_number)
    }

    pub fn random_access_point_detail(&mut self, track_id: u32, sample_number: u32) -> Result<RapDetail, Mp4Error> {
        self.timeline_mut(track_id)?.random_access_point_detail(sample_number)
    }

    pub fn media_duration(&self, track_id: u32) -> Result<u64, Mp4Error> {
        Ok(self.timeline(track_id)?.media_duration())
    }

    pub fn sample_count(&self, track_id: u32) -> Result<u32, Mp4Error> {
        Ok(self.timeline(track_id)?.sample_count())
    }

    pub fn max_sample_size(&self, track_id: u32) -> Result<u32, Mp4Error> {
        Ok(self.timeline(track_id)?.max_sample_size())
    }

    pub fn composition_to_decode_shift(&self, track_id: u32) -> Result<u32, Mp4Error> {
        Ok(self.timeline(track_id)?.composition_to_decode_shift())
    }

    pub fn media_timestamps(&self, track_id: u32) -> Result<MediaTimestamps, Mp4Error> {
        Ok(self.timeline(track_id)?.media_timestamps())
    }

    pub fn set_media_timestamps(&mut self, track_id: u32, timestamps: &MediaTimestamps) -> Result<(), Mp4Error> {
        self.timeline_mut(track_id)?.set_media_timestamps(timestamps)
    }

    /// Replaces the edit list of `dst_track_id` with the one
    /// of `src_track_id`, converted to the destination's
    /// time scales and composition shift.
    pub fn copy_timeline_map(&mut self, dst_track_id: u32, src_track_id: u32) -> Result<(), Mp4Error> {
        let edits = {
            let src = self.timeline(src_track_id)?;
            self.timeline(dst_track_id)?.mapped_edit_list(src)
        };
        self.timeline_mut(dst_track_id)?.edits = edits;
        Ok(())
    }

    pub fn edit_list(&self, track_id: u32) -> Result<&[EditEntry], Mp4Error> {
        Ok(self.timeline(track_id)?.edit_list())
    }

    pub fn edit_count(&self, track_id: u32) -> Result<usize, Mp4Error> {
        Ok(self.timeline(track_id)?.edit_count())
    }

    /// Edit for 1-based `edit_number`.
    pub fn edit(&self, track_id: u32, edit_number: u32) -> Result<Option<&EditEntry>, Mp4Error> {
        Ok(self.timeline(track_id)?.edit(edit_number))
    }
}
