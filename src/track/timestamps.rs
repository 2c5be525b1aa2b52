//! Bulk media timestamps and edit list conversion.

use rayon::slice::ParallelSliceMut;

use crate::{atom_types::EditEntry, Mp4Error};

use super::{SampleIndex, Timeline};

/// Decoding and composition timestamp pair
/// in media time scale units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MediaTimestamp {
    pub dts: u64,
    /// Does not include the composition to decode shift.
    pub cts: i64,
}

impl MediaTimestamp {
    pub fn new(dts: u64, cts: i64) -> Self {
        Self{dts, cts}
    }
}

/// Timestamps for every sample in a track,
/// in decoding order unless sorted otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaTimestamps(pub Vec<MediaTimestamp>);

impl From<Vec<MediaTimestamp>> for MediaTimestamps {
    fn from(timestamps: Vec<MediaTimestamp>) -> Self {
        Self(timestamps)
    }
}

impl MediaTimestamps {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaTimestamp> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[MediaTimestamp] {
        &self.0
    }

    /// Stable sort by DTS.
    pub fn sort_decoding_order(&mut self) {
        self.0.par_sort_by_key(|ts| ts.dts);
    }

    /// Stable sort by CTS.
    pub fn sort_composition_order(&mut self) {
        self.0.par_sort_by_key(|ts| ts.cts);
    }

    /// Largest number of positions any sample moves forward
    /// going from the current order (normally decoding order)
    /// to composition order. 0 if the orders are the same.
    pub fn max_sample_delay(&self) -> u32 {
        let mut positions: Vec<(i64, usize)> = self.0.iter()
            .enumerate()
            .map(|(i, ts)| (ts.cts, i))
            .collect();
        positions.par_sort_by_key(|(cts, _)| *cts);
        positions.iter()
            .enumerate()
            .filter(|(i, (_, original))| original > i)
            .map(|(i, (_, original))| (original - i) as u32)
            .max()
            .unwrap_or(0)
    }
}

impl Timeline {
    /// Timestamps for all samples in decoding order.
    /// LPCM bunches are expanded to one entry per sample.
    pub fn media_timestamps(&self) -> MediaTimestamps {
        let mut timestamps = Vec::with_capacity(self.sample_count as usize);
        let mut dts: u64 = 0;
        match &self.index {
            SampleIndex::General(infos) => for info in infos.iter() {
                timestamps.push(MediaTimestamp::new(dts, self.composition(dts, info.offset)));
                dts += info.duration as u64;
            },
            SampleIndex::Lpcm(bunches) => for bunch in bunches.iter() {
                for _ in 0..bunch.sample_count {
                    timestamps.push(MediaTimestamp::new(dts, self.composition(dts, bunch.offset)));
                    dts += bunch.duration as u64;
                }
            },
        }
        MediaTimestamps(timestamps)
    }

    /// Replaces all sample durations and composition offsets
    /// with ones derived from `timestamps`, which must be in decoding order.
    ///
    /// The DTS of the first sample must be 0 and DTS must never decrease.
    /// The last sample gets the same duration as the one before it,
    /// a single sample gets `u32::MAX`.
    /// Nothing changes if any check fails.
    pub fn set_media_timestamps(&mut self, timestamps: &MediaTimestamps) -> Result<(), Mp4Error> {
        let allows_shift = self.compatibility.allows_composition_shift();
        let SampleIndex::General(infos) = &mut self.index else {
            return Err(Mp4Error::LpcmTimestampsUnsupported)
        };
        let ts = timestamps.as_slice();
        if ts.len() != infos.len() || ts.len() != self.sample_count as usize {
            return Err(Mp4Error::TimestampCountMismatch{got: ts.len(), expected: self.sample_count})
        }
        let Some(first) = ts.first() else {
            return Ok(())
        };
        if first.dts != 0 {
            return Err(Mp4Error::NonZeroFirstDts(first.dts))
        }
        if let Some(i) = ts.windows(2).position(|w| w[1].dts < w[0].dts) {
            return Err(Mp4Error::DecreasingDts{sample_number: i as u32 + 2})
        }

        let mut durations: Vec<u32> = ts.windows(2)
            .map(|w| (w[1].dts - w[0].dts) as u32)
            .collect();
        durations.push(durations.last().copied().unwrap_or(u32::MAX));

        let shift = ts.iter()
            .map(|t| t.dts as i64 - t.cts)
            .max()
            .unwrap_or(0)
            .clamp(0, u32::MAX as i64) as u32;
        if shift != 0 && !allows_shift {
            return Err(Mp4Error::CompositionShiftNotAllowed(shift))
        }

        for ((info, t), duration) in infos.iter_mut().zip(ts).zip(durations) {
            info.duration = duration;
            info.offset = (t.cts - t.dts as i64) as u32;
        }
        self.media_duration = infos.iter().map(|i| i.duration as u64).sum();
        self.ctd_shift = shift;
        self.reset_caches();

        Ok(())
    }

    /// Edit list of `src` converted to the time scales
    /// and composition shift of this track.
    pub fn mapped_edit_list(&self, src: &Timeline) -> Vec<EditEntry> {
        let media_time_shift = src.ctd_shift as i64 - self.ctd_shift as i64;
        let movie_ratio = self.movie_timescale as f64 / src.movie_timescale as f64;
        let media_ratio = self.media_timescale as f64 / src.media_timescale as f64;

        src.edits.iter()
            .map(|edit| {
                // Implicit "rest of the media" duration only works
                // for fragmented files.
                let segment_duration = match edit.segment_duration == 0 && !self.fragmented {
                    true => match src.fragmented {
                        true => (src.media_duration as f64
                            * (src.movie_timescale as f64 / src.media_timescale as f64)) as u64,
                        false => src.track_duration,
                    },
                    false => edit.segment_duration,
                };
                let media_time = match edit.is_empty_edit() {
                    true => edit.media_time,
                    false => ((edit.media_time + media_time_shift) as f64 * media_ratio + 0.5) as i64,
                };
                EditEntry::new(
                    (segment_duration as f64 * movie_ratio + 0.5) as u64,
                    media_time,
                    edit.media_rate,
                )
            })
            .collect()
    }

    /// Replaces the edit list with the one in `src`,
    /// converted to this track's time scales and composition shift.
    pub fn copy_timeline_map(&mut self, src: &Timeline) {
        self.edits = self.mapped_edit_list(src);
    }
}
