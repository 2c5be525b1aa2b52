//! Appends samples from movie fragments (`moof`) to the timeline.
//!
//! Per-sample values resolve through `trun` rows, then `tfhd`
//! defaults, then the track's `trex` defaults. Track fragments for
//! other tracks are still walked, since the byte position after their
//! last sample may be the base offset of the next track fragment.

use crate::{consts::dependency, Mp4Error};

use super::{
    builder::{GroupCursor, TimelineBuilder},
    Chunk,
    EntryCursor,
    MovieFragments,
    Property,
    RaFlags,
    SampleInfo,
};

impl <'a> TimelineBuilder<'a> {
    pub(crate) fn build_fragments(&mut self, fragments: &'a MovieFragments) -> Result<(), Mp4Error> {
        let tables = self.tables;
        let track_id = tables.track_id;

        // Entries are matched in file order by exact position.
        let tfra = fragments.tfra(track_id);
        let tfra_is_empty = tfra.is_some_and(|t| t.entries().is_empty());
        let mut tfra_entries = tfra.map(|t| t.entries().iter().peekable());

        // Fragment chunks never extend the last sample table chunk.
        let mut open_chunk: Option<usize> = None;
        let mut chunk_number = self.chunks.last().map_or(0, |c| c.number);

        for moof in fragments.moofs.iter() {
            let mut last_sample_end_pos: u64 = 0;

            for (traf_index, traf) in moof.trafs.iter().enumerate() {
                let traf_number = traf_index as u32 + 1;
                let tfhd = &traf.tfhd;
                let trex = fragments.trex(tfhd.track_id())
                    .ok_or(Mp4Error::MissingTrackDefaults(tfhd.track_id()))?;

                // DURATION_IS_EMPTY is ignored, a traf without runs
                // simply adds no samples.
                if traf.truns.is_empty() {
                    continue
                }

                let base_data_offset = match tfhd.base_data_offset() {
                    Some(offset) => offset,
                    None if tfhd.default_base_is_moof() || traf_index == 0 => moof.pos,
                    None => last_sample_end_pos,
                };

                let offset_only = tfhd.track_id() != track_id;

                let mut roll_groups = GroupCursor::fragment(&tables.sample_groups.roll, &traf.sample_groups.roll);
                let mut rap_groups = GroupCursor::fragment(&tables.sample_groups.rap, &traf.sample_groups.rap);
                let mut dependencies = traf.sdtp.as_ref()
                    .map(|s| EntryCursor::new("sdtp", s.entries()));

                for (trun_index, trun) in traf.truns.iter().enumerate() {
                    let trun_number = trun_index as u32 + 1;
                    if trun.sample_count() == 0 {
                        continue
                    }

                    let mut data_offset = match trun.data_offset {
                        Some(offset) => base_data_offset.wrapping_add_signed(offset as i64),
                        None if trun_index == 0 => base_data_offset,
                        None => last_sample_end_pos,
                    };

                    // (SAMPLE_DESCRIPTION_INDEX, IS_LPCM, CHUNK_INDEX)
                    let target = match offset_only {
                        true => None,
                        false => {
                            let index = tfhd.sample_description_index
                                .unwrap_or(trex.default_sample_description_index());
                            let description = self.description(index)?;
                            let data_reference = tables.data_reference(description.data_reference_index);

                            // Physically consecutive runs share a chunk.
                            let contiguous = open_chunk
                                .map(|i| &self.chunks[i])
                                .is_some_and(|c| c.end() == data_offset && c.data_reference == data_reference);
                            let chunk_index = match (contiguous, open_chunk) {
                                (true, Some(i)) => i,
                                _ => {
                                    chunk_number += 1;
                                    self.chunks.push(Chunk::new(chunk_number, data_offset, data_reference));
                                    let i = self.chunks.len() - 1;
                                    open_chunk = Some(i);
                                    i
                                }
                            };
                            Some((index, description.is_lpcm(), chunk_index))
                        }
                    };

                    let signed_offsets = self.compatibility.allows_negative_trun_offset(trun);

                    for sample_number in 1 ..= trun.sample_count() {
                        let row = trun.row(sample_number as usize - 1);
                        let length = row.and_then(|r| r.size)
                            .or(tfhd.default_sample_size)
                            .unwrap_or(trex.default_sample_size());

                        if let Some((index, is_lpcm, chunk_index)) = target {
                            let duration = row.and_then(|r| r.duration)
                                .or(tfhd.default_sample_duration)
                                .unwrap_or(trex.default_sample_duration());
                            let offset = row.and_then(|r| r.composition_time_offset)
                                .unwrap_or(0);
                            if signed_offsets {
                                self.update_shift(offset);
                            }

                            self.chunks[chunk_index].length += length as u64;
                            self.dts += duration as u64;
                            self.media_duration += duration as u64;
                            self.max_sample_size = self.max_sample_size.max(length);

                            let mut info = SampleInfo {
                                pos: data_offset,
                                duration,
                                offset,
                                length,
                                index,
                                chunk: chunk_index,
                                property: Property::default(),
                            };

                            if is_lpcm {
                                info.property = Property::sync();
                                self.push_lpcm(info)?;
                            } else {
                                let first_sample_flags = match sample_number {
                                    1 => trun.first_sample_flags(),
                                    _ => None
                                };
                                let sample_flags = first_sample_flags
                                    .or_else(|| row.and_then(|r| r.sample_flags()))
                                    .or_else(|| tfhd.default_sample_flags())
                                    .unwrap_or(trex.default_sample_flags());

                                let property = &mut info.property;
                                // sdtp in traf takes precedence over sample flags
                                match dependencies.as_mut().and_then(|d| d.next_entry()) {
                                    Some(dep) => {
                                        property.leading = dep.is_leading;
                                        property.independent = dep.sample_depends_on;
                                        property.disposable = dep.sample_is_depended_on;
                                        property.redundant = dep.sample_has_redundancy;
                                    },
                                    None => {
                                        property.leading = sample_flags.is_leading;
                                        property.independent = sample_flags.sample_depends_on;
                                        property.disposable = sample_flags.sample_is_depended_on;
                                        property.redundant = sample_flags.sample_has_redundancy;
                                    }
                                }

                                // Sync samples are always independent.
                                if !sample_flags.is_non_sync_sample
                                    && property.independent != dependency::NOT_INDEPENDENT
                                {
                                    property.ra_flags |= RaFlags::SYNC;
                                    self.distance = Some(0);
                                }

                                let roll_id = self.sample_count + sample_number;
                                Self::apply_roll_group(&mut roll_groups, &mut info.property, roll_id)?;
                                info.property.post_roll.identifier = roll_id;
                                self.apply_rap_group(&mut rap_groups, &mut info.property)?;

                                if let Some(entries) = tfra_entries.as_mut() {
                                    if tfra_is_empty && info.property.ra_flags.is_empty() {
                                        info.property.ra_flags |= RaFlags::SYNC;
                                    }
                                    let matched = entries.peek().is_some_and(|e| {
                                        e.moof_offset == moof.pos
                                            && e.traf_number == traf_number
                                            && e.trun_number == trun_number
                                            && e.sample_number == sample_number
                                    });
                                    if matched {
                                        if info.property.ra_flags.is_empty() {
                                            info.property.ra_flags |= RaFlags::SYNC;
                                        }
                                        entries.next();
                                    }
                                }

                                self.settle_distance(&mut info.property);
                                self.push_info(info)?;
                            }
                        }

                        data_offset += length as u64;
                        last_sample_end_pos = data_offset;
                    }

                    if target.is_some() {
                        self.sample_count += trun.sample_count();
                    }
                }
            }
        }

        Ok(())
    }
}
