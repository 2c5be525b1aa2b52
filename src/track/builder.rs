//! Timeline construction from the sample tables in `stbl`.
//!
//! Samples are assembled one at a time by stepping through
//! every table in lock-step. Samples of an LPCM sample description
//! are compacted into `LpcmBunch` runs, all others get
//! one `SampleInfo` each.

use log::{debug, warn};

use crate::{
    atom_types::{GroupAssignment, GroupEntry, SampleDependency, SampleDescription, Sbgp, Sgpd, Stsz},
    consts::FRAGMENT_GROUP_DESCRIPTION_BASE,
    Mp4Error,
};

use super::{
    Chunk,
    Compatibility,
    EntryCursor,
    LpcmBunch,
    MovieFragments,
    Property,
    RaFlags,
    RunCursor,
    SampleGroup,
    SampleIndex,
    SampleInfo,
    SampleNumberCursor,
    Timeline,
    TimelineWarning,
    TrackTables,
};

/// Samples per timeline sample and constant sample size
/// for the active sample description.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PacketLayout {
    /// QuickTime fixed compression audio.
    /// Each timeline sample is one audio packet.
    pub(crate) fixed_compression: bool,
    pub(crate) samples_per_packet: u32,
    pub(crate) constant_size: u32,
    pub(crate) is_lpcm: bool,
}

impl PacketLayout {
    pub(crate) fn new(description: &SampleDescription, stsz: &Stsz) -> Self {
        match description.packet_layout() {
            Some((samples_per_packet, constant_size)) => Self {
                fixed_compression: true,
                samples_per_packet: samples_per_packet.max(1),
                constant_size,
                is_lpcm: description.is_lpcm(),
            },
            None => Self {
                fixed_compression: false,
                samples_per_packet: 1,
                constant_size: stsz.sample_size(),
                is_lpcm: description.is_lpcm(),
            }
        }
    }
}

/// Sample group assignments for one grouping type,
/// resolved against the `sgpd` in `stbl` and, inside
/// a track fragment, the `sgpd` in `traf`.
pub(crate) struct GroupCursor<'a> {
    assignments: Option<RunCursor<'a, GroupAssignment>>,
    grouping_type: Option<&'a Sbgp>,
    sgpd: Option<&'a Sgpd>,
    fragment_sgpd: Option<&'a Sgpd>,
}

impl <'a> GroupCursor<'a> {
    pub(crate) fn new(group: &'a SampleGroup) -> Self {
        Self {
            assignments: group.sbgp.as_ref().map(|s| RunCursor::new("sbgp", s.assignments())),
            grouping_type: group.sbgp.as_ref(),
            sgpd: group.sgpd.as_ref(),
            fragment_sgpd: None,
        }
    }

    /// Assignments from a track fragment. Indices from
    /// `FRAGMENT_GROUP_DESCRIPTION_BASE` and up refer to
    /// the fragment's own descriptions.
    pub(crate) fn fragment(group: &'a SampleGroup, fragment: &'a SampleGroup) -> Self {
        Self {
            assignments: fragment.sbgp.as_ref().map(|s| RunCursor::new("sbgp", s.assignments())),
            grouping_type: fragment.sbgp.as_ref(),
            sgpd: group.sgpd.as_ref(),
            fragment_sgpd: fragment.sgpd.as_ref(),
        }
    }

    /// Advances one sample, returning the non-zero
    /// group description index for it.
    /// Samples past the last assignment belong to no group.
    pub(crate) fn next_index(&mut self) -> Option<u32> {
        self.assignments.as_mut()
            .and_then(|a| a.next_value())
            .filter(|index| *index != 0)
    }

    /// Resolves a group description index from `next_index()`.
    pub(crate) fn describe(&self, index: u32) -> Result<Option<&'a GroupEntry>, Mp4Error> {
        let (sgpd, local_index) = match self.fragment_sgpd {
            Some(sgpd) if index >= FRAGMENT_GROUP_DESCRIPTION_BASE => {
                (Some(sgpd), index - FRAGMENT_GROUP_DESCRIPTION_BASE)
            },
            _ => (self.sgpd, index)
        };
        // 0x10000 is treated as "no group"
        if local_index == 0 {
            return Ok(None)
        }
        match sgpd.and_then(|s| s.get(local_index)) {
            Some(entry) => Ok(Some(entry)),
            None => Err(Mp4Error::MissingGroupDescription{
                grouping_type: self.grouping_type
                    .map(|s| s.grouping_type_string())
                    .unwrap_or_default(),
                index
            })
        }
    }
}

/// Accumulates chunks and sample records while stepping through
/// the sample tables and then the track fragments.
pub(crate) struct TimelineBuilder<'a> {
    pub(crate) tables: &'a TrackTables,
    pub(crate) compatibility: Compatibility,
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) infos: Vec<SampleInfo>,
    pub(crate) bunches: Vec<LpcmBunch>,
    /// LPCM bunch currently being extended.
    pub(crate) bunch: Option<LpcmBunch>,
    pub(crate) dts: u64,
    pub(crate) ctd_shift: u32,
    pub(crate) media_duration: u64,
    pub(crate) max_sample_size: u32,
    pub(crate) sample_count: u32,
    /// Samples since the last random access point.
    /// `None` until the first one is seen.
    pub(crate) distance: Option<u32>,
    pub(crate) warnings: Vec<TimelineWarning>,
}

impl <'a> TimelineBuilder<'a> {
    pub(crate) fn new(tables: &'a TrackTables, compatibility: Compatibility) -> Self {
        Self {
            tables,
            compatibility,
            chunks: Vec::new(),
            infos: Vec::new(),
            bunches: Vec::new(),
            bunch: None,
            dts: 0,
            ctd_shift: 0,
            media_duration: 0,
            max_sample_size: 0,
            sample_count: 0,
            distance: None,
            warnings: Vec::new(),
        }
    }

    /// Builds the timeline for a track, including any track fragments
    /// with a matching track ID.
    pub(crate) fn build(
        tables: &'a TrackTables,
        fragments: Option<&'a MovieFragments>,
        compatibility: Compatibility,
    ) -> Result<Timeline, Mp4Error> {
        let fragments = fragments.filter(|f| f.is_present());
        let mut builder = Self::new(tables, compatibility);
        builder.build_sample_table(fragments.is_some())?;
        if let Some(fragments) = fragments {
            builder.build_fragments(fragments)?;
        }
        builder.finish(fragments.is_some())
    }

    pub(crate) fn description(&self, index: u32) -> Result<&'a SampleDescription, Mp4Error> {
        self.tables.stsd.get(index)
            .ok_or(Mp4Error::MissingSampleDescription(index))
    }

    /// Raises the composition to decode shift so that
    /// `dts + offset + ctd_shift` is never negative.
    pub(crate) fn update_shift(&mut self, offset: u32) {
        let deficit = -(offset as i32 as i64);
        if deficit > self.ctd_shift as i64 {
            self.ctd_shift = deficit.min(u32::MAX as i64) as u32;
        }
    }

    /// Sets the pre-roll distance from the running distance to the
    /// last random access point, unless a roll group already did.
    pub(crate) fn settle_distance(&mut self, property: &mut Property) {
        if let Some(distance) = self.distance.as_mut() {
            if property.pre_roll.distance == 0 {
                property.pre_roll.distance = *distance;
            }
            *distance = distance.saturating_add(1);
        }
    }

    /// Applies roll recovery grouping for `sample_number`.
    pub(crate) fn apply_roll_group(
        cursor: &mut GroupCursor<'a>,
        property: &mut Property,
        sample_number: u32,
    ) -> Result<(), Mp4Error> {
        let Some(index) = cursor.next_index() else {
            return Ok(())
        };
        if let Some(GroupEntry::Roll{roll_distance}) = cursor.describe(index)? {
            let roll_distance = *roll_distance as i32;
            if roll_distance > 0 {
                property.post_roll.complete = sample_number.saturating_add(roll_distance as u32);
                if property.ra_flags.is_empty() {
                    property.ra_flags |= RaFlags::POST_ROLL_START;
                }
            } else if roll_distance < 0 {
                property.pre_roll.distance = roll_distance.unsigned_abs();
                if property.ra_flags.is_empty() {
                    property.ra_flags |= RaFlags::PRE_ROLL_END;
                }
            }
        }
        Ok(())
    }

    /// Applies random access point grouping. Only samples not yet
    /// classified as random access points are affected.
    pub(crate) fn apply_rap_group(
        &mut self,
        cursor: &mut GroupCursor<'a>,
        property: &mut Property,
    ) -> Result<(), Mp4Error> {
        let Some(index) = cursor.next_index() else {
            return Ok(())
        };
        if !property.ra_flags.is_empty() {
            return Ok(())
        }
        if let Some(GroupEntry::Rap{num_leading_samples_known, num_leading_samples}) = cursor.describe(index)? {
            // Unknown leading samples may still be a closed GOP,
            // so only a known non-zero count makes it an open RAP.
            property.ra_flags |= match *num_leading_samples_known && *num_leading_samples != 0 {
                true => RaFlags::OPEN_RAP,
                false => RaFlags::RAP,
            };
            self.distance = Some(0);
        }
        Ok(())
    }

    /// Copies `sdtp` values into the property.
    pub(crate) fn apply_dependency(property: &mut Property, dependency: &SampleDependency, iso_sdtp: bool) {
        match iso_sdtp {
            true => property.leading = dependency.is_leading,
            false => property.allow_earlier = dependency.is_leading,
        }
        property.independent = dependency.sample_depends_on;
        property.disposable = dependency.sample_is_depended_on;
        property.redundant = dependency.sample_has_redundancy;
    }

    /// Decides whether the first two bits of `sdtp` entries mean
    /// `is_leading` (ISO) or `sample_is_earlier_pts_allowed` (QuickTime).
    /// Brands alone can not tell for files mixing both.
    fn iso_sdtp(&self) -> bool {
        if !self.compatibility.iso_sdtp() {
            return false
        }
        let Some(sdtp) = &self.tables.sdtp else {
            return true
        };
        for dependency in sdtp.entries() {
            if dependency.is_leading > 1 {
                break
            }
            if dependency.is_leading == 1
                && dependency.sample_depends_on == crate::consts::dependency::INDEPENDENT
            {
                return false
            }
        }
        true
    }

    /// Adds a constant size LPCM sample, extending the current bunch
    /// if it only differs in position and timestamp.
    pub(crate) fn push_lpcm(&mut self, info: SampleInfo) -> Result<(), Mp4Error> {
        match self.bunch.as_mut() {
            Some(bunch) if bunch.accepts(&info) => bunch.sample_count += 1,
            Some(_) => {
                if let Some(bunch) = self.bunch.replace(LpcmBunch::start(&info)) {
                    self.bunches.push(bunch);
                }
            },
            None => self.bunch = Some(LpcmBunch::start(&info)),
        }
        self.check_mixed()
    }

    pub(crate) fn push_info(&mut self, info: SampleInfo) -> Result<(), Mp4Error> {
        self.infos.push(info);
        self.check_mixed()
    }

    fn check_mixed(&self) -> Result<(), Mp4Error> {
        if !self.infos.is_empty() && (!self.bunches.is_empty() || self.bunch.is_some()) {
            return Err(Mp4Error::MixedLpcm)
        }
        Ok(())
    }

    /// Reads the samples described by the sample tables in `stbl`.
    /// Fragmented files may have empty sample tables.
    pub(crate) fn build_sample_table(&mut self, fragmented: bool) -> Result<(), Mp4Error> {
        let tables = self.tables;
        if fragmented && tables.stsz.as_ref().map_or(true, |s| s.sample_count() == 0) {
            return Ok(())
        }

        let stts = tables.stts.as_ref()
            .ok_or(Mp4Error::MissingRequiredTable("stts"))?;
        let stsc = tables.stsc.as_ref()
            .filter(|s| !s.is_empty())
            .ok_or(Mp4Error::MissingRequiredTable("stsc"))?;
        let chunk_offsets = tables.chunk_offsets.as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(Mp4Error::MissingRequiredTable("stco"))?;
        let stsz = tables.stsz.as_ref()
            .ok_or(Mp4Error::MissingRequiredTable("stsz"))?;

        let stsc_table = stsc.table();
        let mut stsc_entry = &stsc_table[0];
        let mut next_stsc = 1;

        let mut description = self.description(stsc_entry.sample_description_index)?;
        let mut layout = PacketLayout::new(description, stsz);
        let mut data_reference = tables.data_reference(description.data_reference_index);

        let mut durations = RunCursor::new("stts", stts.table());
        let mut offsets = tables.ctts.as_ref()
            .map(|c| RunCursor::new("ctts", c.offset_table()));
        let allow_negative_offset = tables.ctts.as_ref()
            .is_some_and(|c| self.compatibility.allows_negative_ctts(c));
        let all_sync = tables.stss.is_none();
        let mut sync_samples = tables.stss.as_ref()
            .map(|s| SampleNumberCursor::new(s.sample_numbers()));
        let mut partial_sync_samples = tables.stps.as_ref()
            .map(|s| SampleNumberCursor::new(s.sample_numbers()));
        let iso_sdtp = self.iso_sdtp();
        let mut dependencies = tables.sdtp.as_ref()
            .map(|s| EntryCursor::new("sdtp", s.entries()));
        let mut sizes = EntryCursor::new("stsz", stsz.sizes());
        let mut roll_groups = GroupCursor::new(&tables.sample_groups.roll);
        let mut rap_groups = GroupCursor::new(&tables.sample_groups.rap);

        let mut chunk_number: u32 = 1;
        let mut open_chunk: Option<usize> = None;
        let mut data_offset: u64 = 0;
        let mut offset_from_chunk: u64 = 0;
        let mut sample_number = layout.samples_per_packet;
        let mut sample_number_in_chunk = layout.samples_per_packet;

        while sample_number <= stsz.sample_count() {
            let mut info = SampleInfo::default();
            let first_in_packet = sample_number + 1 - layout.samples_per_packet;

            // A packet of fixed compression audio spans several
            // stts/ctts entries but keeps the first offset.
            for i in 0..layout.samples_per_packet {
                let n = first_in_packet + i;
                let delta = durations.take(n)?;
                info.duration = info.duration.saturating_add(delta);
                self.dts += delta as u64;
                let offset = match offsets.as_mut() {
                    Some(cursor) => cursor.take(n)?,
                    None => 0,
                };
                if allow_negative_offset {
                    self.update_shift(offset);
                }
                if i == 0 {
                    info.offset = offset;
                }
            }
            self.media_duration += info.duration as u64;

            if layout.fixed_compression {
                info.property = Property::sync();
            } else {
                let property = &mut info.property;
                if let Some(cursor) = sync_samples.as_mut() {
                    if cursor.matches(sample_number) {
                        property.ra_flags |= RaFlags::SYNC;
                        self.distance = Some(0);
                    }
                }
                if let Some(cursor) = partial_sync_samples.as_mut() {
                    if cursor.matches(sample_number) {
                        property.ra_flags |= RaFlags::PARTIAL_SYNC | RaFlags::RAP;
                        self.distance = Some(0);
                    }
                }
                if let Some(dependency) = dependencies.as_mut().and_then(|d| d.next_entry()) {
                    Self::apply_dependency(property, dependency, iso_sdtp);
                }
                Self::apply_roll_group(&mut roll_groups, property, sample_number)?;
                property.post_roll.identifier = sample_number;
                self.apply_rap_group(&mut rap_groups, &mut info.property)?;
                // Without `stss` every sample is a sync sample unless already
                // classified above. The distance is not reset here since e.g.
                // MDCT based audio needs pre-roll even if every frame is sync.
                if all_sync && info.property.ra_flags.is_empty() {
                    info.property.ra_flags |= RaFlags::SYNC;
                }
                self.settle_distance(&mut info.property);
            }

            info.length = match layout.fixed_compression || stsz.is_constant() {
                true => layout.constant_size,
                false => *sizes.take(sample_number)?,
            };
            self.max_sample_size = self.max_sample_size.max(info.length);

            let chunk_index = match open_chunk {
                Some(index) => index,
                None => {
                    data_offset = chunk_offsets.get(chunk_number)
                        .ok_or(Mp4Error::TableExhausted{table: "stco", sample_number})?;
                    self.chunks.push(Chunk::new(chunk_number, data_offset, data_reference));
                    let index = self.chunks.len() - 1;
                    open_chunk = Some(index);
                    index
                }
            };
            info.pos = data_offset;
            info.index = stsc_entry.sample_description_index;
            info.chunk = chunk_index;
            offset_from_chunk += info.length as u64;

            // Layout of the sample's own description, before
            // a possible switch below.
            let is_lpcm = layout.is_lpcm;

            if sample_number_in_chunk == stsc_entry.samples_per_chunk {
                self.chunks[chunk_index].length = offset_from_chunk;
                open_chunk = None;
                chunk_number += 1;
                offset_from_chunk = 0;

                while let Some(next) = stsc_table.get(next_stsc).filter(|n| chunk_number > n.first_chunk) {
                    warn!("ignore broken entry in Sample To Chunk Box");
                    warn!("timeline might be corrupted");
                    self.warnings.push(TimelineWarning::SkippedStscEntry{
                        entry: next_stsc as u32 + 1,
                        first_chunk: next.first_chunk,
                        chunk_number,
                    });
                    next_stsc += 1;
                }

                if let Some(next) = stsc_table.get(next_stsc).filter(|n| n.first_chunk == chunk_number) {
                    stsc_entry = next;
                    next_stsc += 1;
                    description = self.description(stsc_entry.sample_description_index)?;
                    layout = PacketLayout::new(description, stsz);
                    data_reference = tables.data_reference(description.data_reference_index);
                }
                sample_number_in_chunk = layout.samples_per_packet;
            } else {
                data_offset += info.length as u64;
                sample_number_in_chunk += layout.samples_per_packet;
            }

            match is_lpcm {
                true => self.push_lpcm(info)?,
                false => self.push_info(info)?,
            }

            self.sample_count += 1;
            sample_number += layout.samples_per_packet;
        }

        if let Some(index) = open_chunk {
            self.chunks[index].length = offset_from_chunk;
        }

        Ok(())
    }

    pub(crate) fn finish(mut self, fragmented: bool) -> Result<Timeline, Mp4Error> {
        if let Some(bunch) = self.bunch.take() {
            self.bunches.push(bunch);
        }
        if !fragmented && self.chunks.is_empty() {
            return Err(Mp4Error::NoSamples(self.tables.track_id))
        }

        let index = match self.bunches.is_empty() {
            true => SampleIndex::General(self.infos),
            false => SampleIndex::Lpcm(self.bunches),
        };

        debug!(
            "track {}: {} samples, {} chunks, {} records, composition shift {}",
            self.tables.track_id,
            self.sample_count,
            self.chunks.len(),
            index.len(),
            self.ctd_shift
        );

        Ok(Timeline {
            track_id: self.tables.track_id,
            movie_timescale: self.tables.movie_timescale,
            media_timescale: self.tables.media_timescale,
            track_duration: self.tables.track_duration,
            fragmented,
            compatibility: self.compatibility,
            edits: self.tables.elst.as_ref()
                .map(|e| e.entries().to_vec())
                .unwrap_or_default(),
            chunks: self.chunks,
            index,
            sample_count: self.sample_count,
            max_sample_size: self.max_sample_size,
            media_duration: self.media_duration,
            ctd_shift: self.ctd_shift,
            warnings: self.warnings,
            dts_cache: None,
            bunch_cache: None,
            chunk_cache: Default::default(),
        })
    }
}
