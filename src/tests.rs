#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use binrw::BinReaderExt;
    use proptest::prelude::*;
    use time::Duration;

    use crate::{
        atom_types::{
            AudioDescription, Co64, Ctts, DataReference, Dref, EditEntry, Elst, Ftyp, GroupEntry,
            Mdhd, MediaKind, Mvhd, SampleDependency, SampleDescription, SampleFlags, Sbgp, Sdtp, Sgpd, Stco,
            Stsc, Stsd, Stss, Stsz, Stts, Tfhd, Tfra, TfraEntry, Tkhd, Trex, Trun,
        },
        consts::{grouping, DEFAULT_MAX_READ_SIZE},
        track::{
            Compatibility, MediaTimestamp, MediaTimestamps, Moof, MovieFragments, RaFlags,
            SampleGroup, SampleGroups, SampleIndex, Timeline, TimelineWarning, Traf,
            TrackTables,
        },
        ByteStream, Mp4, Mp4Error, Mp4Reader,
    };

    /// In-memory stream that counts reads.
    struct CountingStream {
        data: Vec<u8>,
        reads: usize,
    }

    impl CountingStream {
        fn new(len: usize) -> Self {
            Self {
                data: (0..len).map(|i| (i % 251) as u8).collect(),
                reads: 0,
            }
        }
    }

    impl ByteStream for CountingStream {
        fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, Mp4Error> {
            self.reads += 1;
            let start = offset as usize;
            self.data.get(start .. start + len)
                .map(|b| b.to_vec())
                .ok_or(Mp4Error::ReadMismatch{
                    got: self.data.len().saturating_sub(start) as u64,
                    expected: len as u64
                })
        }
    }

    fn video_description() -> SampleDescription {
        SampleDescription::new(b"avc1", MediaKind::Video, 1)
    }

    /// 16-bit stereo little endian PCM, 4 bytes per sample.
    fn pcm_description() -> SampleDescription {
        SampleDescription::audio_with(b"sowt", 1, AudioDescription::v0(2, 16, 0, 48000))
    }

    fn video_tables(track_id: u32, stts: Stts, stsz: Stsz, stsc: Stsc, offsets: &[u32]) -> TrackTables {
        TrackTables::new(track_id, 1000, 1000, Stsd::new(vec![video_description()]))
            .unwrap()
            .with_stts(stts)
            .with_stsz(stsz)
            .with_stsc(stsc)
            .with_stco(Stco::new(offsets))
    }

    /// 10 samples of 50 bytes, 100 units each, in one chunk at 1000.
    fn ten_samples() -> TrackTables {
        video_tables(1, Stts::new(&[(10, 100)]), Stsz::constant(50, 10), Stsc::new(&[(1, 10, 1)]), &[1000])
    }

    fn pcm_tables(sample_count: u32, samples_per_chunk: u32, offsets: &[u32]) -> TrackTables {
        TrackTables::new(1, 1000, 48000, Stsd::new(vec![pcm_description()]))
            .unwrap()
            .with_stts(Stts::new(&[(sample_count, 1)]))
            .with_stsz(Stsz::constant(4, sample_count))
            .with_stsc(Stsc::new(&[(1, samples_per_chunk, 1)]))
            .with_stco(Stco::new(offsets))
    }

    fn build(tables: &TrackTables) -> Timeline {
        Timeline::build(tables, None, Compatibility::isom(1)).unwrap()
    }

    fn roll_groups(runs: &[(u32, u32)], entries: Vec<GroupEntry>) -> SampleGroups {
        SampleGroups {
            roll: SampleGroup::new(Sbgp::new(grouping::ROLL, runs), Sgpd::new(grouping::ROLL, entries)),
            ..SampleGroups::default()
        }
    }

    fn rap_groups(runs: &[(u32, u32)], entries: Vec<GroupEntry>) -> SampleGroups {
        SampleGroups {
            rap: SampleGroup::new(Sbgp::new(grouping::RAP, runs), Sgpd::new(grouping::RAP, entries)),
            ..SampleGroups::default()
        }
    }

    #[test]
    fn constant_duration_timestamps() {
        let mut timeline = build(&ten_samples());
        assert_eq!(timeline.dts(5).unwrap(), 400);
        assert_eq!(timeline.cts(5).unwrap(), 400);
        assert_eq!(timeline.media_duration(), 1000);
        assert_eq!(timeline.sample_count(), 10);
        assert_eq!(timeline.max_sample_size(), 50);
        assert_eq!(timeline.last_sample_delta().unwrap(), 100);
        assert_eq!(timeline.duration(), Duration::seconds(1));
        assert_eq!(timeline.chunk_count(), 1);
        assert_eq!(timeline.chunks()[0].len(), 500);
        assert_eq!(timeline.sample_info(5).unwrap().pos, 1200);
        assert!(timeline.warnings().is_empty());
    }

    #[test]
    fn dts_in_any_order() {
        let mut timeline = build(&ten_samples());
        for n in [7, 6, 3, 10, 9, 1, 2, 8, 8] {
            assert_eq!(timeline.dts(n).unwrap(), (n as u64 - 1) * 100, "sample {n}");
        }
    }

    #[test]
    fn sample_number_out_of_range() {
        let mut timeline = build(&ten_samples());
        assert!(matches!(timeline.dts(0), Err(Mp4Error::SampleOutOfRange{sample_number: 0, sample_count: 10})));
        assert!(matches!(timeline.dts(11), Err(Mp4Error::SampleOutOfRange{..})));
        assert!(matches!(timeline.sample_property(11), Err(Mp4Error::SampleOutOfRange{..})));
        assert!(matches!(timeline.closest_random_access_point(0), Err(Mp4Error::SampleOutOfRange{..})));
        assert!(!timeline.check_sample_existence(0));
        assert!(!timeline.check_sample_existence(11));
        assert!(timeline.check_sample_existence(10));
    }

    #[test]
    fn negative_composition_offsets() {
        let tables = ten_samples()
            .with_ctts(Ctts::new(1, &[(3, -50), (7, 50)]));
        let mut timeline = Timeline::build(&tables, None, Compatibility::isom(4)).unwrap();
        assert_eq!(timeline.composition_to_decode_shift(), 50);
        assert_eq!(timeline.cts(1).unwrap(), -50);
        assert_eq!(timeline.cts(1).unwrap() + timeline.composition_to_decode_shift() as i64, 0);
        assert_eq!(timeline.cts(3).unwrap(), 150);
        assert_eq!(timeline.cts(4).unwrap(), 350);
    }

    #[test]
    fn unsigned_composition_offsets_without_brand() {
        // version 0 ctts in an isom file is unsigned
        let tables = ten_samples()
            .with_ctts(Ctts::new(0, &[(3, -50), (7, 50)]));
        let mut timeline = Timeline::build(&tables, None, Compatibility::isom(1)).unwrap();
        assert_eq!(timeline.composition_to_decode_shift(), 0);
        assert_eq!(timeline.cts(1).unwrap(), (-50_i32) as u32 as i64);
    }

    #[test]
    fn pcm_bunches_into_single_record() {
        let mut timeline = build(&pcm_tables(1_000_000, 1_000_000, &[0]));
        assert!(timeline.is_lpcm());
        assert_eq!(timeline.index().len(), 1);
        assert_eq!(timeline.sample_count(), 1_000_000);
        assert_eq!(timeline.media_duration(), 1_000_000);
        assert_eq!(timeline.chunks()[0].len(), 4_000_000);

        let info = timeline.sample_info(500_000).unwrap();
        assert_eq!(info.dts, 499_999);
        assert_eq!(info.pos, 499_999 * 4);
        assert_eq!(info.length, 4);
        assert!(info.property.is_sync());
    }

    #[test]
    fn pcm_lookups_across_bunches() {
        let mut timeline = build(&pcm_tables(8, 4, &[1000, 2000]));
        let SampleIndex::Lpcm(bunches) = timeline.index() else {
            panic!("expected LPCM bunches")
        };
        assert_eq!(bunches.len(), 2);
        assert_eq!(bunches.iter().map(|b| b.sample_count()).sum::<u32>(), 8);

        assert_eq!(timeline.dts(7).unwrap(), 6);
        assert_eq!(timeline.dts(2).unwrap(), 1);
        assert_eq!(timeline.dts(3).unwrap(), 2);
        assert_eq!(timeline.sample_info(6).unwrap().pos, 2004);
        assert_eq!(timeline.sample_duration(8).unwrap(), 1);
        assert!(timeline.sample_property(3).unwrap().is_sync());
        assert_eq!(timeline.closest_random_access_point(5).unwrap(), 5);

        let detail = timeline.random_access_point_detail(5).unwrap();
        assert_eq!(detail.rap_number, 5);
        assert_eq!(detail.ra_flags, RaFlags::SYNC);
        assert_eq!(detail.distance, 0);

        let timestamps = timeline.media_timestamps();
        assert_eq!(timestamps.len(), 8);
        assert_eq!(timestamps.as_slice()[7], MediaTimestamp::new(7, 7));

        assert!(matches!(
            timeline.set_media_timestamps(&timestamps),
            Err(Mp4Error::LpcmTimestampsUnsupported)
        ));
    }

    #[test]
    fn mixed_pcm_and_other_samples() {
        let tables = TrackTables::new(1, 1000, 1000, Stsd::new(vec![pcm_description(), video_description()]))
            .unwrap()
            .with_stts(Stts::new(&[(4, 1)]))
            .with_stsz(Stsz::constant(4, 4))
            .with_stsc(Stsc::new(&[(1, 2, 1), (2, 2, 2)]))
            .with_stco(Stco::new(&[0, 100]));
        let result = Timeline::build(&tables, None, Compatibility::quicktime());
        assert!(matches!(result, Err(Mp4Error::MixedLpcm)));
    }

    #[test]
    fn sample_sizes_run_out() {
        let tables = video_tables(1, Stts::new(&[(5, 1)]), Stsz::with_sizes(5, &[10, 20, 30]), Stsc::new(&[(1, 5, 1)]), &[0]);
        let result = Timeline::build(&tables, None, Compatibility::isom(1));
        assert!(matches!(result, Err(Mp4Error::TableExhausted{table: "stsz", sample_number: 4})));

        let mut mp4 = Mp4::new(Mp4Reader::from_bytes(Vec::new()));
        assert!(mp4.construct_timeline(&tables).is_err());
        assert!(matches!(mp4.timeline(1), Err(Mp4Error::NoSuchTimeline(1))));
    }

    #[test]
    fn durations_run_out() {
        let tables = video_tables(1, Stts::new(&[(3, 1)]), Stsz::constant(10, 5), Stsc::new(&[(1, 5, 1)]), &[0]);
        let result = Timeline::build(&tables, None, Compatibility::isom(1));
        assert!(matches!(result, Err(Mp4Error::TableExhausted{table: "stts", sample_number: 4})));
    }

    #[test]
    fn malformed_tables() {
        let no_stts = TrackTables::new(1, 1000, 1000, Stsd::new(vec![video_description()]))
            .unwrap()
            .with_stsz(Stsz::constant(10, 1))
            .with_stsc(Stsc::new(&[(1, 1, 1)]))
            .with_stco(Stco::new(&[0]));
        assert!(matches!(
            Timeline::build(&no_stts, None, Compatibility::isom(1)),
            Err(Mp4Error::MissingRequiredTable("stts"))
        ));

        let bad_description = video_tables(1, Stts::new(&[(2, 1)]), Stsz::constant(10, 2), Stsc::new(&[(1, 2, 2)]), &[0]);
        assert!(matches!(
            Timeline::build(&bad_description, None, Compatibility::isom(1)),
            Err(Mp4Error::MissingSampleDescription(2))
        ));

        let bad_group = ten_samples()
            .with_sample_groups(roll_groups(&[(1, 2)], vec![GroupEntry::Roll{roll_distance: 1}]));
        match Timeline::build(&bad_group, None, Compatibility::isom(1)) {
            Err(Mp4Error::MissingGroupDescription{grouping_type, index}) => {
                assert_eq!(grouping_type, "roll");
                assert_eq!(index, 2);
            },
            other => panic!("unexpected result {other:?}"),
        }

        let empty = video_tables(1, Stts::new(&[]), Stsz::constant(10, 0), Stsc::new(&[(1, 1, 1)]), &[0]);
        assert!(matches!(
            Timeline::build(&empty, None, Compatibility::isom(1)),
            Err(Mp4Error::NoSamples(1))
        ));

        assert!(matches!(
            TrackTables::new(1, 0, 1000, Stsd::default()),
            Err(Mp4Error::InvalidTimescale)
        ));
        assert!(matches!(
            TrackTables::new(0, 1000, 1000, Stsd::default()),
            Err(Mp4Error::InvalidTrackId)
        ));
    }

    #[test]
    fn broken_stsc_entry_is_skipped() {
        let tables = video_tables(1, Stts::new(&[(4, 1)]), Stsz::constant(10, 4), Stsc::new(&[(1, 2, 1), (1, 3, 1)]), &[0, 100]);
        let mut timeline = build(&tables);
        assert_eq!(timeline.chunk_count(), 2);
        assert_eq!(
            timeline.warnings(),
            &[TimelineWarning::SkippedStscEntry{entry: 2, first_chunk: 1, chunk_number: 2}]
        );
        assert_eq!(timeline.sample_info(3).unwrap().pos, 100);
        assert_eq!(timeline.sample_info(4).unwrap().pos, 110);
    }

    #[test]
    fn chunk_lengths_and_positions() {
        let tables = video_tables(
            1,
            Stts::new(&[(5, 10)]),
            Stsz::with_sizes(5, &[10, 20, 30, 40, 50]),
            Stsc::new(&[(1, 2, 1), (3, 1, 1)]),
            &[100, 200, 300],
        );
        let mut timeline = build(&tables);
        let lengths: Vec<u64> = timeline.chunks().iter().map(|c| c.len()).collect();
        assert_eq!(lengths, vec![30, 70, 50]);
        let positions: Vec<u64> = (1..=5).map(|n| timeline.sample_info(n).unwrap().pos).collect();
        assert_eq!(positions, vec![100, 110, 200, 230, 300]);
        assert_eq!(timeline.max_sample_size(), 50);
    }

    #[test]
    fn closest_random_access_points() {
        let tables = ten_samples().with_stss(Stss::new(&[1, 5, 9]));
        let mut timeline = build(&tables);
        assert_eq!(timeline.closest_random_access_point(3).unwrap(), 1);
        assert_eq!(timeline.closest_random_access_point(5).unwrap(), 5);
        assert_eq!(timeline.closest_random_access_point(8).unwrap(), 5);
        assert_eq!(timeline.closest_future_random_access_point(6).unwrap(), 9);
        assert!(!timeline.sample_property(2).unwrap().is_random_access());

        let detail = timeline.random_access_point_detail(7).unwrap();
        assert_eq!(detail.rap_number, 5);
        assert_eq!(detail.ra_flags, RaFlags::SYNC);
        assert_eq!(detail.leading, 0);
        assert_eq!(detail.distance, 4);

        assert_eq!(timeline.random_access_point_detail(5).unwrap().distance, 0);
        assert_eq!(timeline.random_access_point_detail(1).unwrap().distance, 0);
    }

    #[test]
    fn random_access_point_after_sample() {
        let tables = ten_samples().with_stss(Stss::new(&[5]));
        let mut timeline = build(&tables);
        assert!(matches!(
            timeline.closest_past_random_access_point(2),
            Err(Mp4Error::NoRandomAccessPoint(2))
        ));
        assert_eq!(timeline.closest_random_access_point(2).unwrap(), 5);

        let detail = timeline.random_access_point_detail(2).unwrap();
        assert_eq!(detail.rap_number, 5);
        assert_eq!(detail.ra_flags, RaFlags::SYNC);
        assert_eq!(detail.leading, 0);
        assert_eq!(detail.distance, 0);
    }

    #[test]
    fn leading_samples_stop_at_rap_composition_time() {
        // I(cts 30) B(10) B(20) P(30) P(40): counting stops when
        // the DTS reaches the CTS of the random access point.
        let tables = video_tables(1, Stts::new(&[(5, 10)]), Stsz::constant(10, 5), Stsc::new(&[(1, 5, 1)]), &[0])
            .with_ctts(Ctts::new(0, &[(1, 30), (4, 0)]))
            .with_stss(Stss::new(&[1]));
        let mut timeline = build(&tables);
        let detail = timeline.random_access_point_detail(1).unwrap();
        assert_eq!(detail.rap_number, 1);
        assert_eq!(detail.leading, 2);
        assert_eq!(detail.distance, 0);
    }

    #[test]
    fn post_roll_recovery_distance() {
        let tables = ten_samples()
            .with_stss(Stss::new(&[10]))
            .with_sample_groups(roll_groups(
                &[(1, 1), (3, 0), (1, 1), (5, 0)],
                vec![GroupEntry::Roll{roll_distance: 3}]
            ));
        let mut timeline = build(&tables);

        let property = timeline.sample_property(5).unwrap();
        assert_eq!(property.ra_flags, RaFlags::POST_ROLL_START);
        assert_eq!(property.post_roll.complete, 8);
        assert_eq!(property.post_roll.identifier, 5);

        let detail = timeline.random_access_point_detail(6).unwrap();
        assert_eq!(detail.rap_number, 5);
        assert_eq!(detail.distance, 4);

        assert_eq!(timeline.random_access_point_detail(9).unwrap().distance, 0);
        assert_eq!(timeline.random_access_point_detail(3).unwrap().distance, 0);
    }

    #[test]
    fn pre_roll_recovery_distance() {
        let tables = video_tables(1, Stts::new(&[(6, 1)]), Stsz::constant(10, 6), Stsc::new(&[(1, 6, 1)]), &[0])
            .with_stss(Stss::new(&[1]))
            .with_sample_groups(roll_groups(&[(3, 0), (1, 1)], vec![GroupEntry::Roll{roll_distance: -2}]));
        let mut timeline = build(&tables);
        assert_eq!(timeline.sample_property(4).unwrap().ra_flags, RaFlags::PRE_ROLL_END);
        assert_eq!(timeline.random_access_point_detail(4).unwrap().distance, 2);
        assert_eq!(timeline.random_access_point_detail(6).unwrap().distance, 2);
        // distance from the last sync sample
        assert_eq!(timeline.sample_property(6).unwrap().pre_roll.distance, 5);
    }

    #[test]
    fn pre_roll_without_earlier_random_access_point() {
        let short = video_tables(1, Stts::new(&[(6, 1)]), Stsz::constant(10, 6), Stsc::new(&[(1, 6, 1)]), &[0])
            .with_stss(Stss::new(&[6]));

        let tables = short.clone()
            .with_sample_groups(roll_groups(&[(1, 0), (1, 1)], vec![GroupEntry::Roll{roll_distance: -3}]));
        let mut timeline = build(&tables);
        assert_eq!(timeline.random_access_point_detail(2).unwrap().distance, 0);

        let tables = short
            .with_sample_groups(roll_groups(&[(3, 0), (1, 1)], vec![GroupEntry::Roll{roll_distance: -2}]));
        let mut timeline = build(&tables);
        assert_eq!(timeline.random_access_point_detail(4).unwrap().distance, 2);
    }

    #[test]
    fn random_access_point_groups() {
        let open = ten_samples()
            .with_stss(Stss::new(&[1]))
            .with_sample_groups(rap_groups(&[(2, 0), (1, 1)], vec![GroupEntry::Rap{
                num_leading_samples_known: true,
                num_leading_samples: 2
            }]));
        let mut timeline = build(&open);
        assert_eq!(timeline.closest_random_access_point(4).unwrap(), 3);
        assert_eq!(timeline.sample_property(3).unwrap().ra_flags, RaFlags::OPEN_RAP);

        let unknown = ten_samples()
            .with_stss(Stss::new(&[1]))
            .with_sample_groups(rap_groups(&[(2, 0), (1, 1)], vec![GroupEntry::Rap{
                num_leading_samples_known: false,
                num_leading_samples: 0
            }]));
        let mut timeline = build(&unknown);
        assert_eq!(timeline.sample_property(3).unwrap().ra_flags, RaFlags::RAP);
    }

    #[test]
    fn partial_sync_samples() {
        let tables = ten_samples()
            .with_stss(Stss::new(&[1]))
            .with_stps(Stss::new(&[3]));
        let mut timeline = build(&tables);
        assert_eq!(
            timeline.sample_property(3).unwrap().ra_flags,
            RaFlags::PARTIAL_SYNC | RaFlags::RAP
        );
        assert_eq!(timeline.closest_random_access_point(4).unwrap(), 3);
    }

    #[test]
    fn sample_dependencies() {
        use crate::consts::dependency::*;

        let sdtp = Sdtp::new(vec![
            SampleDependency::from_byte(0b10_10_00_00),
            SampleDependency::from_byte(0b01_01_10_01),
            SampleDependency::from_byte(0b11_00_01_10),
        ]);
        let tables = video_tables(1, Stts::new(&[(3, 1)]), Stsz::constant(10, 3), Stsc::new(&[(1, 3, 1)]), &[0])
            .with_sdtp(sdtp);

        let mut iso = Timeline::build(&tables, None, Compatibility::isom(2)).unwrap();
        let property = iso.sample_property(1).unwrap();
        assert_eq!(property.leading, NOT_LEADING);
        assert_eq!(property.independent, INDEPENDENT);
        assert_eq!(property.disposable, UNKNOWN);
        assert_eq!(property.redundant, UNKNOWN);
        let property = iso.sample_property(2).unwrap();
        assert_eq!(property.leading, UNDECODABLE_LEADING);
        assert_eq!(property.independent, NOT_INDEPENDENT);
        assert_eq!(property.disposable, DISPOSABLE);
        assert_eq!(property.redundant, HAS_REDUNDANCY);
        let property = iso.sample_property(3).unwrap();
        assert_eq!(property.leading, DECODABLE_LEADING);
        assert_eq!(property.independent, UNKNOWN);
        assert_eq!(property.disposable, NOT_DISPOSABLE);
        assert_eq!(property.redundant, NO_REDUNDANCY);

        let mut qt = Timeline::build(&tables, None, Compatibility::quicktime()).unwrap();
        let property = qt.sample_property(2).unwrap();
        assert_eq!(property.leading, UNKNOWN);
        assert_eq!(property.allow_earlier, QT_EARLIER_PTS_ALLOWED);
        assert_eq!(property.independent, NOT_INDEPENDENT);
    }

    #[test]
    fn rap_group_wins_over_all_sync_fallback() {
        // No stss: every sample is sync unless a group classifies it.
        let tables = ten_samples()
            .with_sample_groups(rap_groups(&[(2, 0), (1, 1)], vec![GroupEntry::Rap{
                num_leading_samples_known: true,
                num_leading_samples: 2
            }]));
        let mut timeline = build(&tables);
        assert_eq!(timeline.sample_property(3).unwrap().ra_flags, RaFlags::OPEN_RAP);
        assert_eq!(timeline.sample_property(2).unwrap().ra_flags, RaFlags::SYNC);
        assert_eq!(timeline.sample_property(4).unwrap().ra_flags, RaFlags::SYNC);
        // distance counts from the group's random access point
        assert_eq!(timeline.sample_property(4).unwrap().pre_roll.distance, 1);
    }

    #[test]
    fn roll_group_wins_over_all_sync_fallback() {
        let tables = ten_samples()
            .with_sample_groups(roll_groups(
                &[(4, 0), (1, 1), (5, 0)],
                vec![GroupEntry::Roll{roll_distance: 3}]
            ));
        let mut timeline = build(&tables);
        let property = timeline.sample_property(5).unwrap();
        assert_eq!(property.ra_flags, RaFlags::POST_ROLL_START);
        assert_eq!(property.post_roll.complete, 8);
        assert_eq!(timeline.sample_property(6).unwrap().ra_flags, RaFlags::SYNC);

        let tables = ten_samples()
            .with_sample_groups(roll_groups(&[(3, 0), (1, 1)], vec![GroupEntry::Roll{roll_distance: -2}]));
        let mut timeline = build(&tables);
        let property = timeline.sample_property(4).unwrap();
        assert_eq!(property.ra_flags, RaFlags::PRE_ROLL_END);
        assert_eq!(property.pre_roll.distance, 2);
    }

    #[test]
    fn compatibility_from_brands() {
        let ftyp = Ftyp::new(b"isom", &[b"iso6", b"avc1"]);
        let compat = Compatibility::from_ftyp(Some(&ftyp), false);
        assert_eq!(compat.max_isom_version, 6);
        assert!(compat.avc_extensions);
        assert!(!compat.qt_compatible);

        let qt = Ftyp::new(b"qt  ", &[b"qt  "]);
        assert!(Compatibility::from_ftyp(Some(&qt), false).qt_compatible);
        assert!(Compatibility::from_ftyp(None, false).qt_compatible);
        assert!(!Compatibility::from_ftyp(None, true).qt_compatible);
    }

    fn fragment_tables() -> TrackTables {
        TrackTables::new(1, 1000, 1000, Stsd::new(vec![video_description()])).unwrap()
    }

    fn trex(track_id: u32) -> Trex {
        Trex::new(track_id, 1, 10, 100, SampleFlags::non_sync())
    }

    #[test]
    fn fragment_base_offset_resolves_per_moof() {
        let moofs = vec![
            Moof::new(0, vec![Traf::new(Tfhd::new(1), vec![
                Trun::new(0, 2).with_data_offset(100).with_first_sample_flags(SampleFlags::sync())
            ])]),
            Moof::new(1000, vec![Traf::new(Tfhd::new(1), vec![
                Trun::new(0, 2).with_data_offset(50)
            ])]),
        ];
        let fragments = MovieFragments::new(vec![trex(1)], moofs);
        let mut timeline = Timeline::build(&fragment_tables(), Some(&fragments), Compatibility::isom(6)).unwrap();

        assert!(timeline.is_fragmented());
        assert_eq!(timeline.sample_count(), 4);
        assert_eq!(timeline.media_duration(), 40);
        assert_eq!(timeline.chunk_count(), 2);
        assert_eq!(timeline.sample_info(2).unwrap().pos, 200);
        // not the end of the previous fragment's data (300)
        assert_eq!(timeline.sample_info(3).unwrap().pos, 1050);
        assert_eq!(timeline.dts(3).unwrap(), 20);

        assert!(timeline.sample_property(1).unwrap().is_sync());
        assert!(!timeline.sample_property(2).unwrap().is_sync());
        assert_eq!(timeline.closest_random_access_point(4).unwrap(), 1);
    }

    #[test]
    fn contiguous_fragment_runs_share_chunk() {
        let moofs = vec![
            Moof::new(0, vec![Traf::new(Tfhd::new(1), vec![
                Trun::new(0, 2).with_data_offset(100),
                Trun::new(0, 2),
            ])]),
        ];
        let fragments = MovieFragments::new(vec![trex(1)], moofs);
        let mut timeline = Timeline::build(&fragment_tables(), Some(&fragments), Compatibility::isom(6)).unwrap();
        assert_eq!(timeline.chunk_count(), 1);
        assert_eq!(timeline.chunks()[0].len(), 400);
        assert_eq!(timeline.sample_info(4).unwrap().pos, 400);
    }

    #[test]
    fn other_track_fragments_only_move_offsets() {
        let moofs = vec![
            Moof::new(0, vec![
                Traf::new(Tfhd::new(2), vec![Trun::new(0, 2).with_data_offset(100)]),
                Traf::new(Tfhd::new(1), vec![Trun::new(0, 1)]),
            ]),
        ];
        let fragments = MovieFragments::new(vec![trex(1), trex(2)], moofs);
        let mut timeline = Timeline::build(&fragment_tables(), Some(&fragments), Compatibility::isom(6)).unwrap();
        assert_eq!(timeline.sample_count(), 1);
        assert_eq!(timeline.sample_info(1).unwrap().pos, 300);
    }

    #[test]
    fn fragment_without_track_defaults() {
        let moofs = vec![Moof::new(0, vec![Traf::new(Tfhd::new(3), vec![Trun::new(0, 1)])])];
        let fragments = MovieFragments::new(vec![trex(1)], moofs);
        let result = Timeline::build(&fragment_tables(), Some(&fragments), Compatibility::isom(6));
        assert!(matches!(result, Err(Mp4Error::MissingTrackDefaults(3))));
    }

    #[test]
    fn fragment_random_access_entries_mark_sync() {
        let moofs = vec![Moof::new(0, vec![Traf::new(Tfhd::new(1), vec![
            Trun::new(0, 3).with_data_offset(100)
        ])])];
        let fragments = MovieFragments::new(vec![trex(1)], moofs)
            .with_tfra(vec![Tfra::new(1, vec![TfraEntry::new(0, 0, 1, 1, 2)])]);
        let mut timeline = Timeline::build(&fragment_tables(), Some(&fragments), Compatibility::isom(6)).unwrap();
        assert!(!timeline.sample_property(1).unwrap().is_sync());
        assert!(timeline.sample_property(2).unwrap().is_sync());
        assert!(!timeline.sample_property(3).unwrap().is_sync());
    }

    #[test]
    fn fragments_continue_sample_table() {
        let tables = video_tables(1, Stts::new(&[(2, 10)]), Stsz::constant(100, 2), Stsc::new(&[(1, 2, 1)]), &[0]);
        let moofs = vec![Moof::new(1000, vec![Traf::new(Tfhd::new(1), vec![
            Trun::new(0, 2).with_data_offset(8)
        ])])];
        let fragments = MovieFragments::new(vec![trex(1)], moofs);
        let mut timeline = Timeline::build(&tables, Some(&fragments), Compatibility::isom(6)).unwrap();
        assert_eq!(timeline.sample_count(), 4);
        assert_eq!(timeline.chunks()[1].number(), 2);
        assert_eq!(timeline.dts(3).unwrap(), 20);
        assert_eq!(timeline.sample_info(3).unwrap().pos, 1008);
    }

    #[test]
    fn empty_fragments_are_ignored() {
        let fragments = MovieFragments::new(Vec::new(), Vec::new());
        let timeline = Timeline::build(&ten_samples(), Some(&fragments), Compatibility::isom(1)).unwrap();
        assert!(!timeline.is_fragmented());
    }

    /// 4 samples of 10 bytes in a single chunk at 100.
    fn cached_tables() -> TrackTables {
        video_tables(1, Stts::new(&[(4, 1)]), Stsz::constant(10, 4), Stsc::new(&[(1, 4, 1)]), &[100])
    }

    #[test]
    fn whole_chunk_read_once() {
        let mut timeline = build(&cached_tables());
        let mut stream = CountingStream::new(200);
        for n in 1..=4 {
            let sample = timeline.sample(&mut stream, n, DEFAULT_MAX_READ_SIZE).unwrap();
            let start = 100 + (n as usize - 1) * 10;
            assert_eq!(sample.raw(), &stream.data[start .. start + 10]);
            assert_eq!(sample.dts(), n as u64 - 1);
        }
        assert_eq!(stream.reads, 1);
        assert_eq!(timeline.chunk_cache.window(), Some((1, 100, 40)));
    }

    #[test]
    fn large_chunk_read_in_windows() {
        let mut timeline = build(&cached_tables());
        let mut stream = CountingStream::new(200);
        for n in 1..=4 {
            let sample = timeline.sample(&mut stream, n, 25).unwrap();
            let start = 100 + (n as usize - 1) * 10;
            assert_eq!(sample.raw(), &stream.data[start .. start + 10]);
        }
        assert_eq!(stream.reads, 2);
        assert_eq!(timeline.chunk_cache.window(), Some((1, 120, 20)));
    }

    #[test]
    fn repeated_reads_are_identical() {
        let mut timeline = build(&cached_tables());
        let mut stream = CountingStream::new(200);
        let first = timeline.sample(&mut stream, 3, 15).unwrap();
        let other = timeline.sample(&mut stream, 1, 15).unwrap();
        let again = timeline.sample(&mut stream, 3, 15).unwrap();
        assert_eq!(first.raw(), again.raw());
        assert_ne!(first.raw(), other.raw());
    }

    #[test]
    fn short_stream_read() {
        let mut timeline = build(&cached_tables());
        let mut stream = CountingStream::new(120);
        let result = timeline.sample(&mut stream, 1, DEFAULT_MAX_READ_SIZE);
        assert!(matches!(result, Err(Mp4Error::ReadMismatch{expected: 40, ..})));
        assert_eq!(timeline.chunk_cache.window(), None);
    }

    #[test]
    fn external_data_reference() {
        let dref = Dref::new(vec![DataReference::external(u32::from_be_bytes(*b"url "), b"other.mp4\0".to_vec())]);
        let mut timeline = build(&ten_samples().with_dref(dref));
        assert!(!timeline.check_sample_existence(1));
        let mut stream = CountingStream::new(2000);
        assert!(matches!(
            timeline.sample(&mut stream, 1, DEFAULT_MAX_READ_SIZE),
            Err(Mp4Error::ExternalDataReference(1))
        ));
        assert_eq!(stream.reads, 0);

        let dref = Dref::new(vec![DataReference::self_contained()]);
        let mut timeline = build(&ten_samples().with_dref(dref));
        assert!(timeline.check_sample_existence(1));
    }

    #[test]
    fn samples_through_mp4() {
        let data: Vec<u8> = (0..200).map(|i| i as u8).collect();
        let mut mp4 = Mp4::new(Mp4Reader::from_bytes(data));
        mp4.construct_timeline(&cached_tables()).unwrap();
        assert_eq!(mp4.track_ids(), vec![1]);
        assert_eq!(mp4.sample_count(1).unwrap(), 4);

        let sample = mp4.sample(1, 2).unwrap();
        assert_eq!(sample.raw(), &(110..120).map(|i| i as u8).collect::<Vec<u8>>()[..]);
        assert!(matches!(mp4.sample(2, 1), Err(Mp4Error::NoSuchTimeline(2))));
        assert!(!mp4.check_sample_existence(2, 1));

        assert!(mp4.destruct_timeline(1).is_some());
        assert!(mp4.destruct_timeline(1).is_none());
        assert!(mp4.track_ids().is_empty());
    }

    #[test]
    fn replace_timestamps() {
        let mut timeline = build(&ten_samples());
        let timestamps: MediaTimestamps = (0..10)
            .map(|i| MediaTimestamp::new(i * 50, i as i64 * 50 + 100))
            .collect::<Vec<_>>()
            .into();
        timeline.set_media_timestamps(&timestamps).unwrap();
        assert_eq!(timeline.dts(10).unwrap(), 450);
        assert_eq!(timeline.cts(1).unwrap(), 100);
        assert_eq!(timeline.last_sample_delta().unwrap(), 50);
        assert_eq!(timeline.media_duration(), 500);
        assert_eq!(timeline.media_timestamps(), timestamps);
    }

    #[test]
    fn invalid_timestamps_change_nothing() {
        let mut timeline = build(&ten_samples());
        let valid: Vec<MediaTimestamp> = (0..10).map(|i| MediaTimestamp::new(i * 50, i as i64 * 50)).collect();

        let mut short = valid.clone();
        short.pop();
        assert!(matches!(
            timeline.set_media_timestamps(&short.into()),
            Err(Mp4Error::TimestampCountMismatch{got: 9, expected: 10})
        ));

        let mut late_start = valid.clone();
        late_start[0] = MediaTimestamp::new(10, 10);
        assert!(matches!(
            timeline.set_media_timestamps(&late_start.into()),
            Err(Mp4Error::NonZeroFirstDts(10))
        ));

        let mut decreasing = valid.clone();
        decreasing[2] = MediaTimestamp::new(40, 40);
        assert!(matches!(
            timeline.set_media_timestamps(&decreasing.into()),
            Err(Mp4Error::DecreasingDts{sample_number: 3})
        ));

        let mut shifted = valid;
        shifted[1] = MediaTimestamp::new(50, 0);
        assert!(matches!(
            timeline.set_media_timestamps(&shifted.into()),
            Err(Mp4Error::CompositionShiftNotAllowed(50))
        ));

        assert_eq!(timeline.dts(2).unwrap(), 100);
        assert_eq!(timeline.media_duration(), 1000);
        assert_eq!(timeline.composition_to_decode_shift(), 0);
    }

    #[test]
    fn timestamps_with_composition_shift() {
        let compat = Compatibility {
            max_isom_version: 4,
            avc_extensions: false,
            qt_compatible: true,
        };
        let mut timeline = Timeline::build(&ten_samples(), None, compat).unwrap();
        let mut timestamps: Vec<MediaTimestamp> = (0..10).map(|i| MediaTimestamp::new(i * 50, i as i64 * 50)).collect();
        timestamps[1] = MediaTimestamp::new(50, 0);
        timeline.set_media_timestamps(&timestamps.into()).unwrap();
        assert_eq!(timeline.composition_to_decode_shift(), 50);
        assert_eq!(timeline.cts(2).unwrap(), 0);
        assert_eq!(timeline.cts(3).unwrap(), 100);
    }

    #[test]
    fn single_sample_gets_maximum_duration() {
        let tables = video_tables(1, Stts::new(&[(1, 10)]), Stsz::constant(10, 1), Stsc::new(&[(1, 1, 1)]), &[0]);
        let mut timeline = build(&tables);
        timeline.set_media_timestamps(&vec![MediaTimestamp::new(0, 0)].into()).unwrap();
        assert_eq!(timeline.sample_duration(1).unwrap(), u32::MAX);
    }

    #[test]
    fn timestamp_order_and_delay() {
        // I P B B
        let mut timestamps = MediaTimestamps::from(vec![
            MediaTimestamp::new(0, 0),
            MediaTimestamp::new(10, 30),
            MediaTimestamp::new(20, 10),
            MediaTimestamp::new(30, 20),
        ]);
        assert_eq!(timestamps.max_sample_delay(), 1);

        timestamps.sort_composition_order();
        let dts: Vec<u64> = timestamps.iter().map(|t| t.dts).collect();
        assert_eq!(dts, vec![0, 20, 30, 10]);

        timestamps.sort_decoding_order();
        let cts: Vec<i64> = timestamps.iter().map(|t| t.cts).collect();
        assert_eq!(cts, vec![0, 30, 10, 20]);

        let in_order = MediaTimestamps::from(vec![MediaTimestamp::new(0, 0), MediaTimestamp::new(1, 1)]);
        assert_eq!(in_order.max_sample_delay(), 0);
    }

    #[test]
    fn copy_edit_list_between_time_scales() {
        let src = TrackTables::new(1, 1000, 48000, Stsd::new(vec![video_description()]))
            .unwrap()
            .with_track_duration(2000)
            .with_stts(Stts::new(&[(1, 1024)]))
            .with_stsz(Stsz::constant(10, 1))
            .with_stsc(Stsc::new(&[(1, 1, 1)]))
            .with_stco(Stco::new(&[0]))
            .with_elst(Elst::new(vec![
                EditEntry::new(1000, 1024, 0x10000),
                EditEntry::new(500, -1, 0x10000),
                EditEntry::new(0, 0, 0x10000),
            ]));
        let dst = TrackTables::new(2, 600, 90000, Stsd::new(vec![video_description()]))
            .unwrap()
            .with_stts(Stts::new(&[(1, 3000)]))
            .with_stsz(Stsz::constant(10, 1))
            .with_stsc(Stsc::new(&[(1, 1, 1)]))
            .with_stco(Stco::new(&[0]))
            .with_elst(Elst::new(vec![EditEntry::new(1, 1, 0x10000)]));

        let mut mp4 = Mp4::new(Mp4Reader::from_bytes(Vec::new()));
        mp4.construct_timeline(&src).unwrap();
        mp4.construct_timeline(&dst).unwrap();
        mp4.copy_timeline_map(2, 1).unwrap();

        assert_eq!(mp4.edit_count(2).unwrap(), 3);
        assert_eq!(mp4.edit_list(2).unwrap(), &[
            EditEntry::new(600, 1920, 0x10000),
            EditEntry::new(300, -1, 0x10000),
            EditEntry::new(1200, 0, 0x10000),
        ]);
        assert!(mp4.edit(2, 2).unwrap().is_some_and(|e| e.is_empty_edit()));
        assert!(mp4.edit(2, 4).unwrap().is_none());
        assert!(matches!(mp4.copy_timeline_map(2, 3), Err(Mp4Error::NoSuchTimeline(3))));
    }

    #[test]
    fn copy_edit_list_with_composition_shift() {
        let src_tables = ten_samples()
            .with_ctts(Ctts::new(1, &[(1, -50), (9, 0)]))
            .with_elst(Elst::new(vec![EditEntry::new(1000, 0, 0x10000)]));
        let src = Timeline::build(&src_tables, None, Compatibility::isom(4)).unwrap();
        assert_eq!(src.composition_to_decode_shift(), 50);

        let mut dst = build(&ten_samples());
        dst.copy_timeline_map(&src);
        assert_eq!(dst.edit_list(), &[EditEntry::new(1000, 50, 0x10000)]);

        // no edits in the source clears the destination
        let empty = build(&ten_samples());
        dst.copy_timeline_map(&empty);
        assert_eq!(dst.edit_count(), 0);
    }

    #[test]
    fn decode_sample_table_atoms() {
        let stts: Stts = Cursor::new(vec![
            0, 0, 0, 0,
            0, 0, 0, 2,
            0, 0, 0, 3, 0, 0, 0, 100,
            0, 0, 0, 1, 0, 0, 0, 50,
        ]).read_be().unwrap();
        assert_eq!(stts.table().len(), 2);
        assert_eq!(stts.table()[1].sample_delta(), 50);

        let ctts: Ctts = Cursor::new(vec![
            1, 0, 0, 0,
            0, 0, 0, 1,
            0, 0, 0, 2, 0xff, 0xff, 0xff, 0xce,
        ]).read_be().unwrap();
        assert_eq!(ctts.version(), 1);
        assert_eq!(ctts.offset_table()[0].sample_offset as i32, -50);

        let stsz: Stsz = Cursor::new(vec![
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 2,
            0, 0, 0, 10, 0, 0, 0, 20,
        ]).read_be().unwrap();
        assert_eq!(stsz.sample_count(), 2);
        assert_eq!(stsz.sizes(), &[10, 20]);

        let stsc: Stsc = Cursor::new(vec![
            0, 0, 0, 0,
            0, 0, 0, 1,
            0, 0, 0, 1, 0, 0, 0, 4, 0, 0, 0, 1,
        ]).read_be().unwrap();
        assert_eq!(stsc.table()[0].samples_per_chunk(), 4);

        let co64: Co64 = Cursor::new(vec![
            0, 0, 0, 0,
            0, 0, 0, 1,
            0, 0, 0, 1, 0, 0, 0, 0,
        ]).read_be().unwrap();
        assert_eq!(co64.get(1), Some(1 << 32));
        assert_eq!(co64.get(2), None);
    }

    #[test]
    fn tables_from_headers() {
        let tables = TrackTables::from_headers(
            &Mvhd::new(600, 1200),
            &Tkhd::new(3, 1200),
            &Mdhd::new(90000, 180000),
            Stsd::new(vec![video_description()]),
        ).unwrap();
        assert_eq!(tables.track_id(), 3);
        assert_eq!(tables.movie_timescale(), 600);
        assert_eq!(tables.media_timescale(), 90000);

        let mdhd: Mdhd = Cursor::new(vec![
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0x03, 0xe8,
            0, 0, 0x0b, 0xb8,
            0x55, 0xc4, 0, 0,
        ]).read_be().unwrap();
        assert_eq!(mdhd.time_scale(), 1000);
        assert_eq!(mdhd.duration_unscaled(), 3000);
        assert_eq!(mdhd.duration(), Duration::seconds(3));
    }

    #[test]
    fn decode_edit_lists() {
        let v0: Elst = Cursor::new(vec![
            0, 0, 0, 0,
            0, 0, 0, 1,
            0, 0, 0x03, 0xe8, 0xff, 0xff, 0xff, 0xff, 0, 1, 0, 0,
        ]).read_be().unwrap();
        assert_eq!(v0.entries(), &[EditEntry::new(1000, -1, 0x10000)]);
        assert!(v0.entries()[0].is_empty_edit());

        let v1: Elst = Cursor::new(vec![
            1, 0, 0, 0,
            0, 0, 0, 1,
            0, 0, 0, 0, 0, 0, 0x03, 0xe8,
            0, 0, 0, 0, 0, 0, 0, 0x10,
            0, 1, 0, 0,
        ]).read_be().unwrap();
        assert_eq!(v1.entries()[0].media_time, 16);
        assert_eq!(v1.entries()[0].rate(), 1.0);
    }

    #[test]
    fn decode_fragment_atoms() {
        // default-base-is-moof | default-sample-duration-present
        let tfhd: Tfhd = Cursor::new(vec![
            0, 0x02, 0x00, 0x08,
            0, 0, 0, 1,
            0, 0, 0, 42,
        ]).read_be().unwrap();
        assert_eq!(tfhd.track_id(), 1);
        assert_eq!(tfhd.default_sample_duration, Some(42));
        assert_eq!(tfhd.base_data_offset(), None);
        assert!(tfhd.default_base_is_moof());

        // data-offset | sample-duration | sample-composition-time-offset
        let trun: Trun = Cursor::new(vec![
            1, 0x00, 0x09, 0x01,
            0, 0, 0, 2,
            0, 0, 0, 8,
            0, 0, 0, 10, 0xff, 0xff, 0xff, 0xf6,
            0, 0, 0, 20, 0, 0, 0, 5,
        ]).read_be().unwrap();
        assert_eq!(trun.sample_count(), 2);
        assert_eq!(trun.data_offset, Some(8));
        let row = trun.row(0).unwrap();
        assert_eq!(row.duration, Some(10));
        assert_eq!(row.size, None);
        assert_eq!(row.composition_time_offset.map(|o| o as i32), Some(-10));
        assert_eq!(trun.row(1).unwrap().duration, Some(20));

        // sample-flags | sample-composition-time-offset: the offset is
        // present per the run flags, whatever the sample flags hold
        let trun: Trun = Cursor::new(vec![
            0, 0x00, 0x0c, 0x00,
            0, 0, 0, 1,
            0x01, 0x01, 0, 0, 0, 0, 0, 30,
        ]).read_be().unwrap();
        let row = trun.row(0).unwrap();
        assert_eq!(row.flags, Some(0x0101_0000));
        assert_eq!(row.sample_flags(), Some(SampleFlags::non_sync()));
        assert_eq!(row.composition_time_offset, Some(30));
    }

    #[test]
    fn decode_group_descriptions() {
        let roll: Sgpd = Cursor::new(vec![
            1, 0, 0, 0,
            b'r', b'o', b'l', b'l',
            0, 0, 0, 2,
            0, 0, 0, 1,
            0xff, 0xfe,
        ]).read_be().unwrap();
        assert_eq!(roll.get(1), Some(&GroupEntry::Roll{roll_distance: -2}));

        let rap: Sgpd = Cursor::new(vec![
            1, 0, 0, 0,
            b'r', b'a', b'p', b' ',
            0, 0, 0, 1,
            0, 0, 0, 1,
            0x82,
        ]).read_be().unwrap();
        assert_eq!(rap.get(1), Some(&GroupEntry::Rap{
            num_leading_samples_known: true,
            num_leading_samples: 2
        }));
        assert_eq!(rap.get(2), None);
    }

    fn chunk_offsets(sizes: &[u32], samples_per_chunk: u32) -> Vec<u64> {
        let mut offsets = Vec::new();
        let mut pos = 64;
        for chunk in sizes.chunks(samples_per_chunk as usize) {
            offsets.push(pos);
            // leave a gap between chunks
            pos += chunk.iter().map(|s| *s as u64).sum::<u64>() + 16;
        }
        offsets
    }

    proptest! {
        #[test]
        fn sample_table_invariants(
            samples in prop::collection::vec((1u32..1000, 1u32..500), 1..200),
            samples_per_chunk in 1u32..10,
        ) {
            let durations: Vec<(u32, u32)> = samples.iter().map(|(d, _)| (1, *d)).collect();
            let sizes: Vec<u32> = samples.iter().map(|(_, s)| *s).collect();
            let sample_count = samples.len() as u32;
            let tables = TrackTables::new(1, 1000, 1000, Stsd::new(vec![video_description()]))
                .unwrap()
                .with_stts(Stts::new(&durations))
                .with_stsz(Stsz::with_sizes(sample_count, &sizes))
                .with_stsc(Stsc::new(&[(1, samples_per_chunk, 1)]))
                .with_co64(Co64::new(&chunk_offsets(&sizes, samples_per_chunk)));
            let mut timeline = build(&tables);

            prop_assert_eq!(timeline.sample_count(), sample_count);
            prop_assert_eq!(
                timeline.media_duration(),
                samples.iter().map(|(d, _)| *d as u64).sum::<u64>()
            );
            prop_assert_eq!(timeline.dts(1).unwrap(), 0);
            for n in 1..sample_count {
                let dts = timeline.dts(n).unwrap();
                let duration = timeline.sample_duration(n).unwrap();
                prop_assert_eq!(timeline.dts(n + 1).unwrap(), dts + duration as u64);
            }

            let SampleIndex::General(infos) = timeline.index() else {
                panic!("expected one record per sample")
            };
            for (i, chunk) in timeline.chunks().iter().enumerate() {
                let total: u64 = infos.iter()
                    .filter(|info| info.chunk() == i)
                    .map(|info| info.len() as u64)
                    .sum();
                prop_assert_eq!(chunk.len(), total);
            }
            for pair in timeline.chunks().windows(2) {
                prop_assert!(pair[0].end() <= pair[1].data_offset());
            }
        }

        #[test]
        fn pcm_bunch_coverage(
            sample_count in 1u32..3000,
            samples_per_chunk in 1u32..700,
        ) {
            let chunk_count = sample_count.div_ceil(samples_per_chunk);
            let offsets: Vec<u32> = (0..chunk_count).map(|i| i * 10_000).collect();
            let mut timeline = build(&pcm_tables(sample_count, samples_per_chunk, &offsets));

            let SampleIndex::Lpcm(bunches) = timeline.index().clone() else {
                panic!("expected LPCM bunches")
            };
            prop_assert_eq!(bunches.iter().map(|b| b.sample_count()).sum::<u32>(), sample_count);

            let mut first = 1;
            let mut bunch_dts = 0;
            for bunch in bunches.iter() {
                for k in 0..bunch.sample_count() {
                    let info = timeline.sample_info(first + k).unwrap();
                    prop_assert_eq!(info.pos, bunch.pos() + k as u64 * bunch.len() as u64);
                    prop_assert_eq!(info.dts, bunch_dts + k as u64 * bunch.duration() as u64);
                }
                first += bunch.sample_count();
                bunch_dts += bunch.total_duration();
            }
        }

        #[test]
        fn sync_sample_is_own_random_access_point(
            sync in prop::collection::btree_set(1u32..=10, 1..10),
            n in 1u32..=10,
        ) {
            let sync: Vec<u32> = sync.into_iter().collect();
            let timeline = build(&ten_samples().with_stss(Stss::new(&sync)));
            if let Ok(rap) = timeline.closest_past_random_access_point(n) {
                prop_assert!(rap <= n);
            }
            if sync.contains(&n) {
                prop_assert_eq!(timeline.closest_past_random_access_point(n).unwrap(), n);
            }
        }
    }
}
