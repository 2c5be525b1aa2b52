//! Random access point navigation.

use crate::Mp4Error;

use super::{RaFlags, SampleIndex, SampleInfo, Timeline};

/// Closest random access point for a sample,
/// and what decoding from it involves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RapDetail {
    /// 1-based sample number of the random access point.
    pub rap_number: u32,
    pub ra_flags: RaFlags,
    /// Samples after the random access point in decoding order
    /// that are presented before it.
    pub leading: u32,
    /// Number of samples between the random access point
    /// decoding should start from and the one
    /// where the output is correct.
    /// 0 if decoding can start at `rap_number`.
    pub distance: u32,
}

impl Timeline {
    fn rap_infos(&self) -> &[SampleInfo] {
        match &self.index {
            SampleIndex::General(infos) => infos,
            SampleIndex::Lpcm(_) => &[],
        }
    }

    /// Closest random access point at or before `sample_number`.
    pub fn closest_past_random_access_point(&self, sample_number: u32) -> Result<u32, Mp4Error> {
        let infos = self.rap_infos();
        if sample_number == 0 || sample_number as usize > infos.len() {
            return Err(Mp4Error::NoRandomAccessPoint(sample_number))
        }
        infos[..sample_number as usize].iter()
            .rposition(|i| i.property.ra_flags.is_random_access())
            .map(|i| i as u32 + 1)
            .ok_or(Mp4Error::NoRandomAccessPoint(sample_number))
    }

    /// Closest random access point at or after `sample_number`.
    pub fn closest_future_random_access_point(&self, sample_number: u32) -> Result<u32, Mp4Error> {
        let infos = self.rap_infos();
        if sample_number == 0 || sample_number as usize > infos.len() {
            return Err(Mp4Error::NoRandomAccessPoint(sample_number))
        }
        infos[sample_number as usize - 1..].iter()
            .position(|i| i.property.ra_flags.is_random_access())
            .map(|i| sample_number + i as u32)
            .ok_or(Mp4Error::NoRandomAccessPoint(sample_number))
    }

    fn closest_rap(&self, sample_number: u32) -> Result<u32, Mp4Error> {
        self.closest_past_random_access_point(sample_number)
            .or_else(|_| self.closest_future_random_access_point(sample_number + 1))
    }

    /// Closest random access point to `sample_number`,
    /// preferring earlier samples. Every LPCM sample is
    /// a random access point.
    pub fn closest_random_access_point(&self, sample_number: u32) -> Result<u32, Mp4Error> {
        self.check_range(sample_number)?;
        match self.index {
            SampleIndex::Lpcm(_) => Ok(sample_number),
            SampleIndex::General(_) => self.closest_rap(sample_number),
        }
    }

    /// Closest random access point to `sample_number`
    /// with its flags, leading sample count, and recovery distance.
    pub fn random_access_point_detail(&mut self, sample_number: u32) -> Result<RapDetail, Mp4Error> {
        self.check_range(sample_number)?;
        if self.is_lpcm() {
            return Ok(RapDetail {
                rap_number: sample_number,
                ra_flags: RaFlags::SYNC,
                ..Default::default()
            })
        }

        let rap_number = self.closest_rap(sample_number)?;
        let info = *self.require_info(rap_number)?;
        let mut detail = RapDetail {
            rap_number,
            ra_flags: info.property.ra_flags,
            ..Default::default()
        };

        // The sample can not be decoded correctly.
        if sample_number < rap_number {
            return Ok(detail)
        }

        if !info.property.ra_flags.is_gdr() {
            detail.leading = self.leading_samples(rap_number, &info)?;
            if sample_number != rap_number {
                detail.distance = self.distance_from_non_gdr(rap_number)?;
            }
            return Ok(detail)
        }

        detail.distance = match info.property.pre_roll.distance {
            0 => self.post_roll_distance(sample_number, rap_number, &info)?,
            pre_roll => self.pre_roll_distance(rap_number, pre_roll)?,
        };
        Ok(detail)
    }

    /// Counts samples following the random access point in decoding
    /// order that are presented before it. Counting stops once the
    /// DTS reaches the composition time of the random access point.
    fn leading_samples(&mut self, rap_number: u32, rap: &SampleInfo) -> Result<u32, Mp4Error> {
        let shift = self.ctd_shift as i64;
        let mut dts = self.dts(rap_number)? as i64;
        let rap_cts = self.composition(dts as u64, rap.offset) + shift;

        let mut leading = 0;
        let mut duration = rap.duration;
        let mut next = rap_number + 1;
        loop {
            dts += duration as i64;
            if rap_cts <= dts {
                break
            }
            let Some(info) = self.info(next) else {
                break
            };
            let cts = self.composition(dts as u64, info.offset) + shift;
            if rap_cts > cts {
                leading += 1;
            }
            duration = info.duration;
            next += 1;
        }
        Ok(leading)
    }

    /// Distance back to the closest earlier random access point
    /// that is not a gradual decoder refresh.
    fn distance_from_non_gdr(&self, rap_number: u32) -> Result<u32, Mp4Error> {
        let mut prev = rap_number;
        loop {
            let Ok(number) = self.closest_past_random_access_point(prev - 1) else {
                return Ok(0)
            };
            prev = number;
            if !self.require_info(prev)?.property.ra_flags.is_gdr() {
                return Ok(rap_number - prev)
            }
        }
    }

    fn pre_roll_distance(&self, rap_number: u32, pre_roll: u32) -> Result<u32, Mp4Error> {
        let mut prev = rap_number;
        loop {
            let Ok(number) = self.closest_past_random_access_point(prev - 1) else {
                // Nothing to start from before the random access point.
                return Ok(match rap_number < pre_roll {
                    true => 0,
                    false => pre_roll,
                })
            };
            prev = number;
            if prev + pre_roll <= rap_number {
                return Ok(pre_roll)
            }
            if !self.require_info(prev)?.property.ra_flags.is_gdr() {
                return Ok(rap_number - prev)
            }
        }
    }

    fn post_roll_distance(&self, sample_number: u32, rap_number: u32, rap: &SampleInfo) -> Result<u32, Mp4Error> {
        if sample_number >= rap.property.post_roll.complete {
            return Ok(0)
        }
        let mut prev = rap_number;
        loop {
            let Ok(number) = self.closest_past_random_access_point(prev - 1) else {
                return Ok(0)
            };
            prev = number;
            let property = self.require_info(prev)?.property;
            if !property.ra_flags.is_gdr() || sample_number >= property.post_roll.complete {
                return Ok(rap_number - prev)
            }
        }
    }
}
