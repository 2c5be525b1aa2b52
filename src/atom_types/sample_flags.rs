//! Sample flags as used in `trex`, `tfhd`, and `trun`.

use crate::consts::dependency;

/// 32-bit sample flags, unpacked.
///
/// Layout (most significant bit first):
/// `reserved(4) is_leading(2) sample_depends_on(2) sample_is_depended_on(2)
/// sample_has_redundancy(2) sample_padding_value(3) sample_is_non_sync_sample(1)
/// sample_degradation_priority(16)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleFlags {
    pub is_leading: u8,
    pub sample_depends_on: u8,
    pub sample_is_depended_on: u8,
    pub sample_has_redundancy: u8,
    pub sample_padding_value: u8,
    pub is_non_sync_sample: bool,
    pub degradation_priority: u16,
}

impl From<u32> for SampleFlags {
    fn from(value: u32) -> Self {
        Self {
            is_leading: ((value >> 26) & 0b11) as u8,
            sample_depends_on: ((value >> 24) & 0b11) as u8,
            sample_is_depended_on: ((value >> 22) & 0b11) as u8,
            sample_has_redundancy: ((value >> 20) & 0b11) as u8,
            sample_padding_value: ((value >> 17) & 0b111) as u8,
            is_non_sync_sample: (value >> 16) & 1 == 1,
            degradation_priority: (value & 0xffff) as u16,
        }
    }
}

impl From<SampleFlags> for u32 {
    fn from(flags: SampleFlags) -> Self {
        (flags.is_leading as u32 & 0b11) << 26
            | (flags.sample_depends_on as u32 & 0b11) << 24
            | (flags.sample_is_depended_on as u32 & 0b11) << 22
            | (flags.sample_has_redundancy as u32 & 0b11) << 20
            | (flags.sample_padding_value as u32 & 0b111) << 17
            | (flags.is_non_sync_sample as u32) << 16
            | flags.degradation_priority as u32
    }
}

impl SampleFlags {
    /// Independently decodable sync sample.
    pub fn sync() -> Self {
        Self {
            sample_depends_on: dependency::INDEPENDENT,
            ..Self::default()
        }
    }

    /// Sample that depends on others.
    pub fn non_sync() -> Self {
        Self {
            sample_depends_on: dependency::NOT_INDEPENDENT,
            is_non_sync_sample: true,
            ..Self::default()
        }
    }
}
