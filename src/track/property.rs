//! Random access and dependency properties of a sample.

use bitflags::bitflags;

bitflags! {
    /// Random access classification of a sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RaFlags: u16 {
        /// Sync sample (`stss`, or every sample if `stss` is absent).
        const SYNC = 0x01;
        /// QuickTime partial sync sample (`stps`).
        const PARTIAL_SYNC = 0x02;
        const RAP = 0x04;
        const CLOSED = 0x08;
        const OPEN = 0x10;
        /// Gradual decoder refresh.
        const GDR = 0x20;
        const GDR_START = 0x40;
        const GDR_END = 0x80;

        const CLOSED_RAP = Self::RAP.bits() | Self::CLOSED.bits();
        const OPEN_RAP = Self::RAP.bits() | Self::OPEN.bits();
        /// Start of a post-roll recovery (positive roll distance).
        const POST_ROLL_START = Self::GDR.bits() | Self::GDR_START.bits();
        /// End of a pre-roll recovery (negative roll distance).
        const PRE_ROLL_END = Self::GDR.bits() | Self::GDR_END.bits();
    }
}

impl Default for RaFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl RaFlags {
    /// Random access point of any kind.
    pub fn is_random_access(&self) -> bool {
        !self.is_empty()
    }

    /// Random access point that only completes after
    /// a roll recovery.
    pub fn is_gdr(&self) -> bool {
        self.contains(Self::GDR)
    }
}

/// Pre-roll recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreRoll {
    /// Number of samples that must be decoded before this one
    /// for it to be presented correctly. Without a roll group entry
    /// this is the distance from the preceding random access point.
    pub distance: u32,
}

/// Post-roll recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostRoll {
    /// Sample number of this sample.
    pub identifier: u32,
    /// Sample number from which decoding is correct,
    /// when decoding starts at this sample.
    pub complete: u32,
}

/// Sample property.
///
/// The two-bit dependency fields use the values in
/// [`consts::dependency`](crate::consts::dependency).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Property {
    pub ra_flags: RaFlags,
    /// ISO `is_leading`.
    pub leading: u8,
    /// QuickTime interpretation of the same two bits
    /// (`sample_is_earlier_pts_allowed`).
    pub allow_earlier: u8,
    pub independent: u8,
    pub disposable: u8,
    pub redundant: u8,
    pub pre_roll: PreRoll,
    pub post_roll: PostRoll,
}

impl Property {
    /// Property of a sample that is always a sync sample,
    /// e.g. LPCM audio.
    pub fn sync() -> Self {
        Self {
            ra_flags: RaFlags::SYNC,
            ..Self::default()
        }
    }

    pub fn is_sync(&self) -> bool {
        self.ra_flags.contains(RaFlags::SYNC)
    }

    pub fn is_random_access(&self) -> bool {
        self.ra_flags.is_random_access()
    }
}
