//! Sample group description atom (`sgpd`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/sgpd`, `moof/traf/sgpd`
//!
//! Only roll recovery (`roll`, `prol`) and random access point (`rap `)
//! entries are decoded. Other grouping types are kept as raw bytes.

use binrw::BinRead;

use crate::{consts::grouping, support::string_from_be_u32};

/// Sample group description atom (`sgpd`).
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Sgpd {
    version: u8,
    _flags: [u8; 3],
    pub(crate) grouping_type: u32,
    #[br(if(version == 1))]
    default_length: u32,
    #[br(if(version >= 2))]
    default_sample_description_index: Option<u32>,
    entry_count: u32,
    #[br(args {count: entry_count as usize, inner: (grouping_type, version, default_length)})]
    pub(crate) entries: Vec<GroupDescription>,
}

impl Sgpd {
    pub fn new(grouping_type: u32, entries: Vec<GroupEntry>) -> Self {
        let entries: Vec<GroupDescription> = entries.into_iter()
            .map(|entry| GroupDescription {description_length: None, entry})
            .collect();
        Self {
            version: 0,
            _flags: [0; 3],
            grouping_type,
            default_length: 0,
            default_sample_description_index: None,
            entry_count: entries.len() as u32,
            entries,
        }
    }

    pub fn grouping_type(&self) -> u32 {
        self.grouping_type
    }

    pub fn grouping_type_string(&self) -> String {
        string_from_be_u32(self.grouping_type, false)
    }

    pub fn default_sample_description_index(&self) -> Option<u32> {
        self.default_sample_description_index
    }

    /// Returns entry for 1-based group description index.
    pub fn get(&self, group_description_index: u32) -> Option<&GroupEntry> {
        let index = usize::try_from(group_description_index.checked_sub(1)?).ok()?;
        self.entries.get(index).map(|d| &d.entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, BinRead)]
#[br(big, import(grouping_type: u32, version: u8, default_length: u32))]
pub struct GroupDescription {
    #[br(if(version == 1 && default_length == 0))]
    description_length: Option<u32>,
    #[br(args(grouping_type, description_length.unwrap_or(default_length)))]
    pub(crate) entry: GroupEntry,
}

/// Sample group entry.
#[derive(Debug, Clone, PartialEq, BinRead)]
#[br(big, import(grouping_type: u32, length: u32))]
pub enum GroupEntry {
    /// Roll recovery entry (`roll`, `prol`).
    /// Positive distance: post-roll, the sample is a gradual decoding
    /// refresh start and decoding is correct `roll_distance` samples later.
    /// Negative distance: pre-roll, decoding must start `-roll_distance`
    /// samples earlier.
    #[br(pre_assert(grouping_type == grouping::ROLL || grouping_type == grouping::PROL))]
    Roll {
        roll_distance: i16,
    },
    /// Random access point entry (`rap `).
    #[br(pre_assert(grouping_type == grouping::RAP))]
    Rap {
        #[br(map = |b: u8| b & 0x80 != 0, restore_position)]
        num_leading_samples_known: bool,
        #[br(map = |b: u8| b & 0x7f)]
        num_leading_samples: u8,
    },
    Unknown(
        #[br(count = length)]
        Vec<u8>
    ),
}
