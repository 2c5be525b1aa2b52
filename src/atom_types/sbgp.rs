//! Sample to group atom (`sbgp`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/sbgp`, `moof/traf/sbgp`
//!
//! Assigns runs of consecutive samples to a group description
//! in the `sgpd` atom with the same grouping type.

use binrw::BinRead;

use crate::{support::string_from_be_u32, track::Run};

/// Sample to group atom (`sbgp`).
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Sbgp {
    version: u8,
    _flags: [u8; 3],
    pub(crate) grouping_type: u32,
    #[br(if(version == 1))]
    grouping_type_parameter: Option<u32>,
    entry_count: u32,
    #[br(count = entry_count)]
    pub(crate) assignments: Vec<GroupAssignment>,
}

impl Sbgp {
    /// Create from `(SAMPLE_COUNT, GROUP_DESCRIPTION_INDEX)` runs.
    pub fn new(grouping_type: u32, runs: &[(u32, u32)]) -> Self {
        let assignments: Vec<GroupAssignment> = runs.iter()
            .map(|(sample_count, group_description_index)| GroupAssignment {
                sample_count: *sample_count,
                group_description_index: *group_description_index,
            })
            .collect();
        Self {
            version: 0,
            _flags: [0; 3],
            grouping_type,
            grouping_type_parameter: None,
            entry_count: assignments.len() as u32,
            assignments,
        }
    }

    pub fn grouping_type(&self) -> u32 {
        self.grouping_type
    }

    pub fn grouping_type_string(&self) -> String {
        string_from_be_u32(self.grouping_type, false)
    }

    pub fn grouping_type_parameter(&self) -> Option<u32> {
        self.grouping_type_parameter
    }

    pub fn assignments(&self) -> &[GroupAssignment] {
        &self.assignments
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct GroupAssignment {
    pub sample_count: u32,
    /// 0 means the samples are not members of any group
    /// of this type.
    pub group_description_index: u32,
}

impl Run for GroupAssignment {
    type Value = u32;

    fn count(&self) -> u32 {
        self.sample_count
    }

    fn value(&self) -> u32 {
        self.group_description_index
    }
}
