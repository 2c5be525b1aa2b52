//! Flag values, grouping types, and defaults shared by the
//! sample table records and the timeline builder.

/// Maximum number of bytes read from the stream in one go
/// when filling the chunk cache. Chunks larger than this
/// are read in windows starting at the requested sample.
pub const DEFAULT_MAX_READ_SIZE: usize = 4 * 1024 * 1024;

/// `media_time` value of an empty edit.
pub const EDIT_MODE_EMPTY: i64 = -1;

/// Group description indices at or above this value
/// refer to the `sgpd` inside the track fragment.
pub const FRAGMENT_GROUP_DESCRIPTION_BASE: u32 = 0x10000;

/// `dref` entry flag: media data is in the same file.
pub const DREF_SELF_CONTAINED: u32 = 0x000001;

/// QuickTime sound description `compression_id`
/// for variable compression.
pub const QT_AUDIO_COMPRESSION_ID_VARIABLE_COMPRESSION: i16 = -2;

/// Grouping types (`sbgp`/`sgpd`).
pub mod grouping {
    /// Roll recovery (`roll`).
    pub const ROLL: u32 = u32::from_be_bytes(*b"roll");
    /// Audio pre-roll (`prol`).
    pub const PROL: u32 = u32::from_be_bytes(*b"prol");
    /// Random access point (`rap `).
    pub const RAP: u32 = u32::from_be_bytes(*b"rap ");
}

/// Track fragment header flags (`tfhd`).
pub mod tf_flags {
    pub const BASE_DATA_OFFSET_PRESENT: u32 = 0x000001;
    pub const SAMPLE_DESCRIPTION_INDEX_PRESENT: u32 = 0x000002;
    pub const DEFAULT_SAMPLE_DURATION_PRESENT: u32 = 0x000008;
    pub const DEFAULT_SAMPLE_SIZE_PRESENT: u32 = 0x000010;
    pub const DEFAULT_SAMPLE_FLAGS_PRESENT: u32 = 0x000020;
    pub const DURATION_IS_EMPTY: u32 = 0x010000;
    pub const DEFAULT_BASE_IS_MOOF: u32 = 0x020000;
}

/// Track run flags (`trun`).
pub mod tr_flags {
    pub const DATA_OFFSET_PRESENT: u32 = 0x000001;
    pub const FIRST_SAMPLE_FLAGS_PRESENT: u32 = 0x000004;
    pub const SAMPLE_DURATION_PRESENT: u32 = 0x000100;
    pub const SAMPLE_SIZE_PRESENT: u32 = 0x000200;
    pub const SAMPLE_FLAGS_PRESENT: u32 = 0x000400;
    pub const SAMPLE_COMPOSITION_TIME_OFFSET_PRESENT: u32 = 0x000800;
}

/// Two-bit values in `sdtp` entries and sample flags.
pub mod dependency {
    pub const UNKNOWN: u8 = 0;

    /// `is_leading` (ISO).
    pub const UNDECODABLE_LEADING: u8 = 1;
    pub const NOT_LEADING: u8 = 2;
    pub const DECODABLE_LEADING: u8 = 3;

    /// First two bits under QuickTime: sample may be
    /// presented earlier than its own decoding time.
    pub const QT_EARLIER_PTS_ALLOWED: u8 = 1;

    /// `sample_depends_on`.
    pub const NOT_INDEPENDENT: u8 = 1;
    pub const INDEPENDENT: u8 = 2;

    /// `sample_is_depended_on`.
    pub const NOT_DISPOSABLE: u8 = 1;
    pub const DISPOSABLE: u8 = 2;

    /// `sample_has_redundancy`.
    pub const HAS_REDUNDANCY: u8 = 1;
    pub const NO_REDUNDANCY: u8 = 2;
}
