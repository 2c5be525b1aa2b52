//! Sample size atom (`stsz`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsz`
//!
//! Note that `stsz` lists sample size not chunk size.
//! `stco` or `co64` list chunk offsets, not offsets to individual samples.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_size_atom>

use binrw::BinRead;

/// Sample size atom (`stsz`).
///
/// Location: `moov/trak[multiple]/mdia/minf/stbl/stsz`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sample_size_atom>
#[derive(Debug, Clone, Default, BinRead)]
#[br(big)]
pub struct Stsz {
    _version: u8,
    _flags: [u8; 3],
    /// Sample size.
    /// If 0 `sample_count` u32 values follow,
    /// else all samples have this size.
    pub(crate) sample_size: u32,
    /// Number of samples in the track.
    pub(crate) sample_count: u32,
    #[br(if(sample_size == 0), count = sample_count)]
    pub(crate) sizes: Vec<u32>
}

impl Stsz {
    /// All samples share `sample_size`.
    pub fn constant(sample_size: u32, sample_count: u32) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            sample_size,
            sample_count,
            sizes: Vec::new()
        }
    }

    /// Per-sample sizes. `sample_count` is declared separately
    /// and is not required to match `sizes.len()`.
    pub fn with_sizes(sample_count: u32, sizes: &[u32]) -> Self {
        Self {
            _version: 0,
            _flags: [0; 3],
            sample_size: 0,
            sample_count,
            sizes: sizes.to_vec()
        }
    }

    /// Declared number of samples.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// Returns per-sample sizes in bytes.
    /// Empty if `sample_size` is non-zero.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub(crate) fn is_constant(&self) -> bool {
        self.sample_size != 0
    }
}
