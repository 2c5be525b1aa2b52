mod stsd;
mod format;
mod audio;
mod sample;

pub use stsd::Stsd;
pub use sample::SampleDescription;
pub use format::{DataLoad, AudioFormat, MediaKind};
pub use audio::{AudioDescription, SoundV1, SoundV2};
