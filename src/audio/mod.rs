pub mod analysis;
pub mod decode;
pub mod frames;
pub mod resynth;
