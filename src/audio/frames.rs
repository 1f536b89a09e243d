use bandscope::{Spectrum, BAND_COUNT};
use serde::Serialize;

/// Pass 1 output: the spectrum of one analysis window
#[derive(Clone, Debug)]
pub struct FrameSpectrum {
    /// First sample of the window in the decoded signal
    pub start: usize,
    pub spectrum: Spectrum,
}

/// Pass 2 output, one JSON line per frame
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    /// Window start in seconds
    pub time: f32,
    pub avg_power: f32,
    pub bands: [f32; BAND_COUNT],
    /// At least one band is positive; consumers only forward these frames
    pub publish: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AnalysisSummary {
    pub frames: usize,
    pub published: usize,
    pub duration: f32,
    /// Loudest mean level each band saw
    pub peak_levels: [f32; BAND_COUNT],
    /// Input ceilings after the run (moved by auto-max)
    pub in_max: [f32; BAND_COUNT],
}
