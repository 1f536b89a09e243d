//! Four-band energy tracker.
//!
//! Each frame, a band averages the magnitudes in its bin range, optionally
//! raises its input ceiling to the loudest level seen, maps the level
//! linearly into an output range, smooths it against the previous frame and
//! zeroes it when the level falls under the input floor.

use crate::error::{Error, Result};

use super::command::{BandCommand, BandEdge, RangeEndpoint, Step};

pub const BAND_COUNT: usize = 4;

/// Amount a mapping endpoint or the smoothing coefficient moves per nudge
pub const DEFAULT_STEP: f32 = 0.05;

/// Weight of the new frame when smoothing
pub const DEFAULT_SMOOTH_RATE: f32 = 0.7;

/// One frequency band and its per-frame state.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    bottom: usize,
    top: usize,
    pub in_min: f32,
    pub in_max: f32,
    pub out_min: f32,
    pub out_max: f32,
    peak: f32,
    mean: f32,
    previous: f32,
    value: f32,
    cut: bool,
}

impl Band {
    pub fn new(bottom: usize, top: usize, input: (f32, f32), output: (f32, f32)) -> Result<Self> {
        if bottom >= top {
            return Err(Error::InvalidBand { bottom, top });
        }
        Ok(Self::with_range(bottom, top, input, output))
    }

    fn with_range(bottom: usize, top: usize, input: (f32, f32), output: (f32, f32)) -> Self {
        Self {
            bottom,
            top,
            in_min: input.0,
            in_max: input.1,
            out_min: output.0,
            out_max: output.1,
            peak: 0.0,
            mean: 0.0,
            previous: 1.0,
            value: 0.0,
            cut: false,
        }
    }

    /// First bin, inclusive
    pub fn bottom(&self) -> usize {
        self.bottom
    }

    /// Last bin, exclusive
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn width(&self) -> usize {
        self.top - self.bottom
    }

    /// Loudest mean level seen since the last peak reset
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Mean level of the most recent frame, before mapping
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Control value produced by the most recent frame
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Mean over the full band width; bins past the end of `magnitudes` count as silent.
    fn level(&self, magnitudes: &[f32]) -> f32 {
        let top = self.top.min(magnitudes.len());
        if top < self.top {
            log::debug!(
                "Band [{}, {}) clamped to {} bins",
                self.bottom,
                self.top,
                magnitudes.len()
            );
        }
        if self.bottom >= top {
            return 0.0;
        }
        let sum: f32 = magnitudes[self.bottom..top]
            .iter()
            .filter(|m| m.is_finite())
            .sum();
        sum / self.width() as f32
    }

    /// Run one frame through aggregate, auto-range, cutoff, remap and smoothing.
    fn advance(&mut self, magnitudes: &[f32], smooth_rate: Option<f32>, auto_max: bool) -> f32 {
        let level = self.level(magnitudes);
        self.mean = level;

        if level > self.peak {
            self.peak = level;
            if auto_max {
                self.in_max = level;
            }
        }

        if level < self.in_min {
            self.cut = true;
        }

        let mapped = self.remap(level);
        let mut value = match smooth_rate {
            Some(rate) => rate * mapped + (1.0 - rate) * self.previous,
            None => mapped,
        };
        self.previous = value;

        if self.cut {
            self.cut = false;
            value = 0.0;
        }
        self.value = value;

        self.in_min = round_cents(self.in_min);
        self.in_max = round_cents(self.in_max);

        value
    }

    fn remap(&self, level: f32) -> f32 {
        let span = self.in_max - self.in_min;
        // The floor is not subtracted from the level; calibrated ranges rely on it.
        let rate = if span != 0.0 { level / span } else { 0.0 };
        self.out_min + (self.out_max - self.out_min) * rate
    }
}

fn round_cents(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandTracker {
    bands: [Band; BAND_COUNT],
    smoothing: bool,
    smooth_rate: f32,
    auto_max: bool,
    step: f32,
}

impl Default for BandTracker {
    /// Low, mid, upper-mid and high bands for a 256-sample window.
    fn default() -> Self {
        let band = |bottom, top, in_max, out_max| {
            Band::with_range(bottom, top, (0.0, in_max), (0.0, out_max))
        };
        Self::new([
            band(1, 2, 5.0, 1.0),
            band(3, 10, 1.0, 1.0),
            band(35, 45, 0.5, 2.0),
            band(60, 70, 0.5, 2.0),
        ])
    }
}

impl BandTracker {
    pub fn new(bands: [Band; BAND_COUNT]) -> Self {
        Self {
            bands,
            smoothing: false,
            smooth_rate: DEFAULT_SMOOTH_RATE,
            auto_max: false,
            step: DEFAULT_STEP,
        }
    }

    pub fn with_smoothing(mut self, enabled: bool, rate: f32) -> Self {
        self.smoothing = enabled;
        self.smooth_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_auto_max(mut self, enabled: bool) -> Self {
        self.auto_max = enabled;
        self
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn bands(&self) -> &[Band; BAND_COUNT] {
        &self.bands
    }

    pub fn band(&self, index: usize) -> Result<&Band> {
        self.bands.get(index).ok_or(Error::BandIndex {
            index,
            count: BAND_COUNT,
        })
    }

    pub fn smoothing(&self) -> bool {
        self.smoothing
    }

    pub fn smooth_rate(&self) -> f32 {
        self.smooth_rate
    }

    pub fn auto_max(&self) -> bool {
        self.auto_max
    }

    /// Current output of every band
    pub fn values(&self) -> [f32; BAND_COUNT] {
        std::array::from_fn(|i| self.bands[i].value)
    }

    /// True when at least one band has a positive value
    pub fn any_active(&self) -> bool {
        self.bands.iter().any(|b| b.value > 0.0)
    }

    fn frame_settings(&self) -> (Option<f32>, bool) {
        let rate = self.smoothing.then_some(self.smooth_rate);
        (rate, self.auto_max)
    }

    /// Advance one band by one frame of `magnitudes` and return its new value.
    pub fn update_band(&mut self, magnitudes: &[f32], index: usize) -> Result<f32> {
        let (rate, auto_max) = self.frame_settings();
        let count = BAND_COUNT;
        let band = self
            .bands
            .get_mut(index)
            .ok_or(Error::BandIndex { index, count })?;
        Ok(band.advance(magnitudes, rate, auto_max))
    }

    /// Advance every band by one frame and return their values.
    pub fn update(&mut self, magnitudes: &[f32]) -> [f32; BAND_COUNT] {
        let (rate, auto_max) = self.frame_settings();
        for band in &mut self.bands {
            band.advance(magnitudes, rate, auto_max);
        }
        self.values()
    }

    /// Zero every band's running maximum.
    pub fn reset_peaks(&mut self) {
        for band in &mut self.bands {
            band.peak = 0.0;
        }
    }

    pub fn apply(&mut self, command: BandCommand) -> Result<()> {
        match command {
            BandCommand::MoveEdge { band, edge, step } => {
                self.band(band)?;
                let b = &mut self.bands[band];
                let (mut bottom, mut top) = (b.bottom, b.top);
                let slot = match edge {
                    BandEdge::Bottom => &mut bottom,
                    BandEdge::Top => &mut top,
                };
                *slot = match step {
                    Step::Up => *slot + 1,
                    Step::Down => slot.saturating_sub(1),
                };
                if bottom >= top {
                    return Err(Error::InvalidBand { bottom, top });
                }
                b.bottom = bottom;
                b.top = top;
            }
            BandCommand::NudgeRange {
                band,
                endpoint,
                step,
            } => {
                self.band(band)?;
                let delta = self.step * step.sign();
                let b = &mut self.bands[band];
                let field = match endpoint {
                    RangeEndpoint::InputMin => &mut b.in_min,
                    RangeEndpoint::InputMax => &mut b.in_max,
                    RangeEndpoint::OutputMin => &mut b.out_min,
                    RangeEndpoint::OutputMax => &mut b.out_max,
                };
                *field += delta;
            }
            BandCommand::ToggleSmoothing => self.smoothing = !self.smoothing,
            BandCommand::NudgeSmoothRate(step) => {
                if self.smoothing {
                    self.smooth_rate = (self.smooth_rate + self.step * step.sign()).clamp(0.0, 1.0);
                }
            }
            BandCommand::ToggleAutoMax => self.auto_max = !self.auto_max,
            BandCommand::ResetPeaks => self.reset_peaks(),
        }
        Ok(())
    }
}
