//! Windowed power spectrum of a signal segment and its overlap-add inverse.

use crate::error::{Error, Result};

use super::complex::{fft, Direction};
use super::real::real_fft;
use super::window::WindowKind;
use super::{check_len, check_size};

/// Per-bin analysis of one segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    /// `2 * sqrt(power)`
    pub magnitude: Vec<f32>,
    /// `atan2(imag, real)`, in `(-pi, pi]`
    pub phase: Vec<f32>,
    /// `real^2 + imag^2`
    pub power: Vec<f32>,
    /// Mean of `power`
    pub avg_power: f32,
}

impl Spectrum {
    /// Zeroed spectrum holding `bins` bins.
    pub fn new(bins: usize) -> Self {
        Self {
            magnitude: vec![0.0; bins],
            phase: vec![0.0; bins],
            power: vec![0.0; bins],
            avg_power: 0.0,
        }
    }

    pub fn bins(&self) -> usize {
        self.magnitude.len()
    }
}

/// Stateless front end: window, real FFT, then magnitude/phase/power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpectrumEngine {
    window: WindowKind,
}

impl SpectrumEngine {
    pub fn new(window: WindowKind) -> Self {
        Self { window }
    }

    pub fn window(&self) -> WindowKind {
        self.window
    }

    /// Analyse `data[start..start + window_size]` into `spectrum`.
    ///
    /// The number of bins produced is `spectrum.bins()`, which must be
    /// between 1 and `window_size / 2`.
    pub fn power_spectrum(
        &self,
        data: &[f32],
        start: usize,
        window_size: usize,
        spectrum: &mut Spectrum,
    ) -> Result<()> {
        check_size(window_size)?;
        check_segment(start, window_size, data.len())?;
        let half = spectrum.bins();
        check_bins(half, window_size / 2)?;
        check_len("phase", spectrum.phase.len(), half)?;
        check_len("power", spectrum.power.len(), half)?;

        let mut segment = data[start..start + window_size].to_vec();
        self.window.apply(&mut segment);

        let mut out_real = vec![0.0f32; window_size / 2];
        let mut out_imag = vec![0.0f32; window_size / 2];
        real_fft(&segment, &mut out_real, &mut out_imag)?;

        let mut total_power = 0.0f32;
        for i in 0..half {
            let (re, im) = (out_real[i], out_imag[i]);
            let power = re * re + im * im;
            spectrum.power[i] = power;
            spectrum.magnitude[i] = 2.0 * power.sqrt();
            spectrum.phase[i] = im.atan2(re);
            total_power += power;
        }
        spectrum.avg_power = total_power / half as f32;

        Ok(())
    }

    /// Rebuild a windowed time-domain segment from `magnitude`/`phase` and
    /// add it into `out[start..start + window_size]`.
    ///
    /// Bins from `magnitude.len()` up to `window_size` are zeroed, so the
    /// negative-frequency half is dropped. This is an approximation for
    /// overlap-add resynthesis, not an exact inverse of [`power_spectrum`].
    ///
    /// [`power_spectrum`]: SpectrumEngine::power_spectrum
    pub fn inverse_power_spectrum(
        &self,
        magnitude: &[f32],
        phase: &[f32],
        window_size: usize,
        out: &mut [f32],
        start: usize,
    ) -> Result<()> {
        check_size(window_size)?;
        let half = magnitude.len();
        check_bins(half, window_size)?;
        check_len("phase", phase.len(), half)?;
        check_segment(start, window_size, out.len())?;

        let mut in_real = vec![0.0f32; window_size];
        let mut in_imag = vec![0.0f32; window_size];
        for (i, (&mag, &ph)) in magnitude.iter().zip(phase).enumerate() {
            in_real[i] = mag * ph.cos();
            in_imag[i] = mag * ph.sin();
        }

        let mut out_real = vec![0.0f32; window_size];
        let mut out_imag = vec![0.0f32; window_size];
        fft(
            Direction::Inverse,
            &in_real,
            Some(&in_imag),
            &mut out_real,
            &mut out_imag,
        )?;
        self.window.apply(&mut out_real);

        for (dst, v) in out[start..start + window_size].iter_mut().zip(&out_real) {
            *dst += v;
        }
        Ok(())
    }
}

fn check_segment(start: usize, len: usize, available: usize) -> Result<()> {
    match start.checked_add(len) {
        Some(end) if end <= available => Ok(()),
        _ => Err(Error::SegmentOutOfBounds {
            start,
            len,
            available,
        }),
    }
}

fn check_bins(bins: usize, max: usize) -> Result<()> {
    if bins == 0 || bins > max {
        return Err(Error::InvalidBinCount { bins, max });
    }
    Ok(())
}
