//! FFT of real input through a half-size complex transform.
//!
//! The `N` real samples are packed as `N/2` complex values (even samples in
//! the real part, odd in the imaginary part), transformed, then split back
//! into the spectra of the even and odd halves and recombined. Only the
//! non-redundant bins `0..N/2` are produced.

use std::f64::consts::PI;

use crate::error::{Error, Result};

use super::complex::{fft, Direction};
use super::{check_len, check_size};

fn check_real_size(size: usize) -> Result<usize> {
    check_size(size)?;
    let half = size / 2;
    // the packed transform needs at least two points
    if half < 2 {
        return Err(Error::InvalidSize { size });
    }
    Ok(half)
}

/// Spectrum of `input` (length `N`) into `real_out`/`imag_out` (length `N/2`).
///
/// `N` must be a power of two and at least 4.
pub fn real_fft(input: &[f32], real_out: &mut [f32], imag_out: &mut [f32]) -> Result<()> {
    let half = check_real_size(input.len())?;
    check_len("real output", real_out.len(), half)?;
    check_len("imaginary output", imag_out.len(), half)?;

    let even: Vec<f32> = input.iter().step_by(2).copied().collect();
    let odd: Vec<f32> = input.iter().skip(1).step_by(2).copied().collect();
    fft(Direction::Forward, &even, Some(&odd), real_out, imag_out)?;

    let theta = PI / half as f64;
    let wtemp = (0.5 * theta).sin();
    let wpr = (-2.0 * wtemp * wtemp) as f32;
    let wpi = -theta.sin() as f32;
    let mut wr = 1.0 + wpr;
    let mut wi = wpi;

    for i in 1..half / 2 {
        let i3 = half - i;

        let h1r = 0.5 * (real_out[i] + real_out[i3]);
        let h1i = 0.5 * (imag_out[i] - imag_out[i3]);
        let h2r = 0.5 * (imag_out[i] + imag_out[i3]);
        let h2i = -0.5 * (real_out[i] - real_out[i3]);

        real_out[i] = h1r + wr * h2r - wi * h2i;
        imag_out[i] = h1i + wr * h2i + wi * h2r;
        real_out[i3] = h1r - wr * h2r + wi * h2i;
        imag_out[i3] = -h1i + wr * h2i + wi * h2r;

        let prev = wr;
        wr += wr * wpr - wi * wpi;
        wi += wi * wpr + prev * wpi;
    }

    // DC is the sum of both packed halves and has no imaginary part.
    real_out[0] += imag_out[0];
    imag_out[0] = 0.0;
    // The quarter bin is its own partner: the recombined value is the conjugate.
    imag_out[half / 2] = -imag_out[half / 2];

    Ok(())
}

/// Power (`re^2 + im^2`) of each non-redundant bin of `input` into `out`
/// (length `N/2`), discarding phase.
pub fn real_power_spectrum(input: &[f32], out: &mut [f32]) -> Result<()> {
    let half = check_real_size(input.len())?;
    check_len("power output", out.len(), half)?;

    let mut imag = vec![0.0f32; half];
    real_fft(input, out, &mut imag)?;
    for (p, im) in out.iter_mut().zip(&imag) {
        *p = *p * *p + im * im;
    }
    Ok(())
}
