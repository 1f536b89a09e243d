//! Iterative radix-2 decimation-in-time FFT over split real/imaginary arrays.
//!
//! Forward uses `X[k] = sum x[n] e^{-2 pi i k n / N}`; the inverse flips the
//! exponent sign and divides by `N`. Single precision works well up to about
//! 8192 points; past that rounding in the twiddle recurrence adds up and doubles are needed.

use std::f64::consts::PI;

use crate::error::Result;

use super::{bitrev, check_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Transform `real_in`/`imag_in` into `real_out`/`imag_out`.
///
/// All slices must have the same power-of-two length. `imag_in = None` is
/// treated as an all-zero imaginary input.
pub fn fft(
    direction: Direction,
    real_in: &[f32],
    imag_in: Option<&[f32]>,
    real_out: &mut [f32],
    imag_out: &mut [f32],
) -> Result<()> {
    let n = real_in.len();
    let bits = bitrev::bits_needed(n)?;
    if let Some(imag) = imag_in {
        check_len("imaginary input", imag.len(), n)?;
    }
    check_len("real output", real_out.len(), n)?;
    check_len("imaginary output", imag_out.len(), n)?;

    // Copy into place in bit-reversed order
    for i in 0..n {
        let j = bitrev::fast_reverse_bits(i, bits);
        real_out[j] = real_in[i];
        imag_out[j] = imag_in.map_or(0.0, |imag| imag[i]);
    }

    let angle_numerator = match direction {
        Direction::Forward => -2.0 * PI,
        Direction::Inverse => 2.0 * PI,
    };

    let mut block_end = 1;
    let mut block_size = 2;
    while block_size <= n {
        let delta = angle_numerator / block_size as f64;

        // Angle-addition step w <- w * e^{i delta}, written as w + w * (wpr + i wpi)
        // with wpr = cos(delta) - 1 so the increment stays small.
        let half_sin = (0.5 * delta).sin();
        let wpr = (-2.0 * half_sin * half_sin) as f32;
        let wpi = delta.sin() as f32;

        for start in (0..n).step_by(block_size) {
            let (mut wr, mut wi) = (1.0f32, 0.0f32);

            for j in start..start + block_end {
                let k = j + block_end;
                let tr = wr * real_out[k] - wi * imag_out[k];
                let ti = wr * imag_out[k] + wi * real_out[k];

                real_out[k] = real_out[j] - tr;
                imag_out[k] = imag_out[j] - ti;
                real_out[j] += tr;
                imag_out[j] += ti;

                let prev = wr;
                wr += wr * wpr - wi * wpi;
                wi += wi * wpr + prev * wpi;
            }
        }

        block_end = block_size;
        block_size <<= 1;
    }

    if direction == Direction::Inverse {
        let denom = n as f32;
        for (re, im) in real_out.iter_mut().zip(imag_out.iter_mut()) {
            *re /= denom;
            *im /= denom;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rustfft::{num_complex::Complex, FftPlanner};

    fn signal(n: usize) -> (Vec<f32>, Vec<f32>) {
        let re = (0..n)
            .map(|i| ((i * 7 + 3) % 11) as f32 / 11.0 - 0.5)
            .collect();
        let im = (0..n)
            .map(|i| ((i * 5 + 1) % 13) as f32 / 13.0 - 0.5)
            .collect();
        (re, im)
    }

    #[test]
    fn matches_rustfft_forward() {
        let mut planner = FftPlanner::<f32>::new();
        for bits in 1..=10 {
            let n = 1usize << bits;
            let (re, im) = signal(n);
            let mut out_re = vec![0.0; n];
            let mut out_im = vec![0.0; n];
            fft(Direction::Forward, &re, Some(&im), &mut out_re, &mut out_im).unwrap();

            let mut reference: Vec<Complex<f32>> =
                re.iter().zip(&im).map(|(&r, &i)| Complex::new(r, i)).collect();
            planner.plan_fft_forward(n).process(&mut reference);

            let tol = 1e-4 * n as f32;
            for k in 0..n {
                assert!((out_re[k] - reference[k].re).abs() < tol, "n={n} k={k}");
                assert!((out_im[k] - reference[k].im).abs() < tol, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn round_trip_restores_input() {
        let mut n = 2;
        while n <= 4096 {
            let (re, im) = signal(n);
            let mut f_re = vec![0.0; n];
            let mut f_im = vec![0.0; n];
            fft(Direction::Forward, &re, Some(&im), &mut f_re, &mut f_im).unwrap();
            let mut b_re = vec![0.0; n];
            let mut b_im = vec![0.0; n];
            fft(Direction::Inverse, &f_re, Some(&f_im), &mut b_re, &mut b_im).unwrap();

            for i in 0..n {
                assert!((b_re[i] - re[i]).abs() < 1e-3, "n={n} i={i}");
                assert!((b_im[i] - im[i]).abs() < 1e-3, "n={n} i={i}");
            }
            n <<= 1;
        }
    }

    #[test]
    fn two_point_transform_is_a_single_butterfly() {
        let mut re = [0.0; 2];
        let mut im = [0.0; 2];
        fft(Direction::Forward, &[3.0, 1.0], None, &mut re, &mut im).unwrap();
        assert!((re[0] - 4.0).abs() < 1e-6);
        assert!((re[1] - 2.0).abs() < 1e-6);
        assert!(im[0].abs() < 1e-6 && im[1].abs() < 1e-6);
    }

    #[test]
    fn missing_imaginary_input_is_zero() {
        let (re, _) = signal(64);
        let zeros = vec![0.0; 64];
        let mut a = (vec![0.0; 64], vec![0.0; 64]);
        let mut b = (vec![0.0; 64], vec![0.0; 64]);
        fft(Direction::Forward, &re, None, &mut a.0, &mut a.1).unwrap();
        fft(Direction::Forward, &re, Some(&zeros), &mut b.0, &mut b.1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_power_of_two_without_writing() {
        let mut re = [7.0; 3];
        let mut im = [7.0; 3];
        let err = fft(Direction::Forward, &[1.0, 2.0, 3.0], None, &mut re, &mut im);
        assert_eq!(err, Err(Error::InvalidSize { size: 3 }));
        assert_eq!(re, [7.0; 3]);
        assert_eq!(im, [7.0; 3]);
    }

    #[test]
    fn rejects_mismatched_outputs() {
        let mut re = [0.0; 4];
        let mut im = [0.0; 2];
        let err = fft(Direction::Forward, &[0.0; 4], None, &mut re, &mut im);
        assert!(matches!(err, Err(Error::LengthMismatch { expected: 4, actual: 2, .. })));
    }
}
