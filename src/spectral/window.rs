use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Amplitude taper applied to a segment before a forward transform and
/// after an inverse one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Rectangular,
    /// Triangular ramp up to the midpoint and back down
    Bartlett,
    /// Raised cosine, 0.54 - 0.46 cos
    Hamming,
    /// Raised cosine, 0.5 - 0.5 cos
    #[default]
    Hann,
}

impl WindowKind {
    pub const ALL: [WindowKind; 4] = [
        WindowKind::Rectangular,
        WindowKind::Bartlett,
        WindowKind::Hamming,
        WindowKind::Hann,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Bartlett => "bartlett",
            WindowKind::Hamming => "hamming",
            WindowKind::Hann => "hann",
        }
    }

    /// Scale `samples` in place.
    pub fn apply(self, samples: &mut [f32]) {
        let n = samples.len();
        match self {
            WindowKind::Rectangular => {}
            WindowKind::Bartlett => {
                let half = n / 2;
                for i in 0..half {
                    let ramp = i as f32 / half as f32;
                    samples[i] *= ramp;
                    samples[i + half] *= 1.0 - ramp;
                }
            }
            WindowKind::Hamming => raised_cosine(samples, 0.54, 0.46),
            WindowKind::Hann => raised_cosine(samples, 0.50, 0.50),
        }
    }
}

fn raised_cosine(samples: &mut [f32], a0: f64, a1: f64) {
    let n = samples.len();
    if n < 2 {
        return;
    }
    let denom = (n - 1) as f64;
    for (i, s) in samples.iter_mut().enumerate() {
        *s *= (a0 - a1 * (2.0 * PI * i as f64 / denom).cos()) as f32;
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "rectangular" | "rect" | "none" => Ok(WindowKind::Rectangular),
            "bartlett" | "triangular" => Ok(WindowKind::Bartlett),
            "hamming" => Ok(WindowKind::Hamming),
            "hann" | "hanning" => Ok(WindowKind::Hann),
            _ => Err(format!(
                "unknown window '{}' (expected one of: {})",
                s,
                WindowKind::ALL.map(WindowKind::name).join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_leaves_buffer_untouched() {
        let original: Vec<f32> = (0..37).map(|i| (i as f32 * 0.3).sin() * 5.0).collect();
        let mut buf = original.clone();
        WindowKind::Rectangular.apply(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn bartlett_ramps_up_then_down() {
        let mut buf = vec![1.0f32; 8];
        WindowKind::Bartlett.apply(&mut buf);
        assert_eq!(buf, vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25]);
    }

    #[test]
    fn raised_cosines_have_expected_edges_and_peak() {
        let n = 1025;
        let mut hann = vec![1.0f32; n];
        WindowKind::Hann.apply(&mut hann);
        assert!(hann[0].abs() < 1e-6);
        assert!(hann[n - 1].abs() < 1e-6);
        assert!((hann[n / 2] - 1.0).abs() < 1e-6);

        let mut hamming = vec![1.0f32; n];
        WindowKind::Hamming.apply(&mut hamming);
        assert!((hamming[0] - 0.08).abs() < 1e-6);
        assert!((hamming[n / 2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn raised_cosines_are_symmetric() {
        for kind in [WindowKind::Hann, WindowKind::Hamming] {
            let mut buf = vec![1.0f32; 64];
            kind.apply(&mut buf);
            for i in 0..32 {
                assert!((buf[i] - buf[63 - i]).abs() < 1e-6, "{kind} i={i}");
            }
        }
    }

    #[test]
    fn tiny_buffers_do_not_produce_nan() {
        for kind in WindowKind::ALL {
            let mut one = [2.0f32];
            kind.apply(&mut one);
            assert!(one[0].is_finite());
            let mut empty: [f32; 0] = [];
            kind.apply(&mut empty);
        }
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("Hanning".parse::<WindowKind>(), Ok(WindowKind::Hann));
        assert_eq!("triangular".parse::<WindowKind>(), Ok(WindowKind::Bartlett));
        for kind in WindowKind::ALL {
            assert_eq!(kind.name().parse::<WindowKind>(), Ok(kind));
        }
        assert!("blackman".parse::<WindowKind>().is_err());
    }
}
