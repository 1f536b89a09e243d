use anyhow::{Context, Result};
use bandscope::{BandTracker, Spectrum, SpectrumEngine};
use rayon::prelude::*;

use super::decode::AudioData;
use super::frames::{AnalysisSummary, FrameReport, FrameSpectrum};

/// Window starts for every full window of `window_size` samples, `hop_size` apart.
pub fn frame_starts(len: usize, window_size: usize, hop_size: usize) -> Vec<usize> {
    if len < window_size || hop_size == 0 {
        return Vec::new();
    }
    (0..=len - window_size).step_by(hop_size).collect()
}

/// Pass 1: power spectrum of every window. Frames are independent, so they
/// are computed in parallel.
pub fn pass1_spectra(
    samples: &[f32],
    engine: &SpectrumEngine,
    window_size: usize,
    hop_size: usize,
) -> Result<Vec<FrameSpectrum>> {
    bandscope::spectral::bitrev::init();

    let bins = window_size / 2;
    frame_starts(samples.len(), window_size, hop_size)
        .into_par_iter()
        .map(|start| {
            let mut spectrum = Spectrum::new(bins);
            engine
                .power_spectrum(samples, start, window_size, &mut spectrum)
                .with_context(|| format!("Power spectrum failed at sample {}", start))?;
            Ok(FrameSpectrum { start, spectrum })
        })
        .collect()
}

/// Pass 2: run the band tracker over the frames in order, handing each
/// report to `emit`.
pub fn pass2_track<F>(
    frames: &[FrameSpectrum],
    tracker: &mut BandTracker,
    sample_rate: u32,
    mut emit: F,
) -> Result<AnalysisSummary>
where
    F: FnMut(&FrameReport) -> Result<()>,
{
    let mut published = 0;

    for (i, frame) in frames.iter().enumerate() {
        let bands = tracker.update(&frame.spectrum.magnitude);
        let publish = tracker.any_active();
        if publish {
            published += 1;
        }

        emit(&FrameReport {
            frame: i,
            time: frame.start as f32 / sample_rate as f32,
            avg_power: frame.spectrum.avg_power,
            bands,
            publish,
        })?;
    }

    let peak_levels = std::array::from_fn(|i| tracker.bands()[i].peak());
    let in_max = std::array::from_fn(|i| tracker.bands()[i].in_max);
    Ok(AnalysisSummary {
        frames: frames.len(),
        published,
        duration: 0.0,
        peak_levels,
        in_max,
    })
}

pub fn analyze<F>(
    audio: &AudioData,
    engine: &SpectrumEngine,
    window_size: usize,
    hop_size: usize,
    tracker: &mut BandTracker,
    emit: F,
) -> Result<(AnalysisSummary, Vec<FrameSpectrum>)>
where
    F: FnMut(&FrameReport) -> Result<()>,
{
    log::info!(
        "Pass 1: Power spectra (window={}, hop={}, {})...",
        window_size,
        hop_size,
        engine.window()
    );
    let frames = pass1_spectra(&audio.samples, engine, window_size, hop_size)?;

    log::info!("Pass 2: Band tracking ({} frames)...", frames.len());
    let mut summary = pass2_track(&frames, tracker, audio.sample_rate, emit)?;
    summary.duration = audio.duration();

    log::info!(
        "Tracked {} frames, {} published, peaks={:?}",
        summary.frames,
        summary.published,
        summary.peak_levels
    );
    Ok((summary, frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandscope::WindowKind;
    use std::f32::consts::PI;

    #[test]
    fn frame_starts_cover_full_windows_only() {
        assert_eq!(frame_starts(1000, 256, 256), vec![0, 256, 512]);
        assert_eq!(frame_starts(1024, 256, 128).len(), 7);
        assert_eq!(frame_starts(100, 256, 256), Vec::<usize>::new());
        assert_eq!(frame_starts(256, 256, 256), vec![0]);
    }

    #[test]
    fn parallel_pass_matches_sequential_engine() {
        let samples: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.05).sin()).collect();
        let engine = SpectrumEngine::default();
        let frames = pass1_spectra(&samples, &engine, 256, 128).unwrap();
        assert_eq!(frames.len(), 15);
        for frame in &frames {
            let mut expected = Spectrum::new(128);
            engine
                .power_spectrum(&samples, frame.start, 256, &mut expected)
                .unwrap();
            assert_eq!(frame.spectrum, expected);
        }
    }

    #[test]
    fn tone_in_a_band_drives_only_that_band() {
        // 256-point windows: bin 5 sits inside the default [3, 10) band, and an
        // on-bin tone does not leak under a rectangular window
        let n = 256 * 8;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 5.0 * i as f32 / 256.0).sin())
            .collect();
        let audio = AudioData {
            samples,
            sample_rate: 256,
        };
        let engine = SpectrumEngine::new(WindowKind::Rectangular);
        let mut tracker = BandTracker::default();

        let mut reports = Vec::new();
        let (summary, frames) = analyze(&audio, &engine, 256, 256, &mut tracker, |r| {
            reports.push(r.clone());
            Ok(())
        })
        .unwrap();

        assert_eq!(frames.len(), 8);
        assert_eq!(summary.frames, 8);
        assert_eq!(summary.published, 8);
        assert!((summary.duration - 8.0).abs() < 1e-6);
        assert_eq!(reports[3].time, 3.0);
        for r in &reports {
            assert!(r.publish);
            assert!(r.bands[1] > 1.0, "{:?}", r.bands);
            assert!(r.bands[2].abs() < 1e-3, "{:?}", r.bands);
            assert!(r.bands[3].abs() < 1e-3, "{:?}", r.bands);
        }
    }

    #[test]
    fn emit_errors_stop_tracking() {
        let frames = vec![
            FrameSpectrum { start: 0, spectrum: Spectrum::new(128) };
            3
        ];
        let mut tracker = BandTracker::default();
        let mut seen = 0;
        let result = pass2_track(&frames, &mut tracker, 44100, |_| {
            seen += 1;
            anyhow::bail!("sink closed")
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }
}
