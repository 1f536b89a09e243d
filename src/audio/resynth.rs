use anyhow::{Context, Result};
use bandscope::SpectrumEngine;
use std::path::Path;

use super::frames::FrameSpectrum;

/// Overlap-add every frame's magnitude/phase back into a signal of `len` samples.
pub fn resynthesize(
    frames: &[FrameSpectrum],
    engine: &SpectrumEngine,
    window_size: usize,
    len: usize,
) -> Result<Vec<f32>> {
    let mut out = vec![0.0f32; len];
    for frame in frames {
        engine
            .inverse_power_spectrum(
                &frame.spectrum.magnitude,
                &frame.spectrum.phase,
                window_size,
                &mut out,
                frame.start,
            )
            .with_context(|| format!("Inverse spectrum failed at sample {}", frame.start))?;
    }
    Ok(out)
}

pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &s in samples {
        writer.write_sample(s).context("Failed to write WAV sample")?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    log::info!(
        "Wrote {} resynthesized samples to {}",
        samples.len(),
        path.display()
    );
    Ok(())
}
