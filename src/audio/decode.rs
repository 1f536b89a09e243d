use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Which part of a multi-channel stream feeds the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Left,
    Right,
    /// Average of all channels
    Mix,
}

pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

pub fn decode_audio(path: &Path, channel: Channel) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        buf.copy_interleaved_ref(decoded);

        select_channel(buf.samples(), channels, channel, &mut samples);
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {} channel(s), using {:?}",
        samples.len(),
        sample_rate,
        channels,
        channel
    );

    Ok(AudioData {
        samples,
        sample_rate,
    })
}

/// Append one channel (or the mix) of interleaved `input` to `out`.
fn select_channel(input: &[f32], channels: usize, channel: Channel, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(input);
        return;
    }
    for frame in input.chunks_exact(channels) {
        let sample = match channel {
            Channel::Left => frame[0],
            Channel::Right => frame[1],
            Channel::Mix => frame.iter().sum::<f32>() / channels as f32,
        };
        out.push(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_channels_from_interleaved_frames() {
        let stereo = [1.0, -1.0, 0.5, 0.25, 0.0, 1.0];
        let mut left = Vec::new();
        select_channel(&stereo, 2, Channel::Left, &mut left);
        assert_eq!(left, vec![1.0, 0.5, 0.0]);

        let mut right = Vec::new();
        select_channel(&stereo, 2, Channel::Right, &mut right);
        assert_eq!(right, vec![-1.0, 0.25, 1.0]);

        let mut mix = Vec::new();
        select_channel(&stereo, 2, Channel::Mix, &mut mix);
        assert_eq!(mix, vec![0.0, 0.375, 0.5]);
    }

    #[test]
    fn mono_passes_through_whatever_the_channel() {
        let mono = [0.1, 0.2, 0.3];
        let mut out = vec![9.0];
        select_channel(&mono, 1, Channel::Right, &mut out);
        assert_eq!(out, vec![9.0, 0.1, 0.2, 0.3]);
    }
}
