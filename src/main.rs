mod audio;
mod cli;
mod config;

use anyhow::{Context, Result};
use bandscope::{SpectrumEngine, WindowKind};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_windows {
        println!("Available windows:");
        for kind in WindowKind::ALL {
            let marker = if kind == WindowKind::default() { " (default)" } else { "" };
            println!("  {}{}", kind, marker);
        }
        return Ok(());
    }

    let mut cfg = match cli.config.clone().or_else(config::find_config) {
        Some(path) => {
            let cfg = config::load_config(&path)?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => Config::default(),
    };
    cfg.apply_cli(&cli);
    cfg.validate()?;

    let mut tracker = cfg.build_tracker()?;
    for command in &cli.commands {
        tracker
            .apply(*command)
            .with_context(|| format!("Failed to apply {:?}", command))?;
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let window_size = cfg.analysis.window_size;
    let hop_size = cfg.hop_size();
    let engine = SpectrumEngine::new(cfg.analysis.window);

    log::info!("bandscope - four-band spectral tracker");
    log::info!("Input: {}", input.display());
    log::info!(
        "Smoothing: {} (rate {:.2}), auto-max: {}",
        tracker.smoothing(),
        tracker.smooth_rate(),
        tracker.auto_max()
    );

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_audio(input, cfg.analysis.channel)?;
    if audio_data.samples.len() < window_size {
        log::warn!(
            "Input has {} samples, shorter than one {}-sample window",
            audio_data.samples.len(),
            window_size
        );
    }

    // 2. Analyze and stream per-frame reports
    let mut sink: Box<dyn Write> = match cli.output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let expected_frames =
        audio::analysis::frame_starts(audio_data.samples.len(), window_size, hop_size).len();
    let pb = ProgressBar::new(expected_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let (summary, frames) = audio::analysis::analyze(
        &audio_data,
        &engine,
        window_size,
        hop_size,
        &mut tracker,
        |report| {
            serde_json::to_writer(&mut sink, report).context("Failed to serialize frame")?;
            sink.write_all(b"\n").context("Failed to write frame")?;
            pb.inc(1);
            Ok(())
        },
    )?;
    sink.flush().context("Failed to flush output")?;
    pb.finish_with_message("Analysis complete");

    log::info!(
        "Frames: {}, published: {}, duration: {:.1}s",
        summary.frames,
        summary.published,
        summary.duration
    );
    log::info!("Input ceilings after run: {:?}", summary.in_max);

    // 3. Optional overlap-add resynthesis
    if let Some(ref path) = cli.resynth {
        log::info!("Resynthesizing {} frames...", frames.len());
        let signal = audio::resynth::resynthesize(
            &frames,
            &engine,
            window_size,
            audio_data.samples.len(),
        )?;
        audio::resynth::write_wav(path, &signal, audio_data.sample_rate)?;
    }

    log::info!("Done!");
    Ok(())
}
