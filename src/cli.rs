use bandscope::{BandCommand, WindowKind};
use clap::Parser;
use std::path::PathBuf;

use crate::audio::decode::Channel;

#[derive(Parser, Debug)]
#[command(name = "bandscope", about = "Four-band spectral energy tracker for audio files")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Config file (defaults to ./bandscope.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Analysis window length in samples (power of two)
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Samples between consecutive windows (defaults to the window size)
    #[arg(long)]
    pub hop_size: Option<usize>,

    /// Taper applied to each window: rectangular, bartlett, hamming, hann
    #[arg(long)]
    pub window: Option<WindowKind>,

    /// Channel to analyse
    #[arg(long, value_enum)]
    pub channel: Option<Channel>,

    /// Smooth band values across frames
    #[arg(long)]
    pub smoothing: bool,

    /// Weight of the newest frame when smoothing (0.0-1.0)
    #[arg(long)]
    pub smooth_rate: Option<f32>,

    /// Raise each band's input ceiling to the loudest level seen
    #[arg(long)]
    pub auto_max: bool,

    /// Tracker adjustment applied before analysis, e.g. band0.top+ or band2.out-max-
    #[arg(long = "command", value_name = "CMD")]
    pub commands: Vec<BandCommand>,

    /// Write per-frame JSON lines here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overlap-add the analysed frames back into a WAV file
    #[arg(long)]
    pub resynth: Option<PathBuf>,

    /// List available window functions and exit
    #[arg(long)]
    pub list_windows: bool,
}
