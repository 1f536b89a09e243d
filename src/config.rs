use anyhow::{Context, Result};
use bandscope::{Band, BandTracker, WindowKind, BAND_COUNT};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::decode::Channel;
use crate::cli::Cli;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default = "default_bands")]
    pub bands: Vec<BandConfig>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Defaults to `window_size`
    #[serde(default)]
    pub hop_size: Option<usize>,
    #[serde(default)]
    pub window: WindowKind,
    #[serde(default)]
    pub channel: Channel,
}

#[derive(Debug, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub smoothing: bool,
    #[serde(default = "default_smooth_rate")]
    pub smooth_rate: f32,
    #[serde(default)]
    pub auto_max: bool,
    #[serde(default = "default_step")]
    pub step: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BandConfig {
    pub bottom: usize,
    pub top: usize,
    #[serde(default)]
    pub in_min: f32,
    pub in_max: f32,
    #[serde(default)]
    pub out_min: f32,
    pub out_max: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            tracker: TrackerConfig::default(),
            bands: default_bands(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            hop_size: None,
            window: WindowKind::default(),
            channel: Channel::default(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smoothing: false,
            smooth_rate: default_smooth_rate(),
            auto_max: false,
            step: default_step(),
        }
    }
}

fn default_window_size() -> usize { 256 }
fn default_smooth_rate() -> f32 { bandscope::tracker::band::DEFAULT_SMOOTH_RATE }
fn default_step() -> f32 { bandscope::tracker::band::DEFAULT_STEP }

fn default_bands() -> Vec<BandConfig> {
    BandTracker::default()
        .bands()
        .iter()
        .map(|b| BandConfig {
            bottom: b.bottom(),
            top: b.top(),
            in_min: b.in_min,
            in_max: b.in_max,
            out_min: b.out_min,
            out_max: b.out_max,
        })
        .collect()
}

impl Config {
    /// Overlay flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(size) = cli.window_size {
            self.analysis.window_size = size;
        }
        if let Some(hop) = cli.hop_size {
            self.analysis.hop_size = Some(hop);
        }
        if let Some(window) = cli.window {
            self.analysis.window = window;
        }
        if let Some(channel) = cli.channel {
            self.analysis.channel = channel;
        }
        if cli.smoothing {
            self.tracker.smoothing = true;
        }
        if let Some(rate) = cli.smooth_rate {
            self.tracker.smooth_rate = rate;
        }
        if cli.auto_max {
            self.tracker.auto_max = true;
        }
    }

    pub fn hop_size(&self) -> usize {
        self.analysis.hop_size.unwrap_or(self.analysis.window_size)
    }

    /// Check sizes that would otherwise only fail once decoding is done.
    pub fn validate(&self) -> Result<()> {
        let size = self.analysis.window_size;
        if size < 4 || !size.is_power_of_two() {
            anyhow::bail!("window_size must be a power of two >= 4, got {}", size);
        }
        if self.hop_size() == 0 {
            anyhow::bail!("hop_size must be positive");
        }
        if !(0.0..=1.0).contains(&self.tracker.smooth_rate) {
            anyhow::bail!("smooth_rate must be within 0.0-1.0, got {}", self.tracker.smooth_rate);
        }
        let bins = size / 2;
        for (i, b) in self.bands.iter().enumerate() {
            if b.top > bins {
                anyhow::bail!(
                    "band {} ends at bin {} but a {}-sample window has only {} bins",
                    i,
                    b.top,
                    size,
                    bins
                );
            }
        }
        Ok(())
    }

    pub fn build_tracker(&self) -> Result<BandTracker> {
        if self.bands.len() != BAND_COUNT {
            anyhow::bail!(
                "expected {} [[bands]] entries, found {}",
                BAND_COUNT,
                self.bands.len()
            );
        }
        let mut bands = Vec::with_capacity(BAND_COUNT);
        for (i, b) in self.bands.iter().enumerate() {
            let band = Band::new(b.bottom, b.top, (b.in_min, b.in_max), (b.out_min, b.out_max))
                .with_context(|| format!("invalid band {}", i))?;
            bands.push(band);
        }
        let bands: [Band; BAND_COUNT] = bands
            .try_into()
            .map_err(|_| anyhow::anyhow!("band count changed while building tracker"))?;

        Ok(BandTracker::new(bands)
            .with_smoothing(self.tracker.smoothing, self.tracker.smooth_rate)
            .with_auto_max(self.tracker.auto_max)
            .with_step(self.tracker.step))
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// `./bandscope.toml`, then `<config dir>/bandscope/config.toml`.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("bandscope.toml");
    if local.exists() {
        return Some(local);
    }
    let platform = dirs::config_dir()?.join("bandscope").join("config.toml");
    platform.exists().then_some(platform)
}
