//! Spectral analysis engine for real-valued audio.
//!
//! A radix-2 FFT specialised for real input, a power-spectrum front end with
//! an overlap-add inverse, and a four-band tracker that turns bin magnitudes
//! into smoothed, auto-ranging control values.

pub mod error;
pub mod spectral;
pub mod tracker;

pub use error::{Error, Result};
pub use spectral::power::{Spectrum, SpectrumEngine};
pub use spectral::window::WindowKind;
pub use tracker::band::{Band, BandTracker, BAND_COUNT};
pub use tracker::command::{BandCommand, BandEdge, RangeEndpoint, Step};
