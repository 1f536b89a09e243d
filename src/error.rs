//! Error types for the spectral engine and band tracker

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the transforms and the band tracker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Transform size is below 2 or not a power of two
    #[error("FFT size {size} is not a power of two >= 2")]
    InvalidSize { size: usize },

    /// A caller buffer does not have the length the transform needs
    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A segment reaches past the end of the buffer it lives in
    #[error("segment of {len} samples at offset {start} exceeds buffer of {available} samples")]
    SegmentOutOfBounds {
        start: usize,
        len: usize,
        available: usize,
    },

    /// Requested more bins than the window can produce
    #[error("bin count {bins} must be between 1 and {max}")]
    InvalidBinCount { bins: usize, max: usize },

    /// Band index outside the tracker
    #[error("band index {index} out of range (have {count} bands)")]
    BandIndex { index: usize, count: usize },

    /// Band range with bottom >= top
    #[error("band range [{bottom}, {top}) is empty")]
    InvalidBand { bottom: usize, top: usize },

    /// Textual command that does not name a tracker action
    #[error("unknown band command: {0}")]
    UnknownCommand(String),
}
