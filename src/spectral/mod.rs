//! Transforms and spectra for real-valued signals.
//!
//! Sizes and buffer lengths are checked here before any transform touches
//! its outputs.

pub mod bitrev;
pub mod complex;
pub mod power;
pub mod real;
pub mod window;

use crate::error::{Error, Result};

/// Check that `size` is a usable transform length.
pub(crate) fn check_size(size: usize) -> Result<()> {
    if size < 2 || !size.is_power_of_two() {
        return Err(Error::InvalidSize { size });
    }
    Ok(())
}

pub(crate) fn check_len(what: &'static str, slice_len: usize, expected: usize) -> Result<()> {
    if slice_len != expected {
        return Err(Error::LengthMismatch {
            what,
            expected,
            actual: slice_len,
        });
    }
    Ok(())
}
