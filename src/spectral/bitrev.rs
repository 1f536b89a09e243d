//! Bit-reversal permutation tables.
//!
//! Tables for widths 1..=[`MAX_FAST_BITS`] are built once, on first use, and
//! shared read-only for the life of the process. Wider transforms reverse
//! each index directly.

use std::sync::OnceLock;

use crate::error::Result;

use super::check_size;

/// Widest index width served from the cached tables
pub const MAX_FAST_BITS: u32 = 16;

static TABLES: OnceLock<Vec<Box<[u32]>>> = OnceLock::new();

/// Reverse the lowest `bits` bits of `index`.
pub fn reverse_bits(mut index: usize, bits: u32) -> usize {
    let mut rev = 0;
    for _ in 0..bits {
        rev = (rev << 1) | (index & 1);
        index >>= 1;
    }
    rev
}

/// Number of index bits for a transform of `size` points.
pub fn bits_needed(size: usize) -> Result<u32> {
    check_size(size)?;
    Ok(size.trailing_zeros())
}

/// Build the shared tables if nobody has yet. Safe to call any number of
/// times from any thread.
pub fn init() {
    tables();
}

fn tables() -> &'static [Box<[u32]>] {
    TABLES.get_or_init(|| {
        log::debug!("Building bit-reversal tables for 1..={} bits", MAX_FAST_BITS);
        (1..=MAX_FAST_BITS)
            .map(|bits| {
                (0..1usize << bits)
                    .map(|i| reverse_bits(i, bits) as u32)
                    .collect()
            })
            .collect()
    })
}

/// Cached permutation for `bits`-wide indices, if that width is cached.
pub fn table(bits: u32) -> Option<&'static [u32]> {
    if bits == 0 || bits > MAX_FAST_BITS {
        return None;
    }
    Some(&tables()[bits as usize - 1])
}

/// Reverse `index` using the cached table when the width allows it.
pub fn fast_reverse_bits(index: usize, bits: u32) -> usize {
    match table(bits) {
        Some(t) => t[index] as usize,
        None => reverse_bits(index, bits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn reverses_three_bit_indices() {
        let expected = [0, 4, 2, 6, 1, 5, 3, 7];
        for (i, &e) in expected.iter().enumerate() {
            assert_eq!(reverse_bits(i, 3), e);
            assert_eq!(fast_reverse_bits(i, 3), e);
        }
    }

    #[test]
    fn reversal_is_an_involution_for_every_cached_width() {
        for bits in 1..=MAX_FAST_BITS {
            let t = table(bits).unwrap();
            assert_eq!(t.len(), 1 << bits);
            for i in 0..t.len() {
                let once = t[i] as usize;
                assert_eq!(t[once] as usize, i, "bits={bits} i={i}");
            }
        }
    }

    #[test]
    fn wide_indices_fall_back_to_direct_reversal() {
        assert!(table(MAX_FAST_BITS + 1).is_none());
        let bits = MAX_FAST_BITS + 2;
        for i in [0usize, 1, 12345, (1 << bits) - 1] {
            let r = fast_reverse_bits(i, bits);
            assert_eq!(fast_reverse_bits(r, bits), i);
        }
        assert_eq!(fast_reverse_bits(1, bits), 1 << (bits - 1));
    }

    #[test]
    fn init_is_idempotent_across_threads() {
        let handles: Vec<_> = (0..4).map(|_| std::thread::spawn(init)).collect();
        for h in handles {
            h.join().unwrap();
        }
        init();
        assert_eq!(table(4).unwrap()[1], 8);
    }

    #[test]
    fn bits_needed_rejects_bad_sizes() {
        assert_eq!(bits_needed(2), Ok(1));
        assert_eq!(bits_needed(4096), Ok(12));
        assert_eq!(bits_needed(3), Err(Error::InvalidSize { size: 3 }));
        assert_eq!(bits_needed(1), Err(Error::InvalidSize { size: 1 }));
        assert_eq!(bits_needed(0), Err(Error::InvalidSize { size: 0 }));
    }
}
