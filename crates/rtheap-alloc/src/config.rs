use rtheap_sys::prelude::*;

/// Alignment of every returned pointer and every fragment.
///
/// Four words: enough for a fragment header (two links, the size and the
/// used flag) rounded to a power of two.
pub const ALIGNMENT: usize = word_width() * 4;

pub const FRAGMENT_SIZE_MIN: usize = ALIGNMENT * 2;

pub const FRAGMENT_SIZE_MAX: usize = (usize::MAX >> 1) + 1;

/// One bin per bit of the size type.
pub const BINS: usize = size_bits();

pub const MIN_BIN: u8 = log2_floor(FRAGMENT_SIZE_MIN);

pub const MAX_BIN: u8 = log2_floor(FRAGMENT_SIZE_MAX);

const _: () = assert!(is_pow2(ALIGNMENT));
const _: () = assert!(is_pow2(FRAGMENT_SIZE_MIN));
const _: () = assert!(is_pow2(FRAGMENT_SIZE_MAX));
const _: () = assert!((MAX_BIN as usize) < BINS);
