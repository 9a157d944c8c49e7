use rtheap_sys::prelude::*;

use crate::config::{
  ALIGNMENT,
  FRAGMENT_SIZE_MAX,
  FRAGMENT_SIZE_MIN,
  MIN_BIN,
};

/// Bin index serving a request of `size` payload bytes, header included.
///
/// `None` for zero and for anything whose fragment would exceed
/// [`FRAGMENT_SIZE_MAX`].
#[inline]
pub const fn class_for(size: usize) -> Option<u8> {
  if size == 0 || size > FRAGMENT_SIZE_MAX - ALIGNMENT {
    return None;
  }

  let bin = log2_ceil(size + ALIGNMENT);
  if bin < MIN_BIN {
    return Some(MIN_BIN);
  }
  Some(bin)
}

/// Bin holding a fragment of exactly `size` bytes.
#[inline(always)]
pub const fn bin_of(size: usize) -> u8 {
  debug_assert!(is_pow2(size));
  log2_floor(size)
}

#[inline(always)]
pub const fn fragment_size(bin: u8) -> usize {
  pow2(bin)
}

/// Largest fragment that fits in `available` bytes, or `None` below the
/// minimum fragment size.
pub const fn capacity_for(available: usize) -> Option<usize> {
  if available < FRAGMENT_SIZE_MIN {
    return None;
  }

  let capacity = pow2(log2_floor(available));
  if capacity > FRAGMENT_SIZE_MAX {
    return Some(FRAGMENT_SIZE_MAX);
  }
  Some(capacity)
}
