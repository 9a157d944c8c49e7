const SIZE_BITS: u32 = usize::BITS;

/// True iff `value` is a nonzero power of two.
#[inline(always)]
pub const fn is_pow2(value: usize) -> bool {
  value != 0 && (value & (value - 1)) == 0
}

/// Floor of the base-2 logarithm. Zero maps to zero.
#[inline(always)]
pub const fn log2_floor(value: usize) -> u8 {
  (SIZE_BITS - 1).saturating_sub(value.leading_zeros()) as u8
}

/// Ceiling of the base-2 logarithm.
///
/// Defined for the whole `usize` range: `log2_ceil(usize::MAX)` is
/// `usize::BITS`, which is one past the last representable power.
#[inline(always)]
pub const fn log2_ceil(value: usize) -> u8 {
  if value <= 1 {
    return 0;
  }
  (SIZE_BITS - (value - 1).leading_zeros()) as u8
}

/// `2^power`. `power` must be below `usize::BITS`.
#[inline(always)]
pub const fn pow2(power: u8) -> usize {
  debug_assert!((power as u32) < SIZE_BITS);
  1usize << power
}

pub const fn is_aligned(value: usize, align: usize) -> Option<bool> {
  if !align.is_power_of_two() {
    return None;
  }
  Some((value & (align - 1)) == 0)
}

pub const fn align_up(value: usize, align: usize) -> Option<usize> {
  if !align.is_power_of_two() {
    return None;
  }

  let mask = align - 1;
  if let Some(sum) = value.checked_add(mask) {
    return Some(sum & !mask);
  }

  None
}

pub const fn align_offset(addr: usize, align: usize) -> Option<usize> {
  if !align.is_power_of_two() {
    return None;
  }

  match align_up(addr, align) {
    Some(aligned) => Some(aligned - addr),
    None => None,
  }
}
