pub const fn word_width() -> usize {
  core::mem::size_of::<usize>()
}

/// Bit width of the size type, which is also the number of size classes.
pub const fn size_bits() -> usize {
  usize::BITS as usize
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_word_width() {
    assert_eq!(word_width(), core::mem::size_of::<usize>());
    assert!(word_width().is_power_of_two());
  }

  #[test]
  fn test_size_bits() {
    assert_eq!(size_bits(), word_width() * 8);
  }
}
