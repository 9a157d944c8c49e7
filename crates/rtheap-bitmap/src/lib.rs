#![cfg_attr(not(test), no_std)]

#[cfg(test)]
pub mod tests;

#[derive(Debug, PartialEq, Eq)]
pub enum BitmapError {
  OutOfBounds { index: usize, size: usize },
}

pub type BitmapResult<T> = Result<T, BitmapError>;

pub type BitmapWord = usize;

const WORD_BITS: usize = BitmapWord::BITS as usize;

/// Single-word bitmap with one bit per size class.
///
/// Every query is a handful of word operations, so lookups never depend on
/// how many bits are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct BinMask(BitmapWord);

impl BinMask {
  pub const fn zero() -> Self {
    Self(0)
  }

  #[inline(always)]
  pub const fn word(&self) -> BitmapWord {
    self.0
  }

  const fn position(index: usize) -> BitmapResult<BitmapWord> {
    if index >= WORD_BITS {
      return Err(BitmapError::OutOfBounds {
        index,
        size: WORD_BITS,
      });
    }
    Ok(1 << index)
  }

  #[inline]
  pub fn set(&mut self, index: usize) -> BitmapResult<()> {
    self.0 |= Self::position(index)?;
    Ok(())
  }

  #[inline]
  pub fn clear(&mut self, index: usize) -> BitmapResult<()> {
    self.0 &= !Self::position(index)?;
    Ok(())
  }

  #[inline]
  pub fn get(&self, index: usize) -> BitmapResult<bool> {
    Ok(self.0 & Self::position(index)? != 0)
  }

  /// Lowest set bit at or above `index`.
  #[inline]
  pub const fn find_fs_from(&self, index: usize) -> Option<usize> {
    if index >= WORD_BITS {
      return None;
    }
    let masked = self.0 & (BitmapWord::MAX << index);
    if masked == 0 {
      return None;
    }
    Some(masked.trailing_zeros() as usize)
  }

  #[inline]
  pub const fn is_clear(&self) -> bool {
    self.0 == 0
  }
}
