#![cfg_attr(not(test), no_std)]

pub mod math;
pub mod prim;

pub mod prelude {
  pub use super::{
    math::{
      align_offset,
      align_up,
      is_aligned,
      is_pow2,
      log2_ceil,
      log2_floor,
      pow2,
    },
    prim::{
      size_bits,
      word_width,
    },
  };
}
