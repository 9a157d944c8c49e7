use core::ptr::NonNull;

use rtheap_bitmap::BinMask;
use rtheap_list::FreeList;

use crate::{
  classes::bin_of,
  config::BINS,
  fragment::Fragment,
};

/// Segregated free lists, one per power of two, indexed by a non-empty mask.
///
/// Bit `i` of the mask is set exactly when list `i` has a member; every
/// method below keeps the two in lockstep.
#[repr(C)]
pub struct Bins {
  lists: [FreeList<Fragment>; BINS],
  mask: BinMask,
}

impl Bins {
  pub const fn new() -> Self {
    Self {
      lists: [const { FreeList::new() }; BINS],
      mask: BinMask::zero(),
    }
  }

  #[inline(always)]
  pub fn mask(&self) -> BinMask {
    self.mask
  }

  #[inline(always)]
  pub fn list(&self, bin: usize) -> &FreeList<Fragment> {
    &self.lists[bin]
  }

  /// # Safety
  ///
  /// `fragment` must be free, not binned, and sized to a power of two. Its
  /// payload may hold anything.
  pub unsafe fn push(&mut self, mut fragment: NonNull<Fragment>) {
    unsafe { Fragment::reset_free_link(fragment) };
    let fragment = unsafe { fragment.as_mut() };
    let bin = bin_of(fragment.header().size()) as usize;

    unsafe { self.lists[bin].push_front(fragment) };
    let marked = self.mask.set(bin);
    debug_assert!(marked.is_ok());
  }

  /// Pops the head of the smallest non-empty bin at or above `bin`.
  ///
  /// # Safety
  ///
  /// All binned fragments must be live.
  pub unsafe fn pop_at_least(&mut self, bin: u8) -> Option<NonNull<Fragment>> {
    let found = self.mask.find_fs_from(bin as usize)?;
    let fragment = unsafe { self.lists[found].pop_front() };
    debug_assert!(fragment.is_some());
    self.sync_bit(found);
    fragment
  }

  /// Unlinks a binned fragment from whichever position it holds.
  ///
  /// # Safety
  ///
  /// `fragment` must currently be a member of the bin matching its size.
  pub unsafe fn remove(&mut self, mut fragment: NonNull<Fragment>) {
    let fragment = unsafe { fragment.as_mut() };
    let bin = bin_of(fragment.header().size()) as usize;

    unsafe { self.lists[bin].remove(fragment) };
    self.sync_bit(bin);
  }

  fn sync_bit(&mut self, bin: usize) {
    if self.lists[bin].is_empty() {
      let cleared = self.mask.clear(bin);
      debug_assert!(cleared.is_ok());
    }
  }
}

impl Default for Bins {
  fn default() -> Self {
    Self::new()
  }
}
