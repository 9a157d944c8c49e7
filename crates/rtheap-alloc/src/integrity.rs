//! Contract checks and the full invariant walk.
//!
//! The per-call checks are O(1) and compiled in for debug builds or with the
//! `integrity` feature. They trap instead of letting a bad free corrupt the
//! heap. [`Heap::invariants_hold`] walks everything and is meant for tests
//! and diagnostics, not for the allocation path.

use core::ptr::NonNull;

use rtheap_list::{
  HasLink,
  ListIter,
};
use rtheap_sys::prelude::*;

use crate::{
  classes::fragment_size,
  config::{
    ALIGNMENT,
    BINS,
    FRAGMENT_SIZE_MIN,
  },
  fragment::{
    FragmentHeader,
    Region,
  },
  heap::Heap,
};

const CHECKED: bool = cfg!(any(debug_assertions, feature = "integrity"));

#[cold]
#[inline(never)]
fn violation(what: &str, addr: usize) -> ! {
  log::error!("heap contract violation at {:#x}: {}", addr, what);
  panic!("heap contract violation at {:#x}: {}", addr, what);
}

macro_rules! contract {
  ($cond:expr, $what:expr, $addr:expr) => {
    if CHECKED && !$cond {
      violation($what, $addr);
    }
  };
}

/// Rejects pointers that cannot have come from [`Heap::allocate`].
#[inline]
pub(crate) fn check_pointer(region: &Region, ptr: NonNull<u8>) {
  let addr = ptr.as_ptr() as usize;
  contract!(
    is_aligned(addr, ALIGNMENT) == Some(true),
    "misaligned pointer",
    addr
  );
  contract!(
    region.contains(addr) && addr - region.origin_addr() >= ALIGNMENT,
    "pointer outside the arena",
    addr
  );
}

/// Validates the header of a fragment about to be freed.
///
/// # Safety
///
/// `header` must lie inside `region`, which [`check_pointer`] establishes.
#[inline]
pub(crate) unsafe fn check_used(region: &Region, header: NonNull<FragmentHeader>) {
  if !CHECKED {
    return;
  }

  let addr = header.as_ptr() as usize;
  let current = unsafe { header.as_ref() };
  contract!(current.used(), "double free or foreign pointer", addr);

  let size = current.size();
  let offset = region.offset_of(header);
  contract!(
    is_pow2(size) && size >= FRAGMENT_SIZE_MIN && size <= region.capacity(),
    "corrupted fragment size",
    addr
  );
  contract!(offset % size == 0, "fragment off its size grid", addr);

  if let Some(next) = current.link().next() {
    contract!(
      region.offset_of_checked(next) == Some(offset + size),
      "corrupted successor link",
      addr
    );
    contract!(
      unsafe { next.as_ref() }.link().prev() == Some(header),
      "successor does not link back",
      addr
    );
  } else {
    contract!(offset + size == region.capacity(), "fabric ends early", addr);
  }

  if let Some(prev) = current.link().prev() {
    contract!(
      region.offset_of_checked(prev).is_some_and(|p| p < offset),
      "corrupted predecessor link",
      addr
    );
    contract!(
      unsafe { prev.as_ref() }.link().next() == Some(header),
      "predecessor does not link back",
      addr
    );
  } else {
    contract!(offset == 0, "fabric starts late", addr);
  }
}

impl Heap {
  /// Walks the fabric and every bin and reports whether all structural
  /// invariants hold.
  ///
  /// Linear in the number of fragments; never call it on a hot path.
  pub fn invariants_hold(&self) -> bool {
    let _section = self.hooks.enter();
    match (self.check_bins(), self.check_fabric()) {
      (Some(binned), Some(free)) => binned == free,
      _ => false,
    }
  }

  /// Number of binned fragments, or `None` on any inconsistency.
  fn check_bins(&self) -> Option<usize> {
    let mask = self.bins.mask();
    let limit = self.region.capacity() / FRAGMENT_SIZE_MIN;
    let mut binned = 0usize;

    for bin in 0..BINS {
      let list = self.bins.list(bin);
      if mask.get(bin).ok() != Some(!list.is_empty()) {
        return None;
      }

      let mut prev = None;
      for (seen, fragment) in unsafe { list.iter() }.enumerate() {
        let header = fragment.header();
        if seen > limit
          || header.used()
          || header.size() != fragment_size(bin as u8)
          || fragment.link().prev() != prev
        {
          return None;
        }
        prev = Some(NonNull::from(fragment));
        binned += 1;
      }
    }
    Some(binned)
  }

  /// Number of free fragments in the fabric, or `None` on any inconsistency.
  fn check_fabric(&self) -> Option<usize> {
    let region = &self.region;
    let limit = region.capacity() / FRAGMENT_SIZE_MIN;

    let mut expected = 0usize;
    let mut used = 0usize;
    let mut free = 0usize;
    let mut prev: Option<NonNull<FragmentHeader>> = None;
    let mut prev_free_size = None;

    for (seen, header) in ListIter::new(Some(region.first())).enumerate() {
      let this = NonNull::from(header);
      let size = header.size();
      if seen > limit
        || region.offset_of_checked(this) != Some(expected)
        || header.link().prev() != prev
        || !is_pow2(size)
        || size < FRAGMENT_SIZE_MIN
        || expected % size != 0
      {
        return None;
      }

      if header.used() {
        used += size;
        prev_free_size = None;
      } else {
        // An upper buddy sitting next to a free lower buddy of its size
        // should have been merged.
        if expected & size != 0 && prev_free_size == Some(size) {
          return None;
        }
        prev_free_size = Some(size);
        free += 1;
      }

      expected = expected.checked_add(size)?;
      prev = Some(this);
    }

    let diag = &self.diagnostics;
    let consistent = expected == region.capacity()
      && used == diag.allocated()
      && diag.allocated() <= diag.peak_allocated()
      && diag.peak_allocated() <= diag.capacity()
      && diag.capacity() == region.capacity();
    consistent.then_some(free)
  }
}
