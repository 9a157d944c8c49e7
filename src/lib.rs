#![cfg_attr(not(test), no_std)]

use core::{
  alloc::{
    GlobalAlloc,
    Layout,
  },
  ptr::{
    self,
    NonNull,
  },
};

use rtheap_alloc::{
  ALIGNMENT,
  Diagnostics,
  Heap,
  HeapError,
  HeapResult,
};
use spin::Mutex;

pub mod prelude {
  pub use rtheap_alloc::prelude::*;
  pub use rtheap_sync::{
    SpinSection,
    spin_hooks,
  };

  pub use crate::LockedHeap;
}

/// A [`Heap`] behind a spin lock, usable as the global allocator.
///
/// Starts empty and serves nothing until [`LockedHeap::init`] hands it an
/// arena.
///
/// ```ignore
/// #[global_allocator]
/// static HEAP: LockedHeap = LockedHeap::empty();
/// ```
pub struct LockedHeap {
  inner: Mutex<Option<&'static mut Heap>>,
}

impl LockedHeap {
  pub const fn empty() -> Self {
    Self {
      inner: Mutex::new(None),
    }
  }

  /// Builds the heap inside `len` bytes at `base`.
  ///
  /// Fails with [`HeapError::InvalidArgument`] when the arena is unusable or
  /// the heap is already initialized.
  ///
  /// # Safety
  ///
  /// `base` must be valid for reads and writes of `len` bytes for the rest of
  /// the program, and nothing else may touch them.
  pub unsafe fn init(&self, base: *mut u8, len: usize) -> HeapResult<()> {
    let mut inner = self.inner.lock();
    if inner.is_some() {
      return Err(HeapError::InvalidArgument);
    }
    *inner = Some(unsafe { Heap::from_raw(base, len)? });
    Ok(())
  }

  pub fn init_from_slice(&self, arena: &'static mut [u8]) -> HeapResult<()> {
    unsafe { self.init(arena.as_mut_ptr(), arena.len()) }
  }

  pub fn is_initialized(&self) -> bool {
    self.inner.lock().is_some()
  }

  /// Runs `f` on the heap with the lock held.
  pub fn with_heap<R>(&self, f: impl FnOnce(&mut Heap) -> R) -> Option<R> {
    self.inner.lock().as_deref_mut().map(f)
  }

  pub fn diagnostics(&self) -> Option<Diagnostics> {
    self.with_heap(|heap| heap.diagnostics())
  }
}

impl Default for LockedHeap {
  fn default() -> Self {
    Self::empty()
  }
}

unsafe impl GlobalAlloc for LockedHeap {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    if layout.align() > ALIGNMENT {
      return ptr::null_mut();
    }

    self
      .with_heap(|heap| heap.allocate(layout.size().max(1)).ok())
      .flatten()
      .map_or(ptr::null_mut(), NonNull::as_ptr)
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    _ = layout;
    self.with_heap(|heap| unsafe { heap.deallocate(ptr) });
  }
}

#[cfg(test)]
mod tests;
