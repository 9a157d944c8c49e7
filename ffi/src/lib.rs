#![cfg_attr(not(test), no_std)]

//! C entry points over [`Heap`]. Every function taking a heap pointer
//! expects one returned by [`rtheap_init`].

use core::{
  ffi::c_void,
  ptr,
};

pub use rtheap::prelude::*;

mod handler;

/// Sets up a heap in `size` bytes at `base`. Returns null when the arena is
/// unusable.
///
/// # Safety
///
/// `base` must be valid for `size` bytes for as long as the heap is used.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_init(base: *mut c_void, size: usize) -> *mut Heap {
  match unsafe { Heap::from_raw(base.cast(), size) } {
    Ok(heap) => heap as *mut Heap,
    Err(_) => ptr::null_mut(),
  }
}

/// Installs critical-section hooks; either may be null.
///
/// # Safety
///
/// `heap` must come from [`rtheap_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_set_hooks(
  heap: *mut Heap,
  enter: Option<Hook>,
  leave: Option<Hook>,
) {
  if let Some(heap) = unsafe { heap.as_mut() } {
    heap.set_hooks(Hooks::from_parts(enter, leave));
  }
}

/// # Safety
///
/// `heap` must come from [`rtheap_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_allocate(heap: *mut Heap, amount: usize) -> *mut c_void {
  let Some(heap) = (unsafe { heap.as_mut() }) else {
    return ptr::null_mut();
  };
  heap
    .allocate(amount)
    .map_or(ptr::null_mut(), |block| block.as_ptr().cast())
}

/// # Safety
///
/// `heap` must come from [`rtheap_init`] and `pointer` must be null or a
/// live block from [`rtheap_allocate`] on the same heap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_free(heap: *mut Heap, pointer: *mut c_void) {
  if let Some(heap) = unsafe { heap.as_mut() } {
    unsafe { heap.deallocate(pointer.cast()) };
  }
}

/// # Safety
///
/// `heap` must come from [`rtheap_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_get_diagnostics(heap: *const Heap) -> Diagnostics {
  unsafe { heap.as_ref() }.map_or_else(Diagnostics::default, Heap::diagnostics)
}

/// # Safety
///
/// `heap` must come from [`rtheap_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_do_invariants_hold(heap: *const Heap) -> bool {
  unsafe { heap.as_ref() }.is_some_and(Heap::invariants_hold)
}

/// # Safety
///
/// `heap` must come from [`rtheap_init`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rtheap_get_max_allocation_size(heap: *const Heap) -> usize {
  unsafe { heap.as_ref() }.map_or(0, Heap::max_allocation_size)
}
