use core::ptr::NonNull;

use rtheap_list::List;
use rtheap_sys::prelude::*;

use crate::{
  bin::Bins,
  classes::{
    capacity_for,
    class_for,
    fragment_size,
  },
  config::{
    ALIGNMENT,
    FRAGMENT_SIZE_MIN,
  },
  diag::Diagnostics,
  fragment::{
    Fragment,
    FragmentHeader,
    Region,
  },
  hooks::Hooks,
  integrity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
  InvalidArgument,
  OutOfMemory,
}

pub type HeapResult<T> = Result<T, HeapError>;

/// Bytes taken from the arena by the control block, padding included.
pub const INSTANCE_SIZE: usize = match align_up(size_of::<Heap>(), ALIGNMENT) {
  Some(size) => size,
  None => panic!("instance size overflows"),
};

/// Constant-time heap over a caller-provided arena.
///
/// The control block lives at the start of the arena it manages. All state
/// changes run between the enter and leave hooks.
#[repr(C)]
pub struct Heap {
  pub(crate) bins: Bins,
  pub(crate) hooks: Hooks,
  pub(crate) region: Region,
  pub(crate) diagnostics: Diagnostics,
}

const _: () = assert!(align_of::<Heap>() <= ALIGNMENT);

// All access goes through `&mut Heap`; the raw pointers it holds only ever
// point into the arena the heap exclusively manages.
unsafe impl Send for Heap {}

impl Heap {
  /// Sets up a heap inside `arena`.
  pub fn new(arena: &mut [u8]) -> HeapResult<&mut Heap> {
    Self::with_hooks(arena, Hooks::none())
  }

  pub fn with_hooks(arena: &mut [u8], hooks: Hooks) -> HeapResult<&mut Heap> {
    unsafe { Self::from_raw_with_hooks(arena.as_mut_ptr(), arena.len(), hooks) }
  }

  /// # Safety
  ///
  /// `base` must be valid for reads and writes of `len` bytes for `'a`, and
  /// nothing else may access those bytes during that time.
  pub unsafe fn from_raw<'a>(base: *mut u8, len: usize) -> HeapResult<&'a mut Heap> {
    unsafe { Self::from_raw_with_hooks(base, len, Hooks::none()) }
  }

  /// # Safety
  ///
  /// Same contract as [`Heap::from_raw`].
  pub unsafe fn from_raw_with_hooks<'a>(
    base: *mut u8,
    len: usize,
    hooks: Hooks,
  ) -> HeapResult<&'a mut Heap> {
    let Some(base) = NonNull::new(base) else {
      log::warn!("heap init rejected: null arena");
      return Err(HeapError::InvalidArgument);
    };

    let base_addr = base.as_ptr() as usize;
    let capacity = align_offset(base_addr, ALIGNMENT)
      .filter(|_| base_addr.checked_add(len).is_some())
      .and_then(|lead| lead.checked_add(INSTANCE_SIZE))
      .and_then(|reserved| len.checked_sub(reserved).map(|rest| (reserved, rest)))
      .and_then(|(reserved, rest)| capacity_for(rest).map(|capacity| (reserved, capacity)));

    let Some((reserved, capacity)) = capacity else {
      log::warn!(
        "heap init rejected: arena {:#x}+{} cannot host the instance and one fragment",
        base_addr,
        len
      );
      return Err(HeapError::InvalidArgument);
    };

    let _section = hooks.enter();

    let heap = unsafe {
      let heap = base.add(reserved - INSTANCE_SIZE).cast::<Heap>();
      let region = Region::new(base.add(reserved), capacity);
      heap.write(Heap {
        bins: Bins::new(),
        hooks,
        region,
        diagnostics: Diagnostics::new(capacity),
      });
      &mut *heap.as_ptr()
    };

    unsafe {
      let root = heap.region.write_header(0, capacity);
      heap.bins.push(Fragment::from_header(root));
    }

    log::debug!(
      "heap ready at {:#x}: capacity {} bytes, {} lost to alignment and control block",
      base_addr,
      capacity,
      len - capacity
    );
    Ok(heap)
  }

  pub fn set_hooks(&mut self, hooks: Hooks) {
    self.hooks = hooks;
  }

  pub fn hooks(&self) -> Hooks {
    self.hooks
  }

  pub fn capacity(&self) -> usize {
    self.region.capacity()
  }

  /// Largest request that can succeed, and only on an empty heap.
  pub fn max_allocation_size(&self) -> usize {
    self.capacity() - ALIGNMENT
  }

  /// Consistent snapshot of the counters.
  pub fn diagnostics(&self) -> Diagnostics {
    let _section = self.hooks.enter();
    self.diagnostics
  }

  /// Allocates `size` bytes aligned to [`ALIGNMENT`].
  ///
  /// Runs in bounded time: one bit scan, one list pop and at most one split
  /// per bit of `usize`.
  pub fn allocate(&mut self, size: usize) -> HeapResult<NonNull<u8>> {
    if size == 0 {
      return Err(HeapError::InvalidArgument);
    }

    let needed = class_for(size).filter(|_| size <= self.max_allocation_size());

    let _section = self.hooks.enter();

    let Some(needed) = needed else {
      return Err(self.out_of_memory(size));
    };
    let Some(fragment) = (unsafe { self.bins.pop_at_least(needed) }) else {
      return Err(self.out_of_memory(size));
    };

    let mut header = Fragment::into_header(fragment);
    unsafe { self.split(header, fragment_size(needed)) };

    let header_ref = unsafe { header.as_mut() };
    debug_assert!(!header_ref.used());
    header_ref.set_used(true);
    self
      .diagnostics
      .record_allocation(header_ref.size(), size);

    Ok(self.region.payload(header))
  }

  /// Returns a block to the heap. Null is ignored.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live pointer obtained from [`Heap::allocate`] on
  /// this heap. Anything else, a double free included, is a contract
  /// violation: debug builds and the `integrity` feature trap on it, release
  /// builds without that feature have undefined behaviour.
  pub unsafe fn deallocate(&mut self, ptr: *mut u8) {
    let Some(ptr) = NonNull::new(ptr) else {
      return;
    };

    integrity::check_pointer(&self.region, ptr);
    let header = self.region.header_of(ptr);

    let _section = self.hooks.enter();

    unsafe { integrity::check_used(&self.region, header) };

    let mut current = header;
    let current_ref = unsafe { current.as_mut() };
    current_ref.set_used(false);
    self.diagnostics.record_release(current_ref.size());

    while let Some(buddy) = unsafe { self.region.buddy_of(current) } {
      if unsafe { buddy.as_ref() }.used() {
        break;
      }
      current = unsafe { self.merge(current, buddy) };
    }

    unsafe { self.bins.push(Fragment::from_header(current)) };
  }

  /// Halves `header` until it is `target` bytes, binning every upper half.
  unsafe fn split(&mut self, mut header: NonNull<FragmentHeader>, target: usize) {
    debug_assert!(target >= FRAGMENT_SIZE_MIN);
    let offset = self.region.offset_of(header);

    loop {
      let lower = unsafe { header.as_mut() };
      let size = lower.size();
      if size <= target {
        break;
      }

      let half = size >> 1;
      lower.set_size(half);
      unsafe {
        let mut upper = self.region.write_header(offset + half, half);
        List::insert_after(upper.as_mut(), lower);
        self.bins.push(Fragment::from_header(upper));
      }
    }
  }

  /// Joins `current` with its free `buddy` and returns the merged header.
  unsafe fn merge(
    &mut self,
    current: NonNull<FragmentHeader>,
    buddy: NonNull<FragmentHeader>,
  ) -> NonNull<FragmentHeader> {
    unsafe { self.bins.remove(Fragment::from_header(buddy)) };

    let (mut lower, mut upper) = if buddy < current {
      (buddy, current)
    } else {
      (current, buddy)
    };

    unsafe {
      List::remove(upper.as_mut());
      let lower_ref = lower.as_mut();
      lower_ref.set_size(lower_ref.size() << 1);
    }
    lower
  }

  #[cold]
  fn out_of_memory(&mut self, size: usize) -> HeapError {
    self.diagnostics.record_oom(size);
    log::trace!(
      "heap out of memory: request {} bytes, {} of {} in use",
      size,
      self.diagnostics.allocated(),
      self.capacity()
    );
    HeapError::OutOfMemory
  }
}
