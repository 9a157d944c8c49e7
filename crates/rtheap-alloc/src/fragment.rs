//! Fragment layout and every bit of address arithmetic the heap performs.
//!
//! The arena is addressed through [`Region`] by offsets relative to the first
//! fragment. Nothing outside this module turns an offset into a pointer or a
//! pointer into an offset.

use core::ptr::NonNull;

use getset::CopyGetters;
use rtheap_list::{
  HasLink,
  Link,
};

use crate::config::{
  ALIGNMENT,
  FRAGMENT_SIZE_MIN,
};

/// Header in front of every fragment, free or used.
///
/// The link chains all fragments in address order.
#[derive(Debug, CopyGetters)]
#[repr(C)]
pub struct FragmentHeader {
  link: Link<FragmentHeader>,
  #[getset(get_copy = "pub")]
  size: usize,
  #[getset(get_copy = "pub")]
  used: bool,
}

impl FragmentHeader {
  #[inline]
  pub fn set_size(&mut self, size: usize) {
    self.size = size;
  }

  #[inline]
  pub fn set_used(&mut self, used: bool) {
    self.used = used;
  }
}

impl HasLink for FragmentHeader {
  fn link(&self) -> &Link<Self> {
    &self.link
  }

  fn link_mut(&mut self) -> &mut Link<Self> {
    &mut self.link
  }
}

/// A free fragment: the header followed by the free-list link.
///
/// The free link overlays the first payload bytes, so a `Fragment` may only
/// be formed over a fragment that is not in use.
#[derive(Debug)]
#[repr(C)]
pub struct Fragment {
  header: FragmentHeader,
  free: Link<Fragment>,
}

impl Fragment {
  #[inline(always)]
  pub fn header(&self) -> &FragmentHeader {
    &self.header
  }

  #[inline(always)]
  pub fn from_header(header: NonNull<FragmentHeader>) -> NonNull<Fragment> {
    header.cast()
  }

  #[inline(always)]
  pub fn into_header(fragment: NonNull<Fragment>) -> NonNull<FragmentHeader> {
    fragment.cast()
  }

  /// Overwrites the free link with a detached one, discarding whatever
  /// payload bytes were there.
  ///
  /// # Safety
  ///
  /// `fragment` must be a live header of a fragment that is not in use and
  /// not binned.
  #[inline]
  pub unsafe fn reset_free_link(fragment: NonNull<Fragment>) {
    unsafe { (&raw mut (*fragment.as_ptr()).free).write(Link::new()) };
  }
}

impl HasLink for Fragment {
  fn link(&self) -> &Link<Self> {
    &self.free
  }

  fn link_mut(&mut self) -> &mut Link<Self> {
    &mut self.free
  }
}

const _: () = assert!(size_of::<FragmentHeader>() <= ALIGNMENT);
const _: () = assert!(align_of::<FragmentHeader>() <= ALIGNMENT);
const _: () = assert!(size_of::<Fragment>() <= FRAGMENT_SIZE_MIN);

/// The usable part of the arena: `capacity` bytes starting at `origin`.
#[derive(Debug, Clone, Copy, CopyGetters)]
#[repr(C)]
pub struct Region {
  origin: NonNull<u8>,
  #[getset(get_copy = "pub")]
  capacity: usize,
}

impl Region {
  /// # Safety
  ///
  /// `origin` must be `ALIGNMENT`-aligned and valid for `capacity` bytes of
  /// reads and writes for as long as the region is used.
  pub const unsafe fn new(origin: NonNull<u8>, capacity: usize) -> Self {
    Self { origin, capacity }
  }

  #[inline(always)]
  pub fn origin_addr(&self) -> usize {
    self.origin.as_ptr() as usize
  }

  #[inline]
  pub fn contains(&self, addr: usize) -> bool {
    let origin = self.origin_addr();
    addr >= origin && addr - origin < self.capacity
  }

  /// Offset of `header` from the origin, or `None` when it lies outside the
  /// region or off the alignment grid.
  #[inline]
  pub fn offset_of_checked(&self, header: NonNull<FragmentHeader>) -> Option<usize> {
    let addr = header.as_ptr() as usize;
    if !self.contains(addr) {
      return None;
    }
    let offset = addr - self.origin_addr();
    if offset % ALIGNMENT != 0 {
      return None;
    }
    Some(offset)
  }

  #[inline]
  pub fn offset_of(&self, header: NonNull<FragmentHeader>) -> usize {
    let addr = header.as_ptr() as usize;
    debug_assert!(self.contains(addr));
    addr - self.origin_addr()
  }

  #[inline]
  pub fn header_at(&self, offset: usize) -> NonNull<FragmentHeader> {
    debug_assert!(offset < self.capacity);
    debug_assert!(offset % ALIGNMENT == 0);
    // SAFETY: the offset stays inside the region the origin is valid for.
    unsafe { self.origin.add(offset).cast() }
  }

  #[inline]
  pub fn first(&self) -> NonNull<FragmentHeader> {
    self.header_at(0)
  }

  /// Writes a detached, free header of `size` bytes at `offset`.
  ///
  /// # Safety
  ///
  /// No live fragment header may exist at `offset`, and `offset + size` must
  /// not exceed the capacity.
  pub unsafe fn write_header(&self, offset: usize, size: usize) -> NonNull<FragmentHeader> {
    debug_assert!(offset.checked_add(size).is_some_and(|end| end <= self.capacity));
    let header = self.header_at(offset);
    unsafe {
      header.write(FragmentHeader {
        link: Link::new(),
        size,
        used: false,
      })
    };
    header
  }

  /// Start of the caller-visible bytes of a fragment.
  #[inline]
  pub fn payload(&self, header: NonNull<FragmentHeader>) -> NonNull<u8> {
    let offset = self.offset_of(header) + ALIGNMENT;
    // SAFETY: every fragment is at least `FRAGMENT_SIZE_MIN` bytes long, so
    // the payload start is still inside the region.
    unsafe { self.origin.add(offset) }
  }

  /// Header in front of a payload pointer previously returned by
  /// [`Region::payload`].
  #[inline]
  pub fn header_of(&self, payload: NonNull<u8>) -> NonNull<FragmentHeader> {
    let addr = payload.as_ptr() as usize;
    debug_assert!(addr >= self.origin_addr() + ALIGNMENT);
    self.header_at(addr - self.origin_addr() - ALIGNMENT)
  }

  /// Address-adjacent fragment that would merge with `header` into the next
  /// power of two.
  ///
  /// A fragment at offset `o` with size `s` pairs with the one at `o ^ s`:
  /// its fabric successor when `o` is `2s`-aligned, its predecessor
  /// otherwise. Returns `None` when that neighbour is missing or is not a
  /// fragment of the same size.
  ///
  /// # Safety
  ///
  /// `header` must be a live header of this region.
  pub unsafe fn buddy_of(&self, header: NonNull<FragmentHeader>) -> Option<NonNull<FragmentHeader>> {
    let current = unsafe { header.as_ref() };
    let size = current.size;
    if size >= self.capacity {
      return None;
    }

    let offset = self.offset_of(header);
    let candidate = if offset & size == 0 {
      current.link().next()?
    } else {
      current.link().prev()?
    };

    let neighbour = unsafe { candidate.as_ref() };
    if neighbour.size != size {
      return None;
    }
    debug_assert_eq!(self.offset_of(candidate), offset ^ size);
    Some(candidate)
  }
}
